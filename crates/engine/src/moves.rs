//! Journal entries (moves) and their computed totals.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

use crate::{Money, ResultEngine};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum MoveState {
    #[default]
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "posted")]
    Posted,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "moves")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub date: NaiveDate,
    #[sea_orm(column_name = "ref")]
    pub reference: Option<String>,
    pub journal_id: i32,
    pub state: MoveState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::journals::Entity",
        from = "Column::JournalId",
        to = "super::journals::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Journal,
    #[sea_orm(has_many = "super::move_lines::Entity")]
    Lines,
}

impl Related<super::journals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Journal.def()
    }
}

impl Related<super::move_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Debit/credit totals of a journal entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveTotals {
    pub debit: Money,
    pub credit: Money,
}

impl MoveTotals {
    /// Sums `(debit, credit)` pairs.
    pub fn from_amounts(amounts: impl IntoIterator<Item = (Money, Money)>) -> ResultEngine<Self> {
        amounts
            .into_iter()
            .try_fold(Self::default(), |acc, (debit, credit)| -> ResultEngine<Self> {
                Ok(Self {
                    debit: acc.debit.try_add(debit)?,
                    credit: acc.credit.try_add(credit)?,
                })
            })
    }

    /// Sums the given lines.
    pub fn from_lines<'a>(
        lines: impl IntoIterator<Item = &'a super::move_lines::Model>,
    ) -> ResultEngine<Self> {
        Self::from_amounts(
            lines
                .into_iter()
                .map(|line| (Money::new(line.debit_minor), Money::new(line.credit_minor))),
        )
    }

    /// `Σdebit - Σcredit`.
    pub fn amount_total(self) -> ResultEngine<Money> {
        self.debit.try_sub(self.credit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_and_amount_reject_overflow() {
        let totals = MoveTotals::from_amounts([
            (Money::new(15_000), Money::ZERO),
            (Money::ZERO, Money::new(10_000)),
        ])
        .unwrap();
        assert_eq!(totals.amount_total().unwrap(), Money::new(5_000));

        let overflowing = [(Money::new(i64::MAX), Money::ZERO), (Money::new(1), Money::ZERO)];
        assert!(MoveTotals::from_amounts(overflowing).is_err());

        let lopsided = MoveTotals {
            debit: Money::new(i64::MIN),
            credit: Money::new(1),
        };
        assert!(lopsided.amount_total().is_err());
    }
}
