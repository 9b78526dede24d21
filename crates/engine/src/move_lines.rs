//! Journal items: the debit/credit lines of a move.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::{Money, ResultEngine};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "move_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub move_id: i32,
    pub account_id: i32,
    pub partner_id: Option<i32>,
    pub name: Option<String>,
    pub debit_minor: i64,
    pub credit_minor: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// Unsigned line amount, `|credit - debit|`.
    pub fn magnitude(&self) -> ResultEngine<Money> {
        self.balance()?.try_abs()
    }

    /// Signed balance, `debit - credit`.
    pub fn balance(&self) -> ResultEngine<Money> {
        Money::new(self.debit_minor).try_sub(Money::new(self.credit_minor))
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::moves::Entity",
        from = "Column::MoveId",
        to = "super::moves::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Move,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::partners::Entity",
        from = "Column::PartnerId",
        to = "super::partners::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Partner,
}

impl Related<super::moves::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Move.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::partners::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Partner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
