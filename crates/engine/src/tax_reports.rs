//! VAT returns.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

use crate::{Money, ResultEngine, tax_periods::ReportFrequency};

/// Lifecycle of a tax report: `Draft -> Confirmed -> Submitted`, never backwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum TaxReportState {
    #[default]
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "submitted")]
    Submitted,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tax_reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub date: NaiveDate,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub report_type: ReportFrequency,
    pub additional_period: Option<String>,
    pub sale_vat_minor: i64,
    pub purchase_vat_minor: i64,
    pub vat_payable_minor: i64,
    pub exempt_minor: i64,
    pub zero_rated_minor: i64,
    pub withholding_minor: i64,
    pub state: TaxReportState,
    pub notes: Option<String>,
    pub tax_period_id: Option<i32>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `sale - purchase - withholding`.
pub fn vat_payable(sale: Money, purchase: Money, withholding: Money) -> ResultEngine<Money> {
    sale.try_sub(purchase)?.try_sub(withholding)
}

impl ActiveModel {
    /// Recomputes `vat_payable_minor` from the three inputs held by the active model.
    pub fn recompute_vat_payable(&mut self) -> ResultEngine<()> {
        let read = |value: &sea_orm::ActiveValue<i64>| match value {
            sea_orm::ActiveValue::Set(v) | sea_orm::ActiveValue::Unchanged(v) => *v,
            sea_orm::ActiveValue::NotSet => 0,
        };
        let payable = vat_payable(
            Money::new(read(&self.sale_vat_minor)),
            Money::new(read(&self.purchase_vat_minor)),
            Money::new(read(&self.withholding_minor)),
        )?;
        self.vat_payable_minor = sea_orm::ActiveValue::Set(payable.minor());
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tax_periods::Entity",
        from = "Column::TaxPeriodId",
        to = "super::tax_periods::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    TaxPeriod,
}

impl Related<super::tax_periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaxPeriod.def()
    }
}

impl Related<super::taxes::Entity> for Entity {
    fn to() -> RelationDef {
        super::tax_report_taxes::Relation::Tax.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tax_report_taxes::Relation::TaxReport.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
