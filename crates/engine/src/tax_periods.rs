//! Tax filing periods.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

/// How often a tax is reported. Shared by taxes, groups, periods and reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ReportFrequency {
    #[default]
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    #[sea_orm(string_value = "half_yearly")]
    HalfYearly,
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum TaxPeriodState {
    #[default]
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "closed")]
    Closed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tax_periods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,
    pub active: bool,
    pub period_type: ReportFrequency,
    pub deadline_date: Option<NaiveDate>,
    pub state: TaxPeriodState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tax_reports::Entity")]
    TaxReports,
}

impl Related<super::tax_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaxReports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
