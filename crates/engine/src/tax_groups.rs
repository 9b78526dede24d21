//! Tax groups bundle taxes that are reported together.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::tax_periods::ReportFrequency;

/// Taxpayer regime of a VAT group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum VatType {
    #[default]
    #[sea_orm(string_value = "general")]
    General,
    #[sea_orm(string_value = "simplified")]
    Simplified,
    #[sea_orm(string_value = "exempt")]
    Exempt,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tax_groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub code: String,
    pub is_vat_group: bool,
    pub vat_type: VatType,
    pub reporting_period: ReportFrequency,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::taxes::Entity")]
    Taxes,
}

impl Related<super::taxes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Taxes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
