//! Tax configuration.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

use crate::{
    tax::{AmountType, CalculationMethod, TaxRule},
    tax_periods::ReportFrequency,
};

/// Which side of a transaction a tax applies to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum TaxUse {
    #[default]
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "purchase")]
    Purchase,
    #[sea_orm(string_value = "both")]
    Both,
    #[sea_orm(string_value = "none")]
    None,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum TaxCategory {
    #[default]
    #[sea_orm(string_value = "vat")]
    Vat,
    #[sea_orm(string_value = "withholding")]
    Withholding,
    #[sea_orm(string_value = "stamp")]
    Stamp,
    #[sea_orm(string_value = "customs")]
    Customs,
    #[sea_orm(string_value = "other")]
    Other,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "taxes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    pub sequence: i32,
    pub active: bool,
    /// Percentage for `percent` taxes, money per unit for `fixed` ones.
    pub amount: f64,
    pub amount_type: AmountType,
    pub type_tax_use: TaxUse,
    pub tax_category: TaxCategory,
    pub calculation_method: CalculationMethod,
    pub is_exempt: bool,
    pub exempt_reason: Option<String>,
    pub account_id: Option<i32>,
    pub refund_account_id: Option<i32>,
    pub tax_group_id: Option<i32>,
    pub report_frequency: ReportFrequency,
    pub effective_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn rule(&self) -> TaxRule {
        TaxRule {
            rate: self.amount,
            amount_type: self.amount_type,
            calculation_method: self.calculation_method,
            is_exempt: self.is_exempt,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::RefundAccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    RefundAccount,
    #[sea_orm(
        belongs_to = "super::tax_groups::Entity",
        from = "Column::TaxGroupId",
        to = "super::tax_groups::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    TaxGroup,
}

impl Related<super::tax_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaxGroup.def()
    }
}

impl Related<super::tax_reports::Entity> for Entity {
    fn to() -> RelationDef {
        super::tax_report_taxes::Relation::TaxReport.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tax_report_taxes::Relation::Tax.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
