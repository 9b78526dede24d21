//! Fixed assets, the input of the depreciation estimator.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

use crate::{Money, depreciation::AssetTerms};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum DepreciationMethod {
    /// Straight-line.
    #[default]
    #[sea_orm(string_value = "linear")]
    Linear,
    /// Declining balance.
    #[sea_orm(string_value = "degressive")]
    Degressive,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub code: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub value_minor: i64,
    pub depreciation_method: DepreciationMethod,
    /// Useful life in years.
    pub useful_life: Option<i32>,
    pub residual_value_minor: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn terms(&self) -> AssetTerms {
        AssetTerms {
            purchase_date: self.purchase_date,
            value: Money::new(self.value_minor),
            residual_value: Money::new(self.residual_value_minor),
            useful_life_years: self.useful_life.unwrap_or(0),
            method: self.depreciation_method,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
