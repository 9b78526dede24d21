//! Journals group journal entries by business purpose.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

pub const DEFAULT_JOURNAL_NAME: &str = "General Journal";
pub const DEFAULT_JOURNAL_CODE: &str = "GEN";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum JournalType {
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "purchase")]
    Purchase,
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "bank")]
    Bank,
    #[sea_orm(string_value = "general")]
    General,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "journals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub code: String,
    pub journal_type: JournalType,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::moves::Entity")]
    Moves,
}

impl Related<super::moves::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Moves.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
