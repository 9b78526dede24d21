//! Link table between tax reports and the taxes they cover.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tax_report_taxes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tax_report_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tax_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tax_reports::Entity",
        from = "Column::TaxReportId",
        to = "super::tax_reports::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    TaxReport,
    #[sea_orm(
        belongs_to = "super::taxes::Entity",
        from = "Column::TaxId",
        to = "super::taxes::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Tax,
}

impl ActiveModelBehavior for ActiveModel {}
