use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{NewTaxGroup, ResultEngine, tax_groups, taxes};

use super::{Engine, normalize_optional_text, now, required_text, with_tx};

impl Engine {
    pub async fn tax_groups(&self) -> ResultEngine<Vec<tax_groups::Model>> {
        with_tx!(self, |db_tx| {
            Ok(tax_groups::Entity::find()
                .order_by_asc(tax_groups::Column::Code)
                .order_by_asc(tax_groups::Column::Id)
                .all(&db_tx)
                .await?)
        })
    }

    pub async fn new_tax_group(&self, cmd: NewTaxGroup) -> ResultEngine<tax_groups::Model> {
        let name = required_text(cmd.name.as_deref(), "name")?;
        let code = required_text(cmd.code.as_deref(), "code")?;

        with_tx!(self, |db_tx| {
            let stamp = now();
            let group = tax_groups::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                code: ActiveValue::Set(code),
                is_vat_group: ActiveValue::Set(cmd.is_vat_group.unwrap_or(false)),
                vat_type: ActiveValue::Set(cmd.vat_type.unwrap_or_default()),
                reporting_period: ActiveValue::Set(cmd.reporting_period.unwrap_or_default()),
                description: ActiveValue::Set(normalize_optional_text(cmd.description.as_deref())),
                created_at: ActiveValue::Set(stamp),
                updated_at: ActiveValue::Set(stamp),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(id = group.id, code = %group.code, "tax group created");
            Ok(group)
        })
    }

    /// Deletes a tax group; its taxes become ungrouped.
    pub async fn delete_tax_group(&self, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.find_tax_group(&db_tx, id).await?;
            taxes::Entity::update_many()
                .col_expr(taxes::Column::TaxGroupId, Expr::value(Option::<i32>::None))
                .col_expr(taxes::Column::UpdatedAt, Expr::value(now()))
                .filter(taxes::Column::TaxGroupId.eq(id))
                .exec(&db_tx)
                .await?;
            tax_groups::Entity::delete_by_id(id).exec(&db_tx).await?;
            tracing::info!(id, "tax group deleted");
            Ok(())
        })
    }
}
