use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};

use crate::{NewPartner, PartnerPatch, ResultEngine, move_lines, partners};

use super::{Engine, normalize_optional_text, now, required_text, with_tx};

// Partner reads never filter on `active`: deactivated partners must stay
// visible and editable.
impl Engine {
    pub async fn partners(&self) -> ResultEngine<Vec<partners::Model>> {
        with_tx!(self, |db_tx| {
            Ok(partners::Entity::find()
                .order_by_asc(partners::Column::Id)
                .all(&db_tx)
                .await?)
        })
    }

    pub async fn partner(&self, id: i32) -> ResultEngine<partners::Model> {
        with_tx!(self, |db_tx| self.find_partner(&db_tx, id).await)
    }

    pub async fn new_partner(&self, cmd: NewPartner) -> ResultEngine<partners::Model> {
        let name = required_text(cmd.name.as_deref(), "name")?;

        with_tx!(self, |db_tx| {
            let stamp = now();
            let model = partners::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                code: ActiveValue::Set(normalize_optional_text(cmd.code.as_deref())),
                partner_type: ActiveValue::Set(cmd.partner_type.unwrap_or_default()),
                vat: ActiveValue::Set(normalize_optional_text(cmd.vat.as_deref())),
                email: ActiveValue::Set(normalize_optional_text(cmd.email.as_deref())),
                phone: ActiveValue::Set(normalize_optional_text(cmd.phone.as_deref())),
                active: ActiveValue::Set(cmd.active.unwrap_or(true)),
                created_at: ActiveValue::Set(stamp),
                updated_at: ActiveValue::Set(stamp),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(id = model.id, active = model.active, "partner created");
            Ok(model)
        })
    }

    pub async fn update_partner(
        &self,
        id: i32,
        patch: PartnerPatch,
    ) -> ResultEngine<partners::Model> {
        with_tx!(self, |db_tx| {
            let current = self.find_partner(&db_tx, id).await?;
            let mut active: partners::ActiveModel = current.into();

            if let Some(name) = patch.name.as_deref() {
                active.name = ActiveValue::Set(required_text(Some(name), "name")?);
            }
            if let Some(code) = patch.code {
                active.code = ActiveValue::Set(normalize_optional_text(code.as_deref()));
            }
            if let Some(partner_type) = patch.partner_type {
                active.partner_type = ActiveValue::Set(partner_type);
            }
            if let Some(vat) = patch.vat {
                active.vat = ActiveValue::Set(normalize_optional_text(vat.as_deref()));
            }
            if let Some(email) = patch.email {
                active.email = ActiveValue::Set(normalize_optional_text(email.as_deref()));
            }
            if let Some(phone) = patch.phone {
                active.phone = ActiveValue::Set(normalize_optional_text(phone.as_deref()));
            }
            if let Some(flag) = patch.active {
                active.active = ActiveValue::Set(flag);
            }
            active.updated_at = ActiveValue::Set(now());
            let model = active.update(&db_tx).await?;

            tracing::info!(id, "partner updated");
            Ok(model)
        })
    }

    /// Deletes a partner; journal items keep their amounts but lose the link.
    pub async fn delete_partner(&self, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.find_partner(&db_tx, id).await?;
            move_lines::Entity::update_many()
                .col_expr(move_lines::Column::PartnerId, Expr::value(Option::<i32>::None))
                .col_expr(move_lines::Column::UpdatedAt, Expr::value(now()))
                .filter(move_lines::Column::PartnerId.eq(id))
                .exec(&db_tx)
                .await?;
            partners::Entity::delete_by_id(id).exec(&db_tx).await?;
            tracing::info!(id, "partner deleted");
            Ok(())
        })
    }
}
