use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, NewCurrency, ResultEngine, currencies};

use super::{Engine, normalize_optional_text, now, required_text, with_tx};

impl Engine {
    pub async fn currencies(&self, include_inactive: bool) -> ResultEngine<Vec<currencies::Model>> {
        with_tx!(self, |db_tx| {
            let mut query = currencies::Entity::find().order_by_asc(currencies::Column::Code);
            if !include_inactive {
                query = query.filter(currencies::Column::Active.eq(true));
            }
            Ok(query.all(&db_tx).await?)
        })
    }

    /// Adds a currency. Codes are stored upper-case and must be unique; the
    /// rate defaults to 1.
    pub async fn new_currency(&self, cmd: NewCurrency) -> ResultEngine<currencies::Model> {
        let name = required_text(cmd.name.as_deref(), "name")?;
        let code = required_text(cmd.code.as_deref(), "code")?.to_uppercase();
        let rate = cmd.rate.unwrap_or(1.0);
        if !rate.is_finite() || rate <= 0.0 {
            return Err(EngineError::InvalidValue(format!(
                "rate: must be positive, got {rate}"
            )));
        }

        with_tx!(self, |db_tx| {
            let exists = currencies::Entity::find()
                .filter(currencies::Column::Code.eq(code.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(code));
            }

            let stamp = now();
            let model = currencies::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                code: ActiveValue::Set(code),
                symbol: ActiveValue::Set(normalize_optional_text(cmd.symbol.as_deref())),
                rate: ActiveValue::Set(rate),
                active: ActiveValue::Set(cmd.active.unwrap_or(true)),
                created_at: ActiveValue::Set(stamp),
                updated_at: ActiveValue::Set(stamp),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(id = model.id, code = %model.code, "currency created");
            Ok(model)
        })
    }
}
