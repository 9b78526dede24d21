use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    AssetPatch, EngineError, Money, NewAsset, ResultEngine, assets,
    depreciation::{self, DepreciationLine, MAX_USEFUL_LIFE},
};

use super::{Engine, normalize_optional_text, now, required, required_text, with_tx};

const ASSET_SEQUENCE: &str = "ASSET";

/// Zero stands for "one year"; anything outside `0..=MAX_USEFUL_LIFE` is refused.
fn check_useful_life(useful_life: Option<i32>) -> ResultEngine<Option<i32>> {
    match useful_life {
        Some(years) if !(0..=MAX_USEFUL_LIFE).contains(&years) => Err(EngineError::InvalidValue(
            format!("useful_life must be between 0 and {MAX_USEFUL_LIFE} years, got {years}"),
        )),
        other => Ok(other),
    }
}

/// One line of a depreciation preview, tagged with the asset it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetDepreciation {
    pub asset_id: i32,
    pub line: DepreciationLine,
}

impl Engine {
    pub async fn assets(&self, include_inactive: bool) -> ResultEngine<Vec<assets::Model>> {
        with_tx!(self, |db_tx| {
            let mut query = assets::Entity::find().order_by_asc(assets::Column::Id);
            if !include_inactive {
                query = query.filter(assets::Column::Active.eq(true));
            }
            Ok(query.all(&db_tx).await?)
        })
    }

    pub async fn asset(&self, id: i32) -> ResultEngine<assets::Model> {
        with_tx!(self, |db_tx| self.find_asset(&db_tx, id).await)
    }

    /// Registers an asset. A missing code is taken from the asset sequence
    /// (`00001`, `00002`, ...).
    pub async fn new_asset(&self, cmd: NewAsset) -> ResultEngine<assets::Model> {
        let name = required_text(cmd.name.as_deref(), "name")?;
        let purchase_date = required(cmd.purchase_date, "purchase_date")?;
        let value = required(cmd.value, "purchase_value")?;
        let depreciation_method = required(cmd.depreciation_method, "depreciation_method")?;
        let useful_life = check_useful_life(cmd.useful_life)?;

        with_tx!(self, |db_tx| {
            let code = match normalize_optional_text(cmd.code.as_deref()) {
                Some(code) => code,
                None => self.next_asset_code(&db_tx).await?,
            };

            let stamp = now();
            let model = assets::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                code: ActiveValue::Set(Some(code)),
                purchase_date: ActiveValue::Set(Some(purchase_date)),
                value_minor: ActiveValue::Set(value.minor()),
                depreciation_method: ActiveValue::Set(depreciation_method),
                useful_life: ActiveValue::Set(useful_life),
                residual_value_minor: ActiveValue::Set(
                    cmd.residual_value.unwrap_or(Money::ZERO).minor(),
                ),
                active: ActiveValue::Set(cmd.active.unwrap_or(true)),
                created_at: ActiveValue::Set(stamp),
                updated_at: ActiveValue::Set(stamp),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(id = model.id, code = ?model.code, "asset created");
            Ok(model)
        })
    }

    pub async fn update_asset(&self, id: i32, patch: AssetPatch) -> ResultEngine<assets::Model> {
        with_tx!(self, |db_tx| {
            let current = self.find_asset(&db_tx, id).await?;
            let mut active: assets::ActiveModel = current.into();

            if let Some(name) = patch.name.as_deref() {
                active.name = ActiveValue::Set(required_text(Some(name), "name")?);
            }
            if let Some(code) = patch.code {
                active.code = ActiveValue::Set(normalize_optional_text(code.as_deref()));
            }
            if let Some(purchase_date) = patch.purchase_date {
                active.purchase_date = ActiveValue::Set(purchase_date);
            }
            if let Some(value) = patch.value {
                active.value_minor = ActiveValue::Set(value.minor());
            }
            if let Some(method) = patch.depreciation_method {
                active.depreciation_method = ActiveValue::Set(method);
            }
            if let Some(useful_life) = patch.useful_life {
                active.useful_life = ActiveValue::Set(check_useful_life(useful_life)?);
            }
            if let Some(residual_value) = patch.residual_value {
                active.residual_value_minor = ActiveValue::Set(residual_value.minor());
            }
            if let Some(flag) = patch.active {
                active.active = ActiveValue::Set(flag);
            }
            active.updated_at = ActiveValue::Set(now());
            let model = active.update(&db_tx).await?;

            tracing::info!(id, "asset updated");
            Ok(model)
        })
    }

    pub async fn delete_asset(&self, id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.find_asset(&db_tx, id).await?;
            assets::Entity::delete_by_id(id).exec(&db_tx).await?;
            tracing::info!(id, "asset deleted");
            Ok(())
        })
    }

    /// Depreciation preview of the given assets as of `today`, concatenated in
    /// request order. Unknown ids are skipped but still take up a position in
    /// the journal references.
    pub async fn depreciate_assets(
        &self,
        asset_ids: &[i32],
        today: NaiveDate,
    ) -> ResultEngine<Vec<AssetDepreciation>> {
        with_tx!(self, |db_tx| {
            let mut out = Vec::new();
            for (position, &asset_id) in asset_ids.iter().enumerate() {
                let Some(asset) = assets::Entity::find_by_id(asset_id).one(&db_tx).await? else {
                    tracing::debug!(asset_id, "unknown asset skipped");
                    continue;
                };
                out.extend(
                    depreciation::schedule(&asset.terms(), today, position)
                        .into_iter()
                        .map(|line| AssetDepreciation { asset_id, line }),
                );
            }
            Ok(out)
        })
    }

    async fn next_asset_code(&self, db_tx: &DatabaseTransaction) -> ResultEngine<String> {
        loop {
            let seq = self.next_sequence(db_tx, ASSET_SEQUENCE).await?;
            let code = format!("{seq:05}");
            let taken = assets::Entity::find()
                .filter(assets::Column::Code.eq(code.as_str()))
                .one(db_tx)
                .await?
                .is_some();
            if !taken {
                return Ok(code);
            }
        }
    }
}
