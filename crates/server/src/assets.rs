//! Fixed asset endpoints and the depreciation preview.

use api_types::{
    Envelope, ListQuery,
    asset::{
        Asset, AssetNew, AssetUpdate, DepreciateRequest, DepreciationEntry, DepreciationJournal,
        DepreciationJournalLine,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use chrono::Utc;
use engine::{AssetDepreciation, AssetPatch, NewAsset, assets, depreciation::PreviewEntry};

use crate::{ServerError, map, server::ServerState};

fn asset_view(asset: assets::Model) -> Asset {
    let purchase_value = map::major(asset.value_minor);
    Asset {
        id: asset.id,
        name: asset.name,
        code: asset.code,
        purchase_date: asset.purchase_date,
        purchase_value,
        current_value: purchase_value,
        depreciation_method: map::api_depreciation_method(asset.depreciation_method),
        useful_life: asset.useful_life,
        residual_value: map::major(asset.residual_value_minor),
        active: asset.active,
    }
}

fn journal_view(entry: PreviewEntry) -> DepreciationJournal {
    DepreciationJournal {
        reference: entry.reference,
        lines: entry
            .lines
            .into_iter()
            .map(|line| DepreciationJournalLine {
                account_name: line.account_name.to_string(),
                debit: line.debit.to_major(),
                credit: line.credit.to_major(),
            })
            .collect(),
    }
}

fn depreciation_view(item: AssetDepreciation) -> DepreciationEntry {
    DepreciationEntry {
        asset_id: item.asset_id,
        depreciation_amount: item.line.amount.to_major(),
        date: item.line.date,
        journal_entry: item.line.journal_entry.map(journal_view),
        reason: item.line.reason,
        useful_life: item.line.useful_life,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<Vec<Asset>>>, ServerError> {
    let assets = state.engine.assets(query.include_inactive).await?;
    Ok(Json(Envelope::data(assets.into_iter().map(asset_view).collect())))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<Asset>>, ServerError> {
    let asset = state.engine.asset(id).await?;
    Ok(Json(Envelope::data(asset_view(asset))))
}

/// Handle requests for registering an asset. The code is generated when absent.
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<AssetNew>, JsonRejection>,
) -> Result<Json<Envelope<Asset>>, ServerError> {
    let Json(payload) = payload?;
    let asset = state
        .engine
        .new_asset(NewAsset {
            name: payload.name,
            code: payload.code,
            purchase_date: payload.purchase_date,
            value: map::opt_money("purchase_value", payload.purchase_value)?,
            depreciation_method: payload.depreciation_method.map(map::depreciation_method),
            useful_life: payload.useful_life,
            residual_value: map::opt_money("residual_value", payload.residual_value)?,
            active: payload.active,
        })
        .await?;

    Ok(Json(
        Envelope::data(asset_view(asset)).with_message("Asset created successfully"),
    ))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    payload: Result<Json<AssetUpdate>, JsonRejection>,
) -> Result<Json<Envelope<Asset>>, ServerError> {
    let Json(payload) = payload?;
    let asset = state
        .engine
        .update_asset(
            id,
            AssetPatch {
                name: payload.name,
                code: payload.code,
                purchase_date: payload.purchase_date,
                value: map::opt_money("purchase_value", payload.purchase_value)?,
                depreciation_method: payload.depreciation_method.map(map::depreciation_method),
                useful_life: payload.useful_life,
                residual_value: map::opt_money("residual_value", payload.residual_value)?,
                active: payload.active,
            },
        )
        .await?;

    Ok(Json(
        Envelope::data(asset_view(asset)).with_message("Asset updated successfully"),
    ))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<()>>, ServerError> {
    state.engine.delete_asset(id).await?;
    Ok(Json(Envelope::message("Asset deleted successfully")))
}

/// Depreciation schedule of the requested assets as of today. Nothing is
/// posted.
pub async fn depreciate(
    State(state): State<ServerState>,
    payload: Result<Json<DepreciateRequest>, JsonRejection>,
) -> Result<Json<Envelope<Vec<DepreciationEntry>>>, ServerError> {
    let Json(payload) = payload?;
    let today = Utc::now().date_naive();
    let lines = state
        .engine
        .depreciate_assets(&payload.asset_ids, today)
        .await?;

    Ok(Json(Envelope::data(
        lines.into_iter().map(depreciation_view).collect(),
    )))
}
