use api_types::{
    Envelope,
    tax_group::{TaxGroup, TaxGroupNew},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use engine::{NewTaxGroup, tax_groups};

use crate::{ServerError, map, server::ServerState};

fn tax_group_view(group: tax_groups::Model) -> TaxGroup {
    TaxGroup {
        id: group.id,
        name: group.name,
        code: group.code,
        is_vat_group: group.is_vat_group,
        vat_type: map::api_vat_type(group.vat_type),
        reporting_period: map::api_report_frequency(group.reporting_period),
        description: group.description,
    }
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Envelope<Vec<TaxGroup>>>, ServerError> {
    let groups = state.engine.tax_groups().await?;
    Ok(Json(Envelope::data(
        groups.into_iter().map(tax_group_view).collect(),
    )))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<TaxGroupNew>, JsonRejection>,
) -> Result<Json<Envelope<TaxGroup>>, ServerError> {
    let Json(payload) = payload?;
    let group = state
        .engine
        .new_tax_group(NewTaxGroup {
            name: payload.name,
            code: payload.code,
            is_vat_group: payload.is_vat_group,
            vat_type: payload.vat_type.map(map::vat_type),
            reporting_period: payload.reporting_period.map(map::report_frequency),
            description: payload.description,
        })
        .await?;

    Ok(Json(
        Envelope::data(tax_group_view(group)).with_message("Tax group created successfully"),
    ))
}

/// Taxes of the group are kept and detached.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<()>>, ServerError> {
    state.engine.delete_tax_group(id).await?;
    Ok(Json(Envelope::message("Tax group deleted successfully")))
}
