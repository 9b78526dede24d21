use api_types::{
    Envelope, ListQuery,
    tax_period::{TaxPeriod, TaxPeriodNew},
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use engine::{NewTaxPeriod, tax_periods};

use crate::{ServerError, map, server::ServerState};

fn tax_period_view(period: tax_periods::Model) -> TaxPeriod {
    TaxPeriod {
        id: period.id,
        name: period.name,
        date_start: period.date_start,
        date_end: period.date_end,
        active: period.active,
        period_type: map::api_report_frequency(period.period_type),
        deadline_date: period.deadline_date,
        state: map::api_tax_period_state(period.state),
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<Vec<TaxPeriod>>>, ServerError> {
    let periods = state.engine.tax_periods(query.include_inactive).await?;
    Ok(Json(Envelope::data(
        periods.into_iter().map(tax_period_view).collect(),
    )))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<TaxPeriodNew>, JsonRejection>,
) -> Result<Json<Envelope<TaxPeriod>>, ServerError> {
    let Json(payload) = payload?;
    let period = state
        .engine
        .new_tax_period(NewTaxPeriod {
            name: payload.name,
            date_start: payload.date_start,
            date_end: payload.date_end,
            active: payload.active,
            period_type: payload.period_type.map(map::report_frequency),
            deadline_date: payload.deadline_date,
        })
        .await?;

    Ok(Json(
        Envelope::data(tax_period_view(period)).with_message("Tax period created successfully"),
    ))
}

pub async fn close(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<TaxPeriod>>, ServerError> {
    let period = state.engine.close_tax_period(id).await?;
    Ok(Json(
        Envelope::data(tax_period_view(period)).with_message("Tax period closed"),
    ))
}

pub async fn open(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<TaxPeriod>>, ServerError> {
    let period = state.engine.open_tax_period(id).await?;
    Ok(Json(
        Envelope::data(tax_period_view(period)).with_message("Tax period reopened"),
    ))
}
