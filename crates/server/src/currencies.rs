use api_types::{Envelope, ListQuery, currency::Currency};
use axum::{
    Json,
    extract::{Query, State},
};

use crate::{ServerError, server::ServerState};

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<Vec<Currency>>>, ServerError> {
    let currencies = state.engine.currencies(query.include_inactive).await?;
    Ok(Json(Envelope::data(
        currencies
            .into_iter()
            .map(|currency| Currency {
                id: currency.id,
                name: currency.name,
                code: currency.code,
                symbol: currency.symbol,
                rate: currency.rate,
                active: currency.active,
            })
            .collect(),
    )))
}
