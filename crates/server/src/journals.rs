use api_types::{
    Envelope, ListQuery,
    journal::{Journal, JournalNew},
};
use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
};
use engine::{NewJournal, journals};

use crate::{ServerError, map, server::ServerState};

fn journal_view(journal: journals::Model) -> Journal {
    Journal {
        id: journal.id,
        name: journal.name,
        code: journal.code,
        journal_type: map::api_journal_type(journal.journal_type),
        active: journal.active,
    }
}

pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<Vec<Journal>>>, ServerError> {
    let journals = state.engine.journals(query.include_inactive).await?;
    Ok(Json(Envelope::data(
        journals.into_iter().map(journal_view).collect(),
    )))
}

pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<JournalNew>, JsonRejection>,
) -> Result<Json<Envelope<Journal>>, ServerError> {
    let Json(payload) = payload?;
    let journal = state
        .engine
        .new_journal(NewJournal {
            name: payload.name,
            code: payload.code,
            journal_type: payload.journal_type.map(map::journal_type),
            active: payload.active,
        })
        .await?;

    Ok(Json(
        Envelope::data(journal_view(journal)).with_message("Journal created successfully"),
    ))
}
