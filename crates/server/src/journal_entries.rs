//! Journal entry endpoints
//!
//! Lines are sent and returned in major units; `amount_total` is the signed
//! difference between debits and credits.

use api_types::{
    Envelope,
    journal_entry::{JournalEntry, JournalEntryNew, JournalEntryUpdate, MoveLine, MoveLineNew},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use engine::{EngineError, JournalEntryPatch, JournalEntryView, MoveLineView, NewJournalEntry, NewMoveLine};

use crate::{ServerError, map, server::ServerState};

fn new_line(line: MoveLineNew) -> Result<NewMoveLine, EngineError> {
    Ok(NewMoveLine {
        account_id: line.account_id,
        partner_id: line.partner_id,
        name: line.name,
        debit: map::money("debit", line.debit)?,
        credit: map::money("credit", line.credit)?,
    })
}

fn line_view(view: MoveLineView) -> MoveLine {
    MoveLine {
        id: view.line.id,
        account_id: view.line.account_id,
        account_code: view.account_code,
        account_name: view.account_name,
        partner_id: view.line.partner_id,
        partner_code: view.partner_code,
        partner_name: view.partner_name,
        name: view.line.name,
        debit: map::major(view.line.debit_minor),
        credit: map::major(view.line.credit_minor),
    }
}

fn entry_view(view: JournalEntryView) -> Result<JournalEntry, EngineError> {
    let amount_total = view.amount_total()?.to_major();
    Ok(JournalEntry {
        id: view.entry.id,
        name: view.entry.name,
        date: view.entry.date,
        reference: view.entry.reference,
        journal_id: view.entry.journal_id,
        state: map::api_move_state(view.entry.state),
        amount_total,
        lines: view.lines.into_iter().map(line_view).collect(),
    })
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Envelope<Vec<JournalEntry>>>, ServerError> {
    let entries = state.engine.journal_entries().await?;
    Ok(Json(Envelope::data(
        entries
            .into_iter()
            .map(entry_view)
            .collect::<Result<_, _>>()?,
    )))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<JournalEntry>>, ServerError> {
    let entry = state.engine.journal_entry(id).await?;
    Ok(Json(Envelope::data(entry_view(entry)?)))
}

/// Handle requests for creating a journal entry with its lines
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<JournalEntryNew>, JsonRejection>,
) -> Result<Json<Envelope<JournalEntry>>, ServerError> {
    let Json(payload) = payload?;
    let entry = state
        .engine
        .new_journal_entry(NewJournalEntry {
            name: payload.name,
            date: payload.date,
            reference: payload.reference,
            journal_id: payload.journal_id,
            state: payload.state.map(map::move_state),
            lines: payload
                .lines
                .into_iter()
                .map(new_line)
                .collect::<Result<_, _>>()?,
        })
        .await?;

    Ok(Json(
        Envelope::data(entry_view(entry)?).with_message("Journal entry created successfully"),
    ))
}

/// A `lines` array in the body replaces every stored line.
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    payload: Result<Json<JournalEntryUpdate>, JsonRejection>,
) -> Result<Json<Envelope<JournalEntry>>, ServerError> {
    let Json(payload) = payload?;
    let entry = state
        .engine
        .update_journal_entry(
            id,
            JournalEntryPatch {
                name: payload.name,
                date: payload.date,
                reference: payload.reference,
                journal_id: payload.journal_id,
                state: payload.state.map(map::move_state),
                lines: payload
                    .lines
                    .map(|lines| lines.into_iter().map(new_line).collect::<Result<_, _>>())
                    .transpose()?,
            },
        )
        .await?;

    Ok(Json(
        Envelope::data(entry_view(entry)?).with_message("Journal entry updated successfully"),
    ))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<()>>, ServerError> {
    state.engine.delete_journal_entry(id).await?;
    Ok(Json(Envelope::message("Journal entry deleted successfully")))
}
