use api_types::{
    Envelope,
    auto_journal::{AutoJournalEntry, AutoJournalRequest},
};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::Utc;
use engine::auto_journal::{self, AutoJournalRule};

use crate::{ServerError, server::ServerState};

/// Suggest one journal entry per rule. Nothing is stored.
pub async fn generate(
    State(_state): State<ServerState>,
    payload: Result<Json<AutoJournalRequest>, JsonRejection>,
) -> Result<Json<Envelope<Vec<AutoJournalEntry>>>, ServerError> {
    let Json(payload) = payload?;
    let rules: Vec<AutoJournalRule> = payload
        .rules
        .into_iter()
        .map(|rule| AutoJournalRule {
            account: rule.account,
            amount: rule.amount,
            partner: rule.partner,
            condition: rule.condition,
        })
        .collect();

    let entries = auto_journal::generate(&rules, Utc::now().date_naive());
    tracing::debug!(count = entries.len(), "auto journal entries generated");

    Ok(Json(Envelope::data(
        entries
            .into_iter()
            .map(|entry| AutoJournalEntry {
                date: entry.date,
                reference: entry.reference,
                account_name: entry.account_name,
                amount: entry.amount,
                partner_name: entry.partner_name,
                memo: entry.memo,
            })
            .collect(),
    )))
}
