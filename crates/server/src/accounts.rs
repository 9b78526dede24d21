//! Chart of accounts endpoints

use api_types::{
    Envelope,
    account::{Account, AccountNew, AccountUpdate},
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use engine::{AccountPatch, AccountView, NewAccount};

use crate::{ServerError, map, server::ServerState};

fn account_view(view: AccountView) -> Account {
    Account {
        id: view.account.id,
        name: view.account.name,
        code: view.account.code,
        account_type: map::api_account_type(view.account.account_type),
        parent_id: view.account.parent_id,
        parent_name: view.parent_name,
        child_ids: view.child_ids,
    }
}

/// Handle requests for listing every account
pub async fn list(State(state): State<ServerState>) -> Result<Json<Envelope<Vec<Account>>>, ServerError> {
    let accounts = state.engine.accounts().await?;
    Ok(Json(Envelope::data(
        accounts.into_iter().map(account_view).collect(),
    )))
}

pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<Account>>, ServerError> {
    let account = state.engine.account(id).await?;
    Ok(Json(Envelope::data(account_view(account))))
}

/// Handle requests for creating a new account
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<AccountNew>, JsonRejection>,
) -> Result<Json<Envelope<Account>>, ServerError> {
    let Json(payload) = payload?;
    let account = state
        .engine
        .new_account(NewAccount {
            name: payload.name,
            code: payload.code,
            account_type: payload.account_type.map(map::account_type),
            parent_id: payload.parent_id,
        })
        .await?;

    Ok(Json(
        Envelope::data(account_view(account)).with_message("Account created successfully"),
    ))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    payload: Result<Json<AccountUpdate>, JsonRejection>,
) -> Result<Json<Envelope<Account>>, ServerError> {
    let Json(payload) = payload?;
    let account = state
        .engine
        .update_account(
            id,
            AccountPatch {
                name: payload.name,
                code: payload.code,
                account_type: payload.account_type.map(map::account_type),
                parent_id: payload.parent_id,
            },
        )
        .await?;

    Ok(Json(
        Envelope::data(account_view(account)).with_message("Account updated successfully"),
    ))
}

/// Deleting an account removes its sub-accounts and journal lines too.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<Envelope<()>>, ServerError> {
    state.engine.delete_account(id).await?;
    Ok(Json(Envelope::message("Account deleted successfully")))
}
