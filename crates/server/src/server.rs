use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::{net::SocketAddr, sync::Arc};

use crate::{
    ServerError, accounts, assets, auto_journal, budgets, currencies, health, journal_entries,
    journals, partners, tax_groups, tax_periods, tax_reports, taxes,
};
use engine::Engine;

/// Every route below is nested under this prefix.
pub const API_PREFIX: &str = "/api/accounting";

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

impl ServerState {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(auth_header)) = auth_header else {
        return Err(ServerError::Unauthorized);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(ServerError::Unauthorized);
    }

    let Some(user) = state
        .engine
        .authenticate(auth_header.username(), auth_header.password())
        .await?
    else {
        tracing::debug!(username = auth_header.username(), "invalid credentials");
        return Err(ServerError::Unauthorized);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let api = Router::new()
        .route("/accounts", get(accounts::list).post(accounts::create))
        .route(
            "/accounts/{id}",
            get(accounts::get).put(accounts::update).delete(accounts::delete),
        )
        .route("/journals", get(journals::list).post(journals::create))
        .route(
            "/journal-entries",
            get(journal_entries::list).post(journal_entries::create),
        )
        .route(
            "/journal-entries/{id}",
            get(journal_entries::get)
                .put(journal_entries::update)
                .delete(journal_entries::delete),
        )
        .route("/partners", get(partners::list).post(partners::create))
        .route(
            "/partners/{id}",
            get(partners::get).put(partners::update).delete(partners::delete),
        )
        .route("/assets", get(assets::list).post(assets::create))
        .route("/assets/depreciate", post(assets::depreciate))
        .route(
            "/assets/{id}",
            get(assets::get).put(assets::update).delete(assets::delete),
        )
        .route("/budgets", get(budgets::list))
        .route("/currencies", get(currencies::list))
        .route("/taxes", get(taxes::list).post(taxes::create))
        .route("/taxes/compute", post(taxes::compute))
        .route(
            "/taxes/{id}",
            get(taxes::get).put(taxes::update).delete(taxes::delete),
        )
        .route("/tax-groups", get(tax_groups::list).post(tax_groups::create))
        .route("/tax-groups/{id}", delete(tax_groups::delete))
        .route(
            "/tax-periods",
            get(tax_periods::list).post(tax_periods::create),
        )
        .route("/tax-periods/{id}/close", post(tax_periods::close))
        .route("/tax-periods/{id}/open", post(tax_periods::open))
        .route(
            "/tax-reports",
            get(tax_reports::list).post(tax_reports::create),
        )
        .route(
            "/tax-reports/{id}",
            get(tax_reports::get)
                .put(tax_reports::update)
                .delete(tax_reports::delete),
        )
        .route("/tax-reports/{id}/confirm", post(tax_reports::confirm))
        .route("/tax-reports/{id}/submit", post(tax_reports::submit))
        .route("/tax-reports/{id}/generate", post(tax_reports::generate))
        .route("/auto-journal-entries", post(auto_journal::generate))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .route("/health", get(health::get));

    Router::new().nest(API_PREFIX, api).with_state(state)
}

pub async fn run(engine: Engine, addr: SocketAddr) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {addr}: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(ServerState::new(engine))).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
