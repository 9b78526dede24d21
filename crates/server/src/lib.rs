use api_types::Envelope;
use axum::{Json, extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod accounts;
mod assets;
mod auto_journal;
mod budgets;
mod currencies;
mod health;
mod journal_entries;
mod journals;
mod map;
mod partners;
mod server;
mod tax_groups;
mod tax_periods;
mod tax_reports;
mod taxes;

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
    Unauthorized,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::MissingField(_) | EngineError::InvalidValue(_) => StatusCode::BAD_REQUEST,
        EngineError::ExistingKey(_) | EngineError::InvalidState(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => {
            tracing::debug!("request rejected: {other}");
            other.to_string()
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
            ServerError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
        };

        (status, Json(Envelope::error(error))).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        tracing::debug!("malformed body: {value}");
        Self::Generic(value.body_text())
    }
}
