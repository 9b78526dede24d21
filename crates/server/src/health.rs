use api_types::health::Health;
use axum::Json;

pub const API_VERSION: &str = "1.0";

/// Liveness check; reachable without credentials.
pub async fn get() -> Json<Health> {
    Json(Health {
        success: true,
        message: "Accounting API is running".to_string(),
        version: API_VERSION.to_string(),
    })
}
