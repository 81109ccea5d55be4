//! Liveness check.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use storefront_db::Database;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub database: bool,
}

/// `GET /health`: 200 when the database answers, 503 otherwise.
pub async fn check(State(db): State<Database>) -> (StatusCode, Json<Health>) {
    if db.health_check().await {
        (
            StatusCode::OK,
            Json(Health {
                status: "ok",
                database: true,
            }),
        )
    } else {
        warn!("Health check failed: database unreachable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(Health {
                status: "unavailable",
                database: false,
            }),
        )
    }
}
