//! # HTTP Handlers
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  /api/v1                                                               │
//! │  ├── GET    /items                 items::index                        │
//! │  ├── POST   /items                 items::create                       │
//! │  ├── GET    /items/find            items::find                         │
//! │  ├── GET    /items/{id}            items::show                         │
//! │  ├── PATCH  /items/{id}            items::update   (PUT too)           │
//! │  ├── DELETE /items/{id}            items::destroy  (cascade)           │
//! │  ├── GET    /items/{id}/merchant   items::merchant                     │
//! │  ├── GET    /merchants             merchants::index                    │
//! │  ├── POST   /merchants             merchants::create                   │
//! │  ├── GET    /merchants/find_all    merchants::find_all                 │
//! │  ├── GET    /merchants/{id}        merchants::show                     │
//! │  ├── DELETE /merchants/{id}        merchants::destroy (cascade)        │
//! │  ├── GET    /merchants/{id}/items  merchants::items                    │
//! │  └── GET    /health                health::check                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers share one [`Database`] as router state.

pub mod health;
pub mod items;
pub mod merchants;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    routing::get,
    Json, Router,
};
use storefront_core::CoreError;
use storefront_db::{Database, DbError};
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ApiResult};

/// Builds the application router.
pub fn router(db: Database) -> Router {
    let api = Router::new()
        .route("/items", get(items::index).post(items::create))
        .route("/items/find", get(items::find))
        .route(
            "/items/{id}",
            get(items::show)
                .patch(items::update)
                .put(items::update)
                .delete(items::destroy),
        )
        .route("/items/{id}/merchant", get(items::merchant))
        .route("/merchants", get(merchants::index).post(merchants::create))
        .route("/merchants/find_all", get(merchants::find_all))
        .route(
            "/merchants/{id}",
            get(merchants::show).delete(merchants::destroy),
        )
        .route("/merchants/{id}/items", get(merchants::items))
        .route("/health", get(health::check));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

/// Parses a path id. Anything that isn't an integer names no record.
pub(crate) fn parse_id(raw: &str, missing: &str) -> ApiResult<i64> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::not_found(missing))
}

/// Unwraps a JSON body, reporting a malformed one in the error envelope.
pub(crate) fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(value)| value).map_err(|rejection| {
        ApiError::bad_request("Malformed request body").with_details(vec![rejection.body_text()])
    })
}

/// Unwraps a query string, reporting a malformed one in the error envelope.
pub(crate) fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    params.map(|Query(value)| value).map_err(|rejection| {
        ApiError::bad_request("Malformed query string").with_details(vec![rejection.body_text()])
    })
}

/// Reports a store-level not-found as `missing`.
pub(crate) fn missing_as(error: DbError, missing: CoreError) -> ApiError {
    if error.is_not_found() {
        missing.into()
    } else {
        error.into()
    }
}
