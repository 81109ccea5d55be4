//! Item endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use storefront_core::search::{ItemSearch, SearchParams};
use storefront_core::{CoreError, ItemChanges, ItemParams};
use storefront_db::{Database, DbError};
use tracing::{debug, info};

use super::{json_body, missing_as, parse_id, query_params};
use crate::error::{ApiError, ApiResult, ErrorCode};
use crate::response::{self, Document, ItemDocument, ItemListDocument, MerchantDocument};

const ITEM_NOT_FOUND: &str = "Item not found";
const CREATE_FAILED: &str = "Unable to create item";
const UPDATE_FAILED: &str = "Unable to update item";

/// `GET /items`
pub async fn index(State(db): State<Database>) -> ApiResult<Json<ItemListDocument>> {
    let items = db.items().list_all().await?;
    if items.is_empty() {
        return Err(ApiError::not_found("No Items Found"));
    }
    Ok(Json(response::items(items)))
}

/// `GET /items/find`
///
/// Name search answers `{"data": {}}` when nothing matches; price search
/// answers `no_matches_found`.
pub async fn find(
    State(db): State<Database>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Response> {
    let params = query_params(params)?;
    let search = ItemSearch::from_params(&params).map_err(CoreError::from)?;
    debug!(?search, "Item find");

    let found = db.items().search(&search).await?;

    match search.resolve(found)? {
        Some(item) => Ok(Json(response::item(item)).into_response()),
        None => Ok(Json(Document::empty()).into_response()),
    }
}

/// `GET /items/{id}`
pub async fn show(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> ApiResult<Json<ItemDocument>> {
    let id = parse_id(&id, ITEM_NOT_FOUND)?;
    let item = db
        .items()
        .get_by_id(id)
        .await?
        .ok_or(CoreError::ItemNotFound(id))?;
    Ok(Json(response::item(item)))
}

/// `POST /items`
pub async fn create(
    State(db): State<Database>,
    body: Result<Json<ItemParams>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ItemDocument>)> {
    let params = json_body(body)?;
    let new_item = params
        .validate()
        .map_err(|errors| ApiError::unprocessable(CREATE_FAILED, &errors))?;

    let item = db
        .items()
        .insert(&new_item)
        .await
        .map_err(|e| write_failure(e, CREATE_FAILED))?;

    Ok((StatusCode::CREATED, Json(response::item(item))))
}

/// `PATCH /items/{id}` and `PUT /items/{id}`
///
/// Only supplied fields change; the merged record is validated as a whole.
pub async fn update(
    State(db): State<Database>,
    Path(id): Path<String>,
    body: Result<Json<ItemChanges>, JsonRejection>,
) -> ApiResult<Json<ItemDocument>> {
    let id = parse_id(&id, ITEM_NOT_FOUND)?;
    let changes = json_body(body)?;

    let current = db
        .items()
        .get_by_id(id)
        .await?
        .ok_or(CoreError::ItemNotFound(id))?;

    let merged = changes
        .apply(&current)
        .map_err(|errors| ApiError::unprocessable(UPDATE_FAILED, &errors))?;

    let item = db
        .items()
        .update(&merged)
        .await
        .map_err(|e| write_failure(e, UPDATE_FAILED))?;

    Ok(Json(response::item(item)))
}

/// `DELETE /items/{id}`
pub async fn destroy(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, ITEM_NOT_FOUND)?;
    let plan = db
        .items()
        .delete_with_cascade(id)
        .await
        .map_err(|e| missing_as(e, CoreError::ItemNotFound(id)))?;

    info!(
        item_id = id,
        invoices_deleted = ?plan.invoices_to_delete,
        "Item destroyed"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /items/{id}/merchant`
pub async fn merchant(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> ApiResult<Json<MerchantDocument>> {
    let id = parse_id(&id, ITEM_NOT_FOUND)?;
    let merchant = db
        .merchants()
        .get_for_item(id)
        .await?
        .ok_or(CoreError::ItemNotFound(id))?;
    Ok(Json(response::merchant(merchant)))
}

/// Create and update failures are reported under one message.
fn write_failure(error: DbError, message: &str) -> ApiError {
    match error {
        DbError::NotFound { .. } => ApiError::not_found(ITEM_NOT_FOUND),
        other => {
            let api: ApiError = other.into();
            if api.code == ErrorCode::Unprocessable {
                api.with_message(message)
                    .with_details(vec!["merchant must exist".to_string()])
            } else {
                api
            }
        }
    }
}
