//! Merchant endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use storefront_core::search::NameQuery;
use storefront_core::{CoreError, MerchantParams};
use storefront_db::Database;
use tracing::info;

use super::{json_body, missing_as, parse_id, query_params};
use crate::error::{ApiError, ApiResult};
use crate::response::{self, ItemListDocument, MerchantDocument, MerchantListDocument};

const MERCHANT_NOT_FOUND: &str = "Merchant not found";
const MERCHANT_ITEM_NOT_FOUND: &str = "Merchant item not found";

/// Query string of `GET /merchants/find_all`.
#[derive(Debug, Default, Deserialize)]
pub struct FindAllParams {
    pub name: Option<String>,
}

/// `GET /merchants`
pub async fn index(State(db): State<Database>) -> ApiResult<Json<MerchantListDocument>> {
    let merchants = db.merchants().list_all().await?;
    if merchants.is_empty() {
        return Err(ApiError::not_found("No Merchants Found"));
    }
    Ok(Json(response::merchants(merchants)))
}

/// `GET /merchants/find_all?name=`
///
/// No match is an empty list, not an error.
pub async fn find_all(
    State(db): State<Database>,
    params: Result<Query<FindAllParams>, QueryRejection>,
) -> ApiResult<Json<MerchantListDocument>> {
    let params = query_params(params)?;
    let query = NameQuery::required(&params.name).map_err(CoreError::from)?;
    let merchants = db.merchants().search_by_name(&query).await?;
    Ok(Json(response::merchants(merchants)))
}

/// `GET /merchants/{id}`
pub async fn show(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> ApiResult<Json<MerchantDocument>> {
    let id = parse_id(&id, MERCHANT_NOT_FOUND)?;
    let merchant = db
        .merchants()
        .get_by_id(id)
        .await?
        .ok_or(CoreError::MerchantNotFound(id))?;
    Ok(Json(response::merchant(merchant)))
}

/// `POST /merchants`
pub async fn create(
    State(db): State<Database>,
    body: Result<Json<MerchantParams>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MerchantDocument>)> {
    let params = json_body(body)?;
    let new_merchant = params
        .validate()
        .map_err(|errors| ApiError::unprocessable("Unable to create merchant", &errors))?;

    let merchant = db.merchants().insert(&new_merchant).await?;
    Ok((StatusCode::CREATED, Json(response::merchant(merchant))))
}

/// `DELETE /merchants/{id}`
pub async fn destroy(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, MERCHANT_NOT_FOUND)?;
    let deletion = db
        .merchants()
        .delete_with_cascade(id)
        .await
        .map_err(|e| missing_as(e, CoreError::MerchantNotFound(id)))?;

    info!(?deletion, "Merchant destroyed");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /merchants/{id}/items`
pub async fn items(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> ApiResult<Json<ItemListDocument>> {
    let id = parse_id(&id, MERCHANT_ITEM_NOT_FOUND)?;
    let items = db.items().list_for_merchant(id).await?;
    if items.is_empty() {
        return Err(ApiError::not_found(MERCHANT_ITEM_NOT_FOUND));
    }
    Ok(Json(response::items(items)))
}
