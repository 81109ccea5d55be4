//! Error types for the Storefront API.
//!
//! Every failure leaves the server as
//!
//! ```json
//! { "errors": { "code": "not_found", "message": "Item not found", "details": [] } }
//! ```
//!
//! with the status fixed by its [`ErrorCode`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use storefront_core::{CoreError, SearchError, ValidationErrors};
use storefront_db::DbError;

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error category reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidParameters,
    BadRequest,
    NoMatchesFound,
    NotFound,
    Unprocessable,
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::InvalidParameters | ErrorCode::BadRequest | ErrorCode::NoMatchesFound => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidParameters => "invalid_parameters",
            ErrorCode::BadRequest => "bad_request",
            ErrorCode::NoMatchesFound => "no_matches_found",
            ErrorCode::NotFound => "not_found",
            ErrorCode::Unprocessable => "unprocessable",
            ErrorCode::Internal => "internal",
        }
    }
}

/// An error as the client sees it.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{}: {message}", .code.as_str())]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Vec<String>,
}

#[derive(Serialize)]
struct ErrorEnvelope<'a> {
    errors: &'a ApiError,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// Replaces the message, keeping code and details.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    pub fn no_matches() -> Self {
        ApiError::new(ErrorCode::NoMatchesFound, "No matches found")
    }

    pub fn unprocessable(message: impl Into<String>, errors: &ValidationErrors) -> Self {
        ApiError::new(ErrorCode::Unprocessable, message).with_details(errors.messages())
    }

    pub fn internal() -> Self {
        ApiError::new(ErrorCode::Internal, "Internal server error")
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.code {
            ErrorCode::Internal => tracing::error!(message = %self.message, "Request failed"),
            _ => tracing::debug!(code = self.code.as_str(), message = %self.message, "Request rejected"),
        }

        (self.status(), Json(ErrorEnvelope { errors: &self })).into_response()
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<SearchError> for ApiError {
    fn from(error: SearchError) -> Self {
        let code = if error.is_invalid_combination() {
            ErrorCode::InvalidParameters
        } else {
            ErrorCode::BadRequest
        };
        ApiError::new(code, error.to_string()).with_details(vec![error.to_string()])
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::ItemNotFound(_) => ApiError::not_found("Item not found"),
            CoreError::MerchantNotFound(_) => ApiError::not_found("Merchant not found"),
            CoreError::NoMatchesFound => ApiError::no_matches(),
            CoreError::Search(e) => e.into(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::NotFound { entity, .. } => ApiError::not_found(format!("{entity} not found")),
            DbError::ForeignKeyViolation { message } => {
                ApiError::new(ErrorCode::Unprocessable, "Referenced record does not exist")
                    .with_details(vec![message])
            }
            other => {
                tracing::error!(error = %other, "Database failure");
                ApiError::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::ValidationError;

    #[test]
    fn test_statuses() {
        assert_eq!(ErrorCode::InvalidParameters.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NoMatchesFound.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::Unprocessable.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ErrorCode::Internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_search_errors() {
        let err: ApiError = SearchError::ConflictingParameters.into();
        assert_eq!(err.code, ErrorCode::InvalidParameters);

        let err: ApiError = SearchError::NegativePrice {
            bound: "min_price".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::BadRequest);
    }

    #[test]
    fn test_core_errors() {
        let err: ApiError = CoreError::NoMatchesFound.into();
        assert_eq!(err.code, ErrorCode::NoMatchesFound);

        let err: ApiError = CoreError::MerchantNotFound(9).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Merchant not found");

        let err: ApiError = CoreError::from(SearchError::ConflictingParameters).into();
        assert_eq!(err.code, ErrorCode::InvalidParameters);
    }

    #[test]
    fn test_db_errors() {
        let err: ApiError = DbError::not_found("Item", 4).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Item not found");

        let err: ApiError = DbError::PoolExhausted.into();
        assert_eq!(err.code, ErrorCode::Internal);
    }

    #[test]
    fn test_envelope_shape() {
        let errors: ValidationErrors = ValidationError::required("unit_price").into();
        let err = ApiError::unprocessable("Unable to create item", &errors);

        let json = serde_json::to_value(ErrorEnvelope { errors: &err }).unwrap();
        assert_eq!(json["errors"]["code"], "unprocessable");
        assert_eq!(json["errors"]["message"], "Unable to create item");
        assert_eq!(json["errors"]["details"][0], "unit_price is required");
    }
}
