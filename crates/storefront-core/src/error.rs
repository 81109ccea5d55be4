//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError         - General domain errors                         │
//! │  ├── SearchError       - Rejected search parameters                    │
//! │  ├── ValidationError   - One field-level failure                       │
//! │  └── ValidationErrors  - Every failure found for one record            │
//! │                                                                         │
//! │  storefront-db errors (separate crate)                                 │
//! │  └── DbError           - Database operation failures                   │
//! │                                                                         │
//! │  API errors (apps/api)                                                 │
//! │  └── ApiError          - What the HTTP client sees                     │
//! │                                                                         │
//! │  Flow: SearchError → CoreError → ApiError → Client                     │
//! │        ValidationErrors ────────────► ApiError → Client                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Item id does not exist.
    #[error("Item not found: {0}")]
    ItemNotFound(i64),

    /// Merchant id does not exist.
    #[error("Merchant not found: {0}")]
    MerchantNotFound(i64),

    /// A valid search found nothing.
    #[error("no matches found")]
    NoMatchesFound,

    /// Search parameters were rejected before any query ran.
    #[error(transparent)]
    Search(#[from] SearchError),
}

// =============================================================================
// Search Error
// =============================================================================

/// Search parameter errors.
///
/// ## Precedence
/// ```text
/// name + min_price/max_price ──► ConflictingParameters   (checked first)
///          │
///          ▼
/// min_price/max_price not a number ──► InvalidPrice
///          │
///          ▼
/// min_price/max_price < 0 ──► NegativePrice
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// Name and price bounds supplied together.
    #[error("cannot send name with price")]
    ConflictingParameters,

    /// No search parameter supplied at all.
    #[error("{0} parameter is required")]
    MissingParameter(String),

    /// A price bound is below zero.
    #[error("{bound} cannot be negative")]
    NegativePrice { bound: String },

    /// A price bound is not a finite number.
    #[error("{bound} must be a number")]
    InvalidPrice { bound: String },

    /// Query text is longer than allowed.
    #[error("{field} must be at most {max} characters")]
    QueryTooLong { field: String, max: usize },
}

impl SearchError {
    /// Whether this error is a parameter-combination problem rather than an
    /// out-of-range value.
    pub fn is_invalid_combination(&self) -> bool {
        matches!(
            self,
            SearchError::ConflictingParameters | SearchError::MissingParameter(_)
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field must hold a number.
    #[error("{field} must be a number")]
    NotNumeric { field: String },

    /// Field must hold a whole number.
    #[error("{field} must be an integer")]
    NotInteger { field: String },
}

impl ValidationError {
    pub fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub fn not_numeric(field: &str) -> Self {
        ValidationError::NotNumeric {
            field: field.to_string(),
        }
    }

    pub fn not_integer(field: &str) -> Self {
        ValidationError::NotInteger {
            field: field.to_string(),
        }
    }

    /// Name of the field that failed.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::NotNumeric { field }
            | ValidationError::NotInteger { field } => field,
        }
    }
}

/// Every validation failure found for one record.
///
/// Never empty when returned as an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        ValidationErrors(Vec::new())
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Whether any failure concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }

    /// Human-readable messages, one per failure.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors(vec![error])
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
