//! # Validation Module
//!
//! Create and update validation for items and merchants.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (apps/api)                                      │
//! │  └── JSON deserialization into ItemParams / ItemChanges                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── presence of name, description, unit_price, merchant_id            │
//! │  ├── numeric unit_price, integer merchant_id                           │
//! │  └── every failure collected into ValidationErrors                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── Foreign key constraints (merchant must exist)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Raw numeric fields arrive as [`serde_json::Value`] so that a client sending
//! `"unit_price": "abc"` gets a validation failure instead of a body
//! deserialization error. Numeric strings such as `"12.50"` are accepted.
//!
//! ## Usage
//! ```rust
//! use serde_json::json;
//! use storefront_core::validation::ItemParams;
//!
//! let params: ItemParams = serde_json::from_value(json!({
//!     "name": "dog bowl",
//!     "description": "cute dog bowl",
//!     "unit_price": "12.50",
//!     "merchant_id": 1
//! }))
//! .unwrap();
//!
//! let item = params.validate().unwrap();
//! assert_eq!(item.unit_price, 12.5);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ValidationError, ValidationErrors};
use crate::types::Item;

// =============================================================================
// Item Creation
// =============================================================================

/// Raw item attributes as supplied by a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<Value>,
    pub merchant_id: Option<Value>,
}

/// Item attributes that passed validation and can be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub unit_price: f64,
    pub merchant_id: i64,
}

impl ItemParams {
    /// Validates every field and reports all failures at once.
    pub fn validate(&self) -> Result<NewItem, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = collect(&mut errors, require_text("name", self.name.as_deref()));
        let description = collect(
            &mut errors,
            require_text("description", self.description.as_deref()),
        );
        let unit_price = collect(
            &mut errors,
            require_number("unit_price", self.unit_price.as_ref()),
        );
        let merchant_id = collect(
            &mut errors,
            require_id("merchant_id", self.merchant_id.as_ref()),
        );

        match (name, description, unit_price, merchant_id) {
            (Some(name), Some(description), Some(unit_price), Some(merchant_id))
                if errors.is_empty() =>
            {
                Ok(NewItem {
                    name,
                    description,
                    unit_price,
                    merchant_id,
                })
            }
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Item Update
// =============================================================================

/// A partial item update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<Value>,
    pub merchant_id: Option<Value>,
}

impl ItemChanges {
    /// True when no field was supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.unit_price.is_none()
            && self.merchant_id.is_none()
    }

    /// Applies the changes to `item` and validates the result.
    ///
    /// `item` itself is never modified; on failure the caller keeps the
    /// stored record as it was.
    pub fn apply(&self, item: &Item) -> Result<Item, ValidationErrors> {
        let merged = ItemParams {
            name: Some(self.name.clone().unwrap_or_else(|| item.name.clone())),
            description: Some(
                self.description
                    .clone()
                    .unwrap_or_else(|| item.description.clone()),
            ),
            unit_price: Some(
                self.unit_price
                    .clone()
                    .unwrap_or_else(|| Value::from(item.unit_price)),
            ),
            merchant_id: Some(
                self.merchant_id
                    .clone()
                    .unwrap_or_else(|| Value::from(item.merchant_id)),
            ),
        };

        let valid = merged.validate()?;

        Ok(Item {
            id: item.id,
            name: valid.name,
            description: valid.description,
            unit_price: valid.unit_price,
            merchant_id: valid.merchant_id,
            created_at: item.created_at,
            updated_at: item.updated_at,
        })
    }
}

// =============================================================================
// Merchant Creation
// =============================================================================

/// Raw merchant attributes as supplied by a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MerchantParams {
    pub name: Option<String>,
}

/// Merchant attributes that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMerchant {
    pub name: String,
}

impl MerchantParams {
    pub fn validate(&self) -> Result<NewMerchant, ValidationErrors> {
        let name = require_text("name", self.name.as_deref())?;
        Ok(NewMerchant { name })
    }
}

// =============================================================================
// Field Validators
// =============================================================================

fn collect<T>(errors: &mut ValidationErrors, result: Result<T, ValidationError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

/// Requires a non-blank string.
pub fn require_text(field: &str, value: Option<&str>) -> Result<String, ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(ValidationError::required(field)),
    }
}

/// Requires a finite number, given as a JSON number or numeric string.
pub fn require_number(field: &str, value: Option<&Value>) -> Result<f64, ValidationError> {
    let parsed = match value {
        None | Some(Value::Null) => return Err(ValidationError::required(field)),
        Some(Value::String(s)) if s.trim().is_empty() => {
            return Err(ValidationError::required(field))
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::not_numeric(field))
}

/// Requires an integer id, given as a JSON number or numeric string.
pub fn require_id(field: &str, value: Option<&Value>) -> Result<i64, ValidationError> {
    match value {
        None | Some(Value::Null) => Err(ValidationError::required(field)),
        Some(Value::String(s)) if s.trim().is_empty() => Err(ValidationError::required(field)),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(id) => Ok(id),
            None if n.as_f64().is_some() => Err(ValidationError::not_integer(field)),
            None => Err(ValidationError::not_numeric(field)),
        },
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>().map_err(|_| {
                if s.parse::<f64>().is_ok() {
                    ValidationError::not_integer(field)
                } else {
                    ValidationError::not_numeric(field)
                }
            })
        }
        Some(_) => Err(ValidationError::not_numeric(field)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
