//! # Domain Types
//!
//! Entities stored by the storefront.
//!
//! ## Relationships
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Merchant 1 ──────< Item >──────┐                                     │
//! │      │                           │                                      │
//! │      │                     InvoiceItem (quantity, unit_price)          │
//! │      │                           │                                      │
//! │      └─────────< Invoice >───────┘                                     │
//! │                    │                                                    │
//! │                    └──────< Transaction                                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ids are database-assigned integers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Merchant
// =============================================================================

/// A seller owning items and invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Merchant {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Item
// =============================================================================

/// A sellable product owned by a merchant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Item {
    /// Unique identifier.
    pub id: i64,

    /// Display name. Never blank.
    pub name: String,

    /// Never blank.
    pub description: String,

    /// Price per unit.
    pub unit_price: f64,

    /// Owning merchant.
    pub merchant_id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Invoice
// =============================================================================

/// Invoice state as recorded by the merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Packaged,
    Shipped,
    Cancelled,
}

/// A merchant's invoice linking a set of items through [`InvoiceItem`] rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: i64,
    pub merchant_id: i64,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Invoice Item
// =============================================================================

/// Join row recording one item's inclusion in one invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceItem {
    pub id: i64,
    pub invoice_id: i64,
    pub item_id: i64,
    pub quantity: i64,
    /// Unit price at the time the item was invoiced.
    pub unit_price: f64,
}

// =============================================================================
// Transaction
// =============================================================================

/// Outcome of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum TransactionResult {
    Success,
    Failed,
}

/// A payment attempt recorded against an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: i64,
    pub invoice_id: i64,
    pub credit_card_number: String,
    pub result: TransactionResult,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoice_status_default() {
        assert_eq!(InvoiceStatus::default(), InvoiceStatus::Pending);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&InvoiceStatus::Shipped).unwrap();
        assert_eq!(json, "\"shipped\"");

        let json = serde_json::to_string(&TransactionResult::Failed).unwrap();
        assert_eq!(json, "\"failed\"");
    }
}
