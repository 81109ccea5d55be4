//! # storefront-core: Business Rules for the Storefront API
//!
//! This crate holds the rules of the storefront as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/api (axum handlers)                        │   │
//! │  │    /items  /items/find  /merchants  /merchants/find_all         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  search   │  │  cascade  │  │ validation│  │   │
//! │  │   │   Item    │  │ ItemSearch│  │DeletePlan │  │ItemParams │  │   │
//! │  │   │ Merchant  │  │PriceRange │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                storefront-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, repositories                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Item, Merchant, Invoice, InvoiceItem, Transaction)
//! - [`validation`] - Create/update validation for items and merchants
//! - [`search`] - Search parameter precedence, match and ordering rules
//! - [`cascade`] - The item delete plan
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::search::{ItemSearch, SearchParams};
//!
//! let params = SearchParams {
//!     name: Some("dog".to_string()),
//!     ..SearchParams::default()
//! };
//!
//! let search = ItemSearch::from_params(&params).unwrap();
//! assert!(matches!(search, ItemSearch::ByName(_)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cascade;
pub mod error;
pub mod search;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cascade::{plan_item_deletion, DeletePlan, InvoiceLink};
pub use error::{CoreError, CoreResult, SearchError, ValidationError, ValidationErrors};
pub use search::{ItemSearch, NameQuery, PriceRange, SearchParams};
pub use types::*;
pub use validation::{ItemChanges, ItemParams, MerchantParams, NewItem, NewMerchant};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest distinct-item count at which an invoice is destroyed together with
/// an item it references.
///
/// The count is taken before the deleted item's own join row is removed, so an
/// invoice whose only item is the one being deleted has a count of 1.
pub const CASCADE_MAX_INVOICE_ITEMS: i64 = 1;

/// Maximum length accepted for a search query.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;
