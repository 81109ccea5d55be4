//! # Repository Module
//!
//! Database repository implementations for the storefront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.items().search(&ItemSearch::from_params(&params)?)         │
//! │       ▼                                                                 │
//! │  ItemRepository / MerchantRepository / InvoiceRepository               │
//! │       │                                                                 │
//! │       │  query.rs renders filters + ordering with QueryBuilder         │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Rules (precedence, validation, cascade plan) live in storefront-core; │
//! │  repositories only execute them.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`item::ItemRepository`] - Item CRUD, search and cascade delete
//! - [`merchant::MerchantRepository`] - Merchant CRUD, search and cascade delete
//! - [`invoice::InvoiceRepository`] - Invoices, invoice items and transactions

pub mod invoice;
pub mod item;
pub mod merchant;
pub mod query;
