//! # Storefront API
//!
//! REST server over items and merchants.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Storefront API                                  │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  items         │  │  merchants     │  │  health                    ││
//! │  │                │  │                │  │                            ││
//! │  │ • index / show │  │ • index / show │  │ • check                    ││
//! │  │ • find         │  │ • find_all     │  │                            ││
//! │  │ • create       │  │ • create       │  │                            ││
//! │  │ • update       │  │ • destroy      │  │                            ││
//! │  │ • destroy      │  │ • items        │  │                            ││
//! │  │ • merchant     │  │                │  │                            ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │          │                   │                                          │
//! │          ▼                   ▼                                          │
//! │  storefront-core (rules)  +  storefront-db (SQLite repositories)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `HTTP_HOST` - bind address (default: 0.0.0.0)
//! - `HTTP_PORT` - HTTP port (default: 3000)
//! - `DATABASE_PATH` - SQLite file (default: ./storefront.db)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `RUST_LOG` - log filter (default: info,storefront=debug)

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use handlers::router;
