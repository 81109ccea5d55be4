//! # Merchant Repository
//!
//! Database operations for merchants.
//!
//! ## Destroying a Merchant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  delete_with_cascade(merchant_id)        one transaction               │
//! │                                                                         │
//! │  1. every invoice of the merchant  ──► destroy_invoice (tx + items)    │
//! │  2. invoice_items on OTHER merchants' invoices that point at this      │
//! │     merchant's items                                                   │
//! │  3. the merchant's items                                               │
//! │  4. the merchant                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unlike item deletion there is no plan: everything the merchant owns goes.

use chrono::Utc;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::invoice::destroy_invoice;
use crate::repository::query::{self, MERCHANT_COLUMNS};
use storefront_core::search::{filter_merchants, NameQuery};
use storefront_core::{Merchant, NewMerchant};

/// What a merchant delete removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MerchantDeletion {
    pub merchant_id: i64,
    pub invoices_deleted: usize,
    pub items_deleted: u64,
    /// Join rows removed from invoices belonging to other merchants.
    pub foreign_invoice_items_deleted: u64,
}

/// Repository for merchant database operations.
#[derive(Debug, Clone)]
pub struct MerchantRepository {
    pool: SqlitePool,
}

impl MerchantRepository {
    /// Creates a new MerchantRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MerchantRepository { pool }
    }

    /// Lists every merchant by id.
    pub async fn list_all(&self) -> DbResult<Vec<Merchant>> {
        let mut builder = query::select(MERCHANT_COLUMNS, "merchants");
        builder.push(" ORDER BY id");

        let merchants = builder
            .build_query_as::<Merchant>()
            .fetch_all(&self.pool)
            .await?;

        Ok(merchants)
    }

    /// Gets a merchant by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Merchant>> {
        let mut builder = query::select(MERCHANT_COLUMNS, "merchants");
        builder.push(" WHERE id = ").push_bind(id);

        let merchant = builder
            .build_query_as::<Merchant>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(merchant)
    }

    /// Whether a merchant exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM merchants WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// All merchants whose name contains `query`, in name order.
    ///
    /// Zero matches is an empty list.
    pub async fn search_by_name(&self, query: &NameQuery) -> DbResult<Vec<Merchant>> {
        debug!(query = query.as_str(), "Searching merchants");

        let all = self.list_all().await?;
        let merchants = filter_merchants(&all, query)
            .into_iter()
            .cloned()
            .collect();

        Ok(merchants)
    }

    /// The merchant owning an item.
    ///
    /// ## Returns
    /// * `Ok(None)` - item doesn't exist
    pub async fn get_for_item(&self, item_id: i64) -> DbResult<Option<Merchant>> {
        let merchant = sqlx::query_as::<_, Merchant>(
            r#"
            SELECT m.id, m.name, m.created_at, m.updated_at
            FROM merchants m
            JOIN items i ON i.merchant_id = m.id
            WHERE i.id = ?1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(merchant)
    }

    /// Inserts a validated merchant.
    pub async fn insert(&self, merchant: &NewMerchant) -> DbResult<Merchant> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO merchants (name, created_at, updated_at) VALUES (?1, ?2, ?2)",
        )
        .bind(&merchant.name)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(id, name = %merchant.name, "Created merchant");

        Ok(Merchant {
            id,
            name: merchant.name.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Deletes a merchant and everything hanging off it.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - merchant doesn't exist; nothing changed
    pub async fn delete_with_cascade(&self, id: i64) -> DbResult<MerchantDeletion> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM merchants WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if found.is_none() {
            return Err(DbError::not_found("Merchant", id));
        }

        let invoice_ids: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM invoices WHERE merchant_id = ?1 ORDER BY id")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        for invoice_id in &invoice_ids {
            destroy_invoice(&mut tx, *invoice_id).await?;
        }

        let foreign = sqlx::query(
            "DELETE FROM invoice_items WHERE item_id IN (SELECT id FROM items WHERE merchant_id = ?1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let items = sqlx::query("DELETE FROM items WHERE merchant_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM merchants WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let deletion = MerchantDeletion {
            merchant_id: id,
            invoices_deleted: invoice_ids.len(),
            items_deleted: items.rows_affected(),
            foreign_invoice_items_deleted: foreign.rows_affected(),
        };

        info!(
            id,
            invoices = deletion.invoices_deleted,
            items = deletion.items_deleted,
            "Deleted merchant"
        );

        Ok(deletion)
    }

    /// Counts total merchants (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM merchants")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
