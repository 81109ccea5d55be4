//! # Invoice Repository
//!
//! Invoices, their invoice_item join rows and transactions.
//!
//! Invoices are written by the seed binary and by tests; the HTTP API only
//! removes them as part of item and merchant cascades through
//! [`destroy_invoice`].

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use storefront_core::{Invoice, InvoiceItem, InvoiceStatus, Transaction, TransactionResult};

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Creates an invoice for a merchant.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - merchant doesn't exist
    pub async fn create(&self, merchant_id: i64, status: InvoiceStatus) -> DbResult<Invoice> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO invoices (merchant_id, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            "#,
        )
        .bind(merchant_id)
        .bind(status)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, merchant_id, "Created invoice");

        Ok(Invoice {
            id,
            merchant_id,
            status,
            created_at: now,
            updated_at: now,
        })
    }

    /// Gets an invoice by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            "SELECT id, merchant_id, status, created_at, updated_at FROM invoices WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Whether an invoice exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        Ok(self.get_by_id(id).await?.is_some())
    }

    /// Links an item to an invoice.
    pub async fn add_item(
        &self,
        invoice_id: i64,
        item_id: i64,
        quantity: i64,
        unit_price: f64,
    ) -> DbResult<InvoiceItem> {
        let result = sqlx::query(
            r#"
            INSERT INTO invoice_items (invoice_id, item_id, quantity, unit_price)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(invoice_id)
        .bind(item_id)
        .bind(quantity)
        .bind(unit_price)
        .execute(&self.pool)
        .await?;

        Ok(InvoiceItem {
            id: result.last_insert_rowid(),
            invoice_id,
            item_id,
            quantity,
            unit_price,
        })
    }

    /// Join rows of an invoice.
    pub async fn invoice_items(&self, invoice_id: i64) -> DbResult<Vec<InvoiceItem>> {
        let rows = sqlx::query_as::<_, InvoiceItem>(
            r#"
            SELECT id, invoice_id, item_id, quantity, unit_price
            FROM invoice_items
            WHERE invoice_id = ?1
            ORDER BY id
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Number of distinct items on an invoice.
    pub async fn item_count(&self, invoice_id: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(DISTINCT item_id) FROM invoice_items WHERE invoice_id = ?1",
        )
        .bind(invoice_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Records a payment attempt.
    pub async fn add_transaction(
        &self,
        invoice_id: i64,
        credit_card_number: &str,
        result: TransactionResult,
    ) -> DbResult<Transaction> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO transactions (invoice_id, credit_card_number, result)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(invoice_id)
        .bind(credit_card_number)
        .bind(result)
        .execute(&self.pool)
        .await?;

        Ok(Transaction {
            id: inserted.last_insert_rowid(),
            invoice_id,
            credit_card_number: credit_card_number.to_string(),
            result,
        })
    }

    /// Transactions of an invoice.
    pub async fn transactions(&self, invoice_id: i64) -> DbResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, invoice_id, credit_card_number, result
            FROM transactions
            WHERE invoice_id = ?1
            ORDER BY id
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Counts invoices (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Deletes an invoice with its transactions and invoice_items.
///
/// Runs on the caller's connection so it joins the caller's transaction.
pub(crate) async fn destroy_invoice(conn: &mut SqliteConnection, invoice_id: i64) -> DbResult<()> {
    sqlx::query("DELETE FROM transactions WHERE invoice_id = ?1")
        .bind(invoice_id)
        .execute(&mut *conn)
        .await?;

    sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?1")
        .bind(invoice_id)
        .execute(&mut *conn)
        .await?;

    let result = sqlx::query("DELETE FROM invoices WHERE id = ?1")
        .bind(invoice_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("Invoice", invoice_id));
    }

    debug!(invoice_id, "Destroyed invoice");
    Ok(())
}
