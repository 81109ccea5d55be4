//! # Item Repository
//!
//! Database operations for items.
//!
//! ## Key Operations
//! - CRUD with validated input from storefront-core
//! - Single-item search by name or price range
//! - Cascade delete driven by [`storefront_core::plan_item_deletion`]
//!
//! ## Cascade Delete
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  delete_with_cascade(item_id)                                          │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   ├── item exists?            no ──► NotFound, ROLLBACK (no mutation)  │
//! │   ├── load InvoiceLinks (distinct item counts, before removal)         │
//! │   ├── plan_item_deletion(item_id, links)   ← pure, storefront-core     │
//! │   ├── destroy_invoice(..) for every planned invoice                    │
//! │   ├── DELETE invoice_items WHERE item_id = ?                           │
//! │   └── DELETE items WHERE id = ?                                        │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure drops the transaction, rolling back every step.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::invoice::destroy_invoice;
use crate::repository::query::{self, ITEM_COLUMNS};
use storefront_core::search::ItemSearch;
use storefront_core::{plan_item_deletion, DeletePlan, InvoiceLink, Item, NewItem};

/// Repository for item database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.items();
///
/// let item = repo.insert(&params.validate()?).await?;
/// let found = repo.search(&ItemSearch::from_params(&query)?).await?;
/// let plan = repo.delete_with_cascade(item.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Lists every item by id.
    pub async fn list_all(&self) -> DbResult<Vec<Item>> {
        let mut builder = query::select(ITEM_COLUMNS, "items");
        builder.push(" ORDER BY id");

        let items = builder
            .build_query_as::<Item>()
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Gets an item by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - Item found
    /// * `Ok(None)` - Item not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        let mut builder = query::select(ITEM_COLUMNS, "items");
        builder.push(" WHERE id = ").push_bind(id);

        let item = builder
            .build_query_as::<Item>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(item)
    }

    /// Whether an item exists.
    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM items WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Items owned by a merchant, by id.
    pub async fn list_for_merchant(&self, merchant_id: i64) -> DbResult<Vec<Item>> {
        let mut builder = query::select(ITEM_COLUMNS, "items");
        builder
            .push(" WHERE merchant_id = ")
            .push_bind(merchant_id)
            .push(" ORDER BY id");

        let items = builder
            .build_query_as::<Item>()
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Finds the item matching `search` that sorts first by name.
    ///
    /// ## Returns
    /// * `Ok(None)` - Nothing matched (not an error)
    pub async fn search(&self, search: &ItemSearch) -> DbResult<Option<Item>> {
        debug!(?search, "Searching items");

        let mut builder = query::select(ITEM_COLUMNS, "items");
        query::push_item_prefilter(&mut builder, search);

        let candidates = builder
            .build_query_as::<Item>()
            .fetch_all(&self.pool)
            .await?;

        // Unicode case folding and name order happen here, not in SQLite.
        let item = search.first_match(&candidates).cloned();

        debug!(
            candidates = candidates.len(),
            found = item.is_some(),
            "Item search finished"
        );
        Ok(item)
    }

    /// Inserts a validated item.
    ///
    /// ## Returns
    /// * `Ok(Item)` - Inserted item with its new id
    /// * `Err(DbError::ForeignKeyViolation)` - merchant doesn't exist
    pub async fn insert(&self, item: &NewItem) -> DbResult<Item> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO items (name, description, unit_price, merchant_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
        )
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.unit_price)
        .bind(item.merchant_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(id, merchant_id = item.merchant_id, "Created item");

        Ok(Item {
            id,
            name: item.name.clone(),
            description: item.description.clone(),
            unit_price: item.unit_price,
            merchant_id: item.merchant_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Writes every field of `item` and bumps `updated_at`.
    ///
    /// `item` is expected to come from
    /// [`ItemChanges::apply`](storefront_core::ItemChanges::apply).
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    /// * `Err(DbError::ForeignKeyViolation)` - new merchant doesn't exist
    pub async fn update(&self, item: &Item) -> DbResult<Item> {
        debug!(id = item.id, "Updating item");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE items SET
                name = ?2,
                description = ?3,
                unit_price = ?4,
                merchant_id = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(item.unit_price)
        .bind(item.merchant_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", item.id));
        }

        Ok(Item {
            updated_at: now,
            ..item.clone()
        })
    }

    /// Computes the delete plan for an item without changing anything.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    pub async fn plan_deletion(&self, id: i64) -> DbResult<DeletePlan> {
        let mut conn = self.pool.acquire().await?;
        plan_on(&mut conn, id).await
    }

    /// Deletes an item and the invoices that only held it.
    ///
    /// Every step runs in one transaction. A missing item is reported as
    /// `NotFound` and nothing is written.
    pub async fn delete_with_cascade(&self, id: i64) -> DbResult<DeletePlan> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let plan = plan_on(&mut tx, id).await?;

        for invoice_id in &plan.invoices_to_delete {
            destroy_invoice(&mut tx, *invoice_id).await?;
        }

        sqlx::query("DELETE FROM invoice_items WHERE item_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            id,
            invoices_deleted = plan.invoices_to_delete.len(),
            invoices_kept = plan.invoices_kept.len(),
            "Deleted item"
        );

        Ok(plan)
    }

    /// Counts total items (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Loads the item's invoice links on `conn` and plans its deletion.
async fn plan_on(conn: &mut SqliteConnection, id: i64) -> DbResult<DeletePlan> {
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM items WHERE id = ?1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    if found.is_none() {
        return Err(DbError::not_found("Item", id));
    }

    // Counts include the item's own rows: they are removed after the plan.
    let links = sqlx::query_as::<_, InvoiceLink>(
        r#"
        SELECT
            ii.id AS invoice_item_id,
            ii.invoice_id AS invoice_id,
            (SELECT COUNT(DISTINCT other.item_id)
               FROM invoice_items other
              WHERE other.invoice_id = ii.invoice_id) AS item_count
        FROM invoice_items ii
        WHERE ii.item_id = ?1
        ORDER BY ii.id
        "#,
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(plan_item_deletion(id, &links))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use serde_json::json;
    use storefront_core::search::{NameQuery, PriceRange, SearchParams};
    use storefront_core::{InvoiceStatus, ItemChanges, ItemParams, MerchantParams, TransactionResult};

    async fn setup() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let merchant = db
            .merchants()
            .insert(
                &MerchantParams {
                    name: Some("Bradley".into()),
                }
                .validate()
                .unwrap(),
            )
            .await
            .unwrap();
        (db, merchant.id)
    }

    async fn add_item(db: &Database, merchant_id: i64, name: &str, unit_price: f64) -> Item {
        let params = ItemParams {
            name: Some(name.to_string()),
            description: Some(format!("all about {name}")),
            unit_price: Some(json!(unit_price)),
            merchant_id: Some(json!(merchant_id)),
        };
        db.items().insert(&params.validate().unwrap()).await.unwrap()
    }

    async fn heroes(db: &Database, merchant_id: i64) {
        add_item(db, merchant_id, "Batman", 100.0).await;
        add_item(db, merchant_id, "Joker", 200.0).await;
        add_item(db, merchant_id, "Catwoman", 300.0).await;
    }

    fn by_price(min: Option<f64>, max: Option<f64>) -> ItemSearch {
        ItemSearch::ByPrice(PriceRange::new(min, max).unwrap().unwrap())
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let (db, merchant_id) = setup().await;
        let created = add_item(&db, merchant_id, "dog bowl", 12.75).await;

        let fetched = db.items().get_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "dog bowl");
        assert_eq!(fetched.description, "all about dog bowl");
        assert_eq!(fetched.unit_price, 12.75);
        assert_eq!(fetched.merchant_id, merchant_id);
    }

    #[tokio::test]
    async fn test_insert_with_unknown_merchant() {
        let (db, _) = setup().await;
        let params = ItemParams {
            name: Some("ghost".into()),
            description: Some("boo".into()),
            unit_price: Some(json!(1)),
            merchant_id: Some(json!(404)),
        };

        let err = db
            .items()
            .insert(&params.validate().unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert_eq!(db.items().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_name_search() {
        let (db, merchant_id) = setup().await;
        add_item(&db, merchant_id, "stuffed dog", 10.0).await;
        add_item(&db, merchant_id, "cat litter", 5.0).await;
        add_item(&db, merchant_id, "dog bowl", 8.0).await;

        let search = ItemSearch::ByName(NameQuery::new("DOG").unwrap());
        let found = db.items().search(&search).await.unwrap().unwrap();
        assert_eq!(found.name, "dog bowl");

        // The store agrees with the in-memory rule.
        let all = db.items().list_all().await.unwrap();
        assert_eq!(search.first_match(&all).map(|i| i.id), Some(found.id));
    }

    #[tokio::test]
    async fn test_name_search_sorts_case_insensitively() {
        let (db, merchant_id) = setup().await;
        add_item(&db, merchant_id, "bob's Dog", 1.0).await;
        add_item(&db, merchant_id, "Zany dog", 1.0).await;
        add_item(&db, merchant_id, "Apple dog", 1.0).await;

        let search = ItemSearch::ByName(NameQuery::new("dog").unwrap());
        let found = db.items().search(&search).await.unwrap().unwrap();
        assert_eq!(found.name, "Apple dog");
    }

    #[tokio::test]
    async fn test_name_search_treats_wildcards_literally() {
        let (db, merchant_id) = setup().await;
        add_item(&db, merchant_id, "plain", 1.0).await;

        let search = ItemSearch::ByName(NameQuery::new("%").unwrap());
        assert!(db.items().search(&search).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_name_search_folds_non_ascii_case() {
        let (db, merchant_id) = setup().await;
        add_item(&db, merchant_id, "ecole pen", 1.0).await;
        let bag = add_item(&db, merchant_id, "ÉCOLE bag", 1.0).await;

        let search = ItemSearch::ByName(NameQuery::new("école").unwrap());
        let found = db.items().search(&search).await.unwrap().unwrap();
        assert_eq!(found.id, bag.id);

        let all = db.items().list_all().await.unwrap();
        assert_eq!(search.first_match(&all).map(|i| i.id), Some(found.id));
    }

    #[tokio::test]
    async fn test_name_search_keeps_surrounding_whitespace() {
        let (db, merchant_id) = setup().await;
        add_item(&db, merchant_id, "adog", 1.0).await;
        add_item(&db, merchant_id, "b dog", 1.0).await;

        let search = ItemSearch::from_params(&SearchParams {
            name: Some(" dog".into()),
            ..SearchParams::default()
        })
        .unwrap();

        let found = db.items().search(&search).await.unwrap().unwrap();
        assert_eq!(found.name, "b dog");
    }

    #[tokio::test]
    async fn test_price_search_orders_non_ascii_names() {
        let (db, merchant_id) = setup().await;
        add_item(&db, merchant_id, "Émile", 5.0).await;
        add_item(&db, merchant_id, "éclair", 5.0).await;

        let found = db
            .items()
            .search(&by_price(Some(1.0), None))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "éclair");
    }

    #[tokio::test]
    async fn test_name_search_without_match() {
        let (db, merchant_id) = setup().await;
        heroes(&db, merchant_id).await;

        let search = ItemSearch::ByName(NameQuery::new("penguin").unwrap());
        assert!(db.items().search(&search).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_price_searches() {
        let (db, merchant_id) = setup().await;
        heroes(&db, merchant_id).await;
        add_item(&db, merchant_id, "Mr Freeze", 400.0).await;
        let items = db.items();

        let found = items.search(&by_price(Some(150.0), None)).await.unwrap();
        assert_eq!(found.unwrap().name, "Catwoman");

        let found = items.search(&by_price(None, Some(250.0))).await.unwrap();
        assert_eq!(found.unwrap().name, "Batman");

        let found = items
            .search(&by_price(Some(150.0), Some(350.0)))
            .await
            .unwrap();
        assert_eq!(found.unwrap().name, "Catwoman");

        let found = items
            .search(&by_price(Some(100.0), Some(100.0)))
            .await
            .unwrap();
        assert_eq!(found.unwrap().name, "Batman");

        let found = items
            .search(&by_price(Some(101.0), Some(199.0)))
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_search_from_params() {
        let (db, merchant_id) = setup().await;
        heroes(&db, merchant_id).await;

        let search = ItemSearch::from_params(&SearchParams {
            min_price: Some("150".into()),
            ..SearchParams::default()
        })
        .unwrap();

        let found = db.items().search(&search).await.unwrap().unwrap();
        assert_eq!(found.unit_price, 300.0);
    }

    #[tokio::test]
    async fn test_update_changes_only_supplied_fields() {
        let (db, merchant_id) = setup().await;
        let item = add_item(&db, merchant_id, "Joker", 200.0).await;

        let changes = ItemChanges {
            description: Some("why so serious".into()),
            ..ItemChanges::default()
        };
        let updated = db
            .items()
            .update(&changes.apply(&item).unwrap())
            .await
            .unwrap();

        let stored = db.items().get_by_id(item.id).await.unwrap().unwrap();
        assert_eq!(stored.description, "why so serious");
        assert_eq!(stored.name, "Joker");
        assert_eq!(stored.unit_price, 200.0);
        assert_eq!(updated.description, stored.description);
    }

    #[tokio::test]
    async fn test_update_missing_item() {
        let (db, merchant_id) = setup().await;
        let mut item = add_item(&db, merchant_id, "Joker", 200.0).await;
        item.id = 999;

        let err = db.items().update(&item).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_sole_item_destroys_invoice() {
        let (db, merchant_id) = setup().await;
        let item = add_item(&db, merchant_id, "Batman", 100.0).await;
        let invoices = db.invoices();
        let invoice = invoices
            .create(merchant_id, InvoiceStatus::Shipped)
            .await
            .unwrap();
        invoices.add_item(invoice.id, item.id, 1, 100.0).await.unwrap();
        invoices
            .add_transaction(invoice.id, "4654405418249632", TransactionResult::Success)
            .await
            .unwrap();

        let plan = db.items().delete_with_cascade(item.id).await.unwrap();

        assert_eq!(plan.invoices_to_delete, vec![invoice.id]);
        assert!(!db.items().exists(item.id).await.unwrap());
        assert!(!invoices.exists(invoice.id).await.unwrap());
        assert!(invoices.invoice_items(invoice.id).await.unwrap().is_empty());
        assert!(invoices.transactions(invoice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_shared_item_keeps_invoice() {
        let (db, merchant_id) = setup().await;
        let batman = add_item(&db, merchant_id, "Batman", 100.0).await;
        let joker = add_item(&db, merchant_id, "Joker", 200.0).await;
        let invoices = db.invoices();
        let shared = invoices
            .create(merchant_id, InvoiceStatus::Shipped)
            .await
            .unwrap();
        let solo = invoices
            .create(merchant_id, InvoiceStatus::Shipped)
            .await
            .unwrap();
        invoices.add_item(shared.id, batman.id, 1, 100.0).await.unwrap();
        invoices.add_item(shared.id, joker.id, 3, 200.0).await.unwrap();
        invoices.add_item(solo.id, batman.id, 2, 100.0).await.unwrap();
        invoices
            .add_transaction(shared.id, "4654405418249632", TransactionResult::Success)
            .await
            .unwrap();

        let plan = db.items().delete_with_cascade(batman.id).await.unwrap();

        assert_eq!(plan.invoices_to_delete, vec![solo.id]);
        assert_eq!(plan.invoices_kept, vec![shared.id]);

        assert!(invoices.exists(shared.id).await.unwrap());
        assert!(!invoices.exists(solo.id).await.unwrap());

        let remaining = invoices.invoice_items(shared.id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].item_id, joker.id);
        assert_eq!(invoices.transactions(shared.id).await.unwrap().len(), 1);
        assert!(db.items().exists(joker.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_item_changes_nothing() {
        let (db, merchant_id) = setup().await;
        heroes(&db, merchant_id).await;
        let invoices_before = db.invoices().count().await.unwrap();

        let err = db.items().delete_with_cascade(999).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(db.items().count().await.unwrap(), 3);
        assert_eq!(db.invoices().count().await.unwrap(), invoices_before);
    }

    #[tokio::test]
    async fn test_failed_delete_rolls_back_cascade() {
        let (db, merchant_id) = setup().await;
        let item = add_item(&db, merchant_id, "Batman", 100.0).await;
        let invoices = db.invoices();
        let invoice = invoices
            .create(merchant_id, InvoiceStatus::Shipped)
            .await
            .unwrap();
        invoices.add_item(invoice.id, item.id, 1, 100.0).await.unwrap();
        invoices
            .add_transaction(invoice.id, "4654405418249632", TransactionResult::Success)
            .await
            .unwrap();

        // Fails the last step, after the invoice has been destroyed.
        sqlx::query(
            "CREATE TRIGGER block_item_delete BEFORE DELETE ON items \
             BEGIN SELECT RAISE(ABORT, 'item delete blocked'); END",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = db.items().delete_with_cascade(item.id).await.unwrap_err();

        assert!(!err.is_not_found());
        assert!(db.items().exists(item.id).await.unwrap());
        assert!(invoices.exists(invoice.id).await.unwrap());
        assert_eq!(invoices.invoice_items(invoice.id).await.unwrap().len(), 1);
        assert_eq!(invoices.transactions(invoice.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_plan_deletion_is_read_only() {
        let (db, merchant_id) = setup().await;
        let item = add_item(&db, merchant_id, "Batman", 100.0).await;
        let invoice = db
            .invoices()
            .create(merchant_id, InvoiceStatus::Pending)
            .await
            .unwrap();
        db.invoices()
            .add_item(invoice.id, item.id, 1, 100.0)
            .await
            .unwrap();

        let plan = db.items().plan_deletion(item.id).await.unwrap();

        assert_eq!(plan.invoices_to_delete, vec![invoice.id]);
        assert!(db.items().exists(item.id).await.unwrap());
        assert!(db.invoices().exists(invoice.id).await.unwrap());
    }
}
