//! # Search Query Builder
//!
//! Renders the SQL side of [`storefront_core::search`].
//!
//! ```text
//! ItemSearch::ByName("Dog")
//!     └── (no WHERE)          all candidates, folded in Rust
//!
//! ItemSearch::ByPrice { min: 150, max: 350 }
//!     └── WHERE unit_price >= 150 AND unit_price <= 350
//! ```
//!
//! SQLite `LOWER` only folds ASCII, so name matching and name order are
//! left to [`ItemSearch::first_match`] and
//! [`storefront_core::search::filter_merchants`]. SQL only narrows by price.

use sqlx::{QueryBuilder, Sqlite};
use storefront_core::search::{ItemSearch, PriceRange};

/// Columns selected for [`storefront_core::Item`].
pub const ITEM_COLUMNS: &str = "id, name, description, unit_price, merchant_id, created_at, updated_at";

/// Columns selected for [`storefront_core::Merchant`].
pub const MERCHANT_COLUMNS: &str = "id, name, created_at, updated_at";

/// Starts `SELECT <columns> FROM <table>`.
pub fn select<'args>(columns: &str, table: &str) -> QueryBuilder<'args, Sqlite> {
    QueryBuilder::new(format!("SELECT {columns} FROM {table}"))
}

/// Appends the SQL prefilter of an item search.
///
/// Name searches have none; every row is a candidate.
pub fn push_item_prefilter(builder: &mut QueryBuilder<'_, Sqlite>, search: &ItemSearch) {
    if let ItemSearch::ByPrice(range) = search {
        builder.push(" WHERE ");
        push_price_range(builder, range);
    }
}

/// Inclusive bounds on `unit_price`.
pub fn push_price_range(builder: &mut QueryBuilder<'_, Sqlite>, range: &PriceRange) {
    match (range.min(), range.max()) {
        (Some(min), Some(max)) => {
            builder
                .push("unit_price >= ")
                .push_bind(min)
                .push(" AND unit_price <= ")
                .push_bind(max);
        }
        (Some(min), None) => {
            builder.push("unit_price >= ").push_bind(min);
        }
        (None, Some(max)) => {
            builder.push("unit_price <= ").push_bind(max);
        }
        // PriceRange always carries a bound
        (None, None) => {
            builder.push("1 = 1");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::search::SearchParams;

    fn render(search: &ItemSearch) -> String {
        let mut builder = select(ITEM_COLUMNS, "items");
        push_item_prefilter(&mut builder, search);
        builder.sql().to_string()
    }

    #[test]
    fn test_name_search_has_no_prefilter() {
        let search = ItemSearch::from_params(&SearchParams {
            name: Some("dog".into()),
            ..SearchParams::default()
        })
        .unwrap();

        assert_eq!(
            render(&search),
            format!("SELECT {ITEM_COLUMNS} FROM items")
        );
    }

    #[test]
    fn test_price_search_sql() {
        let search = ItemSearch::ByPrice(PriceRange::new(Some(1.0), None).unwrap().unwrap());
        assert!(render(&search).ends_with("WHERE unit_price >= ?"));

        let search = ItemSearch::ByPrice(PriceRange::new(None, Some(2.0)).unwrap().unwrap());
        assert!(render(&search).ends_with("WHERE unit_price <= ?"));

        let search =
            ItemSearch::ByPrice(PriceRange::new(Some(1.0), Some(2.0)).unwrap().unwrap());
        assert!(render(&search).ends_with("WHERE unit_price >= ? AND unit_price <= ?"));
    }
}
