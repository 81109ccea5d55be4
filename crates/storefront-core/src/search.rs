//! # Search Rules
//!
//! Parameter precedence, match predicates and ordering for item and merchant
//! searches.
//!
//! ## Item Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET /items/find?name=..&min_price=..&max_price=..                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SearchParams ──► ItemSearch::from_params                              │
//! │       │                                                                 │
//! │       ├── name AND a price bound? ──► ConflictingParameters            │
//! │       ├── name?                    ──► ItemSearch::ByName              │
//! │       ├── price bound(s)?                                              │
//! │       │     ├── not a number?      ──► InvalidPrice                    │
//! │       │     ├── negative?          ──► NegativePrice                   │
//! │       │     └── ok                 ──► ItemSearch::ByPrice             │
//! │       └── nothing?                 ──► MissingParameter                │
//! │                                                                         │
//! │  No query runs until from_params has returned Ok.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The database layer renders the same predicates into SQL. The in-memory
//! functions here ([`ItemSearch::first_match`], [`filter_merchants`]) define
//! the expected results and are what the database tests compare against.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, SearchError};
use crate::types::{Item, Merchant};
use crate::MAX_SEARCH_QUERY_LEN;

// =============================================================================
// Raw Parameters
// =============================================================================

/// Query-string parameters of the item find endpoint.
///
/// Blank values count as not supplied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

/// The trimmed value, or `None` when missing or blank.
fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// The value exactly as sent, or `None` when missing or blank.
fn supplied_raw(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

// =============================================================================
// Name Query
// =============================================================================

/// A case-insensitive substring query on a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameQuery(String);

impl NameQuery {
    /// Builds a query from raw text. Surrounding whitespace is kept.
    pub fn new(raw: &str) -> Result<Self, SearchError> {
        if raw.chars().count() > MAX_SEARCH_QUERY_LEN {
            return Err(SearchError::QueryTooLong {
                field: "name".to_string(),
                max: MAX_SEARCH_QUERY_LEN,
            });
        }
        Ok(NameQuery(raw.to_string()))
    }

    /// Builds a query from an optional request parameter.
    ///
    /// Missing or blank is `MissingParameter("name")`.
    pub fn required(raw: &Option<String>) -> Result<Self, SearchError> {
        match supplied_raw(raw) {
            Some(name) => NameQuery::new(name),
            None => Err(SearchError::MissingParameter("name".to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `name` contains the query, ignoring case.
    pub fn matches(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.0.to_lowercase())
    }
}

// =============================================================================
// Price Range
// =============================================================================

/// An inclusive unit price range. At least one bound is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    min: Option<f64>,
    max: Option<f64>,
}

impl PriceRange {
    /// Builds a range, rejecting negative or non-finite bounds.
    ///
    /// Returns `Ok(None)` when neither bound is given.
    pub fn new(min: Option<f64>, max: Option<f64>) -> Result<Option<Self>, SearchError> {
        check_bound("min_price", min)?;
        check_bound("max_price", max)?;

        if min.is_none() && max.is_none() {
            return Ok(None);
        }
        Ok(Some(PriceRange { min, max }))
    }

    /// Parses raw query-string bounds. Blank bounds are ignored.
    pub fn parse(min: Option<&str>, max: Option<&str>) -> Result<Option<Self>, SearchError> {
        let min = parse_bound("min_price", min)?;
        let max = parse_bound("max_price", max)?;
        PriceRange::new(min, max)
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Whether `price` lies within the range, both ends inclusive.
    pub fn contains(&self, price: f64) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }
}

fn parse_bound(bound: &str, raw: Option<&str>) -> Result<Option<f64>, SearchError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(text) => text
            .parse::<f64>()
            .map(Some)
            .map_err(|_| SearchError::InvalidPrice {
                bound: bound.to_string(),
            }),
    }
}

fn check_bound(bound: &str, value: Option<f64>) -> Result<(), SearchError> {
    match value {
        Some(v) if !v.is_finite() => Err(SearchError::InvalidPrice {
            bound: bound.to_string(),
        }),
        Some(v) if v < 0.0 => Err(SearchError::NegativePrice {
            bound: bound.to_string(),
        }),
        _ => Ok(()),
    }
}

// =============================================================================
// Item Search
// =============================================================================

/// A validated single-item search.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemSearch {
    ByName(NameQuery),
    ByPrice(PriceRange),
}

impl ItemSearch {
    /// Resolves request parameters into a search.
    ///
    /// The name/price conflict is reported before any bound is parsed, so a
    /// request with a name and a negative price is `ConflictingParameters`.
    pub fn from_params(params: &SearchParams) -> Result<Self, SearchError> {
        let name = supplied_raw(&params.name);
        let min = supplied(&params.min_price);
        let max = supplied(&params.max_price);

        if name.is_some() && (min.is_some() || max.is_some()) {
            return Err(SearchError::ConflictingParameters);
        }

        if let Some(name) = name {
            return Ok(ItemSearch::ByName(NameQuery::new(name)?));
        }

        match PriceRange::parse(min, max)? {
            Some(range) => Ok(ItemSearch::ByPrice(range)),
            None => Err(SearchError::MissingParameter("name or price".to_string())),
        }
    }

    /// Whether `item` satisfies the filter.
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            ItemSearch::ByName(query) => query.matches(&item.name),
            ItemSearch::ByPrice(range) => range.contains(item.unit_price),
        }
    }

    /// The matching item that sorts first by name.
    pub fn first_match<'a, I>(&self, items: I) -> Option<&'a Item>
    where
        I: IntoIterator<Item = &'a Item>,
    {
        items
            .into_iter()
            .filter(|item| self.matches(item))
            .min_by(|a, b| by_name(&a.name, a.id, &b.name, b.id))
    }

    /// Applies the no-match rule to a search outcome.
    ///
    /// A name search with no match is an empty result; a price search with
    /// no match is `NoMatchesFound`.
    pub fn resolve<T>(&self, found: Option<T>) -> CoreResult<Option<T>> {
        match (self, found) {
            (ItemSearch::ByPrice(_), None) => Err(CoreError::NoMatchesFound),
            (_, found) => Ok(found),
        }
    }
}

// =============================================================================
// Ordering
// =============================================================================

/// Ascending case-insensitive name order, ties broken by ascending id.
pub fn by_name(a_name: &str, a_id: i64, b_name: &str, b_id: i64) -> Ordering {
    a_name
        .to_lowercase()
        .cmp(&b_name.to_lowercase())
        .then(a_id.cmp(&b_id))
}

/// Merchants whose name contains `query`, in name order.
pub fn filter_merchants<'a, I>(merchants: I, query: &NameQuery) -> Vec<&'a Merchant>
where
    I: IntoIterator<Item = &'a Merchant>,
{
    let mut matched: Vec<&Merchant> = merchants
        .into_iter()
        .filter(|m| query.matches(&m.name))
        .collect();
    matched.sort_by(|a, b| by_name(&a.name, a.id, &b.name, b.id));
    matched
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(id: i64, name: &str, unit_price: f64) -> Item {
        let now = Utc::now();
        Item {
            id,
            name: name.to_string(),
            description: format!("{name} description"),
            unit_price,
            merchant_id: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn merchant(id: i64, name: &str) -> Merchant {
        let now = Utc::now();
        Merchant {
            id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn params(name: Option<&str>, min: Option<&str>, max: Option<&str>) -> SearchParams {
        SearchParams {
            name: name.map(String::from),
            min_price: min.map(String::from),
            max_price: max.map(String::from),
        }
    }

    fn price_search(min: Option<f64>, max: Option<f64>) -> ItemSearch {
        ItemSearch::ByPrice(PriceRange::new(min, max).unwrap().unwrap())
    }

    fn heroes() -> Vec<Item> {
        vec![
            item(1, "Batman", 100.0),
            item(2, "Joker", 200.0),
            item(3, "Catwoman", 300.0),
        ]
    }

    #[test]
    fn test_name_search_returns_first_alphabetical_match() {
        let items = vec![
            item(1, "stuffed dog", 10.0),
            item(2, "cat litter", 5.0),
            item(3, "dog bowl", 8.0),
        ];
        let search = ItemSearch::ByName(NameQuery::new("dog").unwrap());

        assert_eq!(search.first_match(&items).unwrap().name, "dog bowl");
    }

    #[test]
    fn test_name_search_ignores_case() {
        let items = vec![item(1, "Zebra DOG", 1.0), item(2, "hotdog stand", 1.0)];
        let search = ItemSearch::ByName(NameQuery::new("Dog").unwrap());

        assert_eq!(search.first_match(&items).unwrap().name, "hotdog stand");
    }

    #[test]
    fn test_name_search_no_match() {
        let items = heroes();
        let search = ItemSearch::ByName(NameQuery::new("penguin").unwrap());
        assert!(search.first_match(&items).is_none());
    }

    #[test]
    fn test_equal_names_fall_back_to_id() {
        let items = vec![item(9, "Lamp", 1.0), item(4, "lamp", 2.0)];
        let search = ItemSearch::ByName(NameQuery::new("lamp").unwrap());
        assert_eq!(search.first_match(&items).unwrap().id, 4);
    }

    #[test]
    fn test_min_price_search() {
        let items = heroes();
        let found = price_search(Some(150.0), None).first_match(&items).unwrap();
        assert_eq!(found.name, "Catwoman");
    }

    #[test]
    fn test_max_price_search() {
        let items = heroes();
        let found = price_search(None, Some(250.0)).first_match(&items).unwrap();
        assert_eq!(found.name, "Batman");
    }

    #[test]
    fn test_price_range_search() {
        let mut items = heroes();
        items.push(item(4, "Mr Freeze", 400.0));

        let found = price_search(Some(150.0), Some(350.0))
            .first_match(&items)
            .unwrap();
        assert_eq!(found.name, "Catwoman");
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let range = PriceRange::new(Some(100.0), Some(200.0)).unwrap().unwrap();
        assert!(range.contains(100.0));
        assert!(range.contains(200.0));
        assert!(!range.contains(99.99));
        assert!(!range.contains(200.01));
    }

    #[test]
    fn test_price_range_with_no_matches() {
        let items = heroes();
        assert!(price_search(Some(101.0), Some(199.0))
            .first_match(&items)
            .is_none());
    }

    #[test]
    fn test_negative_bound_is_rejected() {
        assert_eq!(
            ItemSearch::from_params(&params(None, Some("-1"), None)),
            Err(SearchError::NegativePrice {
                bound: "min_price".to_string()
            })
        );
        assert_eq!(
            ItemSearch::from_params(&params(None, Some("5"), Some("-0.5"))),
            Err(SearchError::NegativePrice {
                bound: "max_price".to_string()
            })
        );
    }

    #[test]
    fn test_non_numeric_bound_is_rejected() {
        assert_eq!(
            ItemSearch::from_params(&params(None, Some("cheap"), None)),
            Err(SearchError::InvalidPrice {
                bound: "min_price".to_string()
            })
        );
        assert_eq!(
            ItemSearch::from_params(&params(None, None, Some("inf"))),
            Err(SearchError::InvalidPrice {
                bound: "max_price".to_string()
            })
        );
    }

    #[test]
    fn test_name_with_price_conflicts_before_other_checks() {
        assert_eq!(
            ItemSearch::from_params(&params(Some("dog"), Some("-1"), None)),
            Err(SearchError::ConflictingParameters)
        );
        assert_eq!(
            ItemSearch::from_params(&params(Some("dog"), None, Some("nope"))),
            Err(SearchError::ConflictingParameters)
        );
    }

    #[test]
    fn test_missing_parameters() {
        assert_eq!(
            ItemSearch::from_params(&params(None, None, None)),
            Err(SearchError::MissingParameter("name or price".to_string()))
        );
        assert_eq!(
            ItemSearch::from_params(&params(Some("  "), Some(""), None)),
            Err(SearchError::MissingParameter("name or price".to_string()))
        );
    }

    #[test]
    fn test_from_params_builds_searches() {
        assert_eq!(
            ItemSearch::from_params(&params(Some("dog"), None, None)),
            Ok(ItemSearch::ByName(NameQuery::new("dog").unwrap()))
        );
        assert_eq!(
            ItemSearch::from_params(&params(None, Some("150"), Some("350"))),
            Ok(price_search(Some(150.0), Some(350.0)))
        );
    }

    #[test]
    fn test_query_too_long() {
        let long = "a".repeat(MAX_SEARCH_QUERY_LEN + 1);
        assert!(matches!(
            NameQuery::new(&long),
            Err(SearchError::QueryTooLong { .. })
        ));
    }

    #[test]
    fn test_merchant_search_returns_all_matches_in_order() {
        let merchants = vec![
            merchant(1, "Bradley"),
            merchant(2, "Alexander"),
            merchant(3, "Ashley"),
            merchant(4, "Chris"),
        ];
        let query = NameQuery::new("ley").unwrap();

        let names: Vec<&str> = filter_merchants(&merchants, &query)
            .into_iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ashley", "Bradley"]);
    }

    #[test]
    fn test_merchant_search_with_no_matches_is_empty() {
        let merchants = vec![merchant(1, "Chris")];
        let query = NameQuery::new("zzz").unwrap();
        assert!(filter_merchants(&merchants, &query).is_empty());
    }

    #[test]
    fn test_required_name_query() {
        assert_eq!(
            NameQuery::required(&Some("ley".into())).unwrap().as_str(),
            "ley"
        );
        assert_eq!(
            NameQuery::required(&None),
            Err(SearchError::MissingParameter("name".into()))
        );
        assert!(NameQuery::required(&Some("   ".into())).is_err());
    }

    #[test]
    fn test_name_query_keeps_surrounding_whitespace() {
        assert_eq!(
            NameQuery::required(&Some(" dog".into())).unwrap().as_str(),
            " dog"
        );

        let search = ItemSearch::from_params(&params(Some(" dog"), None, None)).unwrap();
        assert_eq!(search, ItemSearch::ByName(NameQuery::new(" dog").unwrap()));

        let items = vec![item(1, "adog", 1.0), item(2, "b dog", 1.0)];
        assert_eq!(search.first_match(&items).unwrap().name, "b dog");
    }

    #[test]
    fn test_name_search_folds_non_ascii_case() {
        let items = vec![item(1, "ÉCOLE bag", 1.0), item(2, "ecole pen", 1.0)];
        let search = ItemSearch::ByName(NameQuery::new("école").unwrap());

        assert_eq!(search.first_match(&items).unwrap().id, 1);
    }

    #[test]
    fn test_resolve_applies_no_match_rule() {
        let by_name = ItemSearch::ByName(NameQuery::new("dog").unwrap());
        let by_price = price_search(Some(1.0), None);

        assert_eq!(by_name.resolve::<Item>(None), Ok(None));
        assert_eq!(by_price.resolve::<Item>(None), Err(CoreError::NoMatchesFound));
        assert_eq!(by_price.resolve(Some(7)), Ok(Some(7)));
    }
}
