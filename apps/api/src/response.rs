//! JSON response envelopes.
//!
//! ```text
//! { "data": { "id": "1", "type": "item", "attributes": { ... } } }
//! { "data": [ { ... }, { ... } ] }
//! { "data": {} }                      ← item name search without a match
//! ```

use serde::Serialize;
use storefront_core::{Item, Merchant};

/// Top-level `{"data": ...}` wrapper.
#[derive(Debug, Serialize)]
pub struct Document<T> {
    pub data: T,
}

impl<T: Serialize> Document<T> {
    pub fn new(data: T) -> Self {
        Document { data }
    }
}

impl Document<serde_json::Map<String, serde_json::Value>> {
    /// `{"data": {}}`
    pub fn empty() -> Self {
        Document {
            data: serde_json::Map::new(),
        }
    }
}

/// One resource object. Ids are rendered as strings.
#[derive(Debug, Serialize)]
pub struct Resource<A> {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attributes: A,
}

#[derive(Debug, Serialize)]
pub struct ItemAttributes {
    pub name: String,
    pub description: String,
    pub unit_price: f64,
    pub merchant_id: i64,
}

#[derive(Debug, Serialize)]
pub struct MerchantAttributes {
    pub name: String,
}

impl From<Item> for Resource<ItemAttributes> {
    fn from(item: Item) -> Self {
        Resource {
            id: item.id.to_string(),
            kind: "item",
            attributes: ItemAttributes {
                name: item.name,
                description: item.description,
                unit_price: item.unit_price,
                merchant_id: item.merchant_id,
            },
        }
    }
}

impl From<Merchant> for Resource<MerchantAttributes> {
    fn from(merchant: Merchant) -> Self {
        Resource {
            id: merchant.id.to_string(),
            kind: "merchant",
            attributes: MerchantAttributes {
                name: merchant.name,
            },
        }
    }
}

pub type ItemDocument = Document<Resource<ItemAttributes>>;
pub type ItemListDocument = Document<Vec<Resource<ItemAttributes>>>;
pub type MerchantDocument = Document<Resource<MerchantAttributes>>;
pub type MerchantListDocument = Document<Vec<Resource<MerchantAttributes>>>;

pub fn item(item: Item) -> ItemDocument {
    Document::new(item.into())
}

pub fn items(items: Vec<Item>) -> ItemListDocument {
    Document::new(items.into_iter().map(Resource::from).collect())
}

pub fn merchant(merchant: Merchant) -> MerchantDocument {
    Document::new(merchant.into())
}

pub fn merchants(merchants: Vec<Merchant>) -> MerchantListDocument {
    Document::new(merchants.into_iter().map(Resource::from).collect())
}
