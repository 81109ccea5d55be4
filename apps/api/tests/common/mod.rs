//! Shared helpers for HTTP tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use storefront_api::router;
use storefront_core::{Item, ItemParams, Merchant, MerchantParams};
use storefront_db::{Database, DbConfig};
use tower::ServiceExt; // For oneshot()

pub struct TestApp {
    pub db: Database,
    pub app: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let app = router(db.clone());
        TestApp { db, app }
    }

    pub async fn merchant(&self, name: &str) -> Merchant {
        let params = MerchantParams {
            name: Some(name.to_string()),
        };
        self.db
            .merchants()
            .insert(&params.validate().unwrap())
            .await
            .unwrap()
    }

    pub async fn item(&self, merchant_id: i64, name: &str, unit_price: f64) -> Item {
        let params = ItemParams {
            name: Some(name.to_string()),
            description: Some(format!("{name} description")),
            unit_price: Some(json!(unit_price)),
            merchant_id: Some(json!(merchant_id)),
        };
        self.db
            .items()
            .insert(&params.validate().unwrap())
            .await
            .unwrap()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("DELETE")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn send_json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }
}

/// Asserts an error envelope with the given code.
pub fn assert_error(body: &Value, code: &str) {
    assert_eq!(body["errors"]["code"], code, "unexpected body: {body}");
}
