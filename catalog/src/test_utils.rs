//! Test utilities for handler and router tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::{Value, json};

use crate::api::models::pagination::{Page, PageRequest};
use crate::config::{Config, DatabaseConfig};
use crate::db::models::products::{ProductCreateDBRequest, ProductDBResponse, ProductUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::services::{InMemoryProductService, ProductService};
use crate::types::ProductId;
use crate::views::Views;
use crate::{AppState, build_router};

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseConfig::Memory,
        ..Default::default()
    }
}

pub fn create_test_state(products: Arc<dyn ProductService>, config: Config) -> AppState {
    let views = Views::new(config.catalog.currency_symbol.clone()).expect("templates should compile");
    AppState::builder()
        .products(products)
        .views(Arc::new(views))
        .config(config)
        .build()
}

fn server_for(state: AppState) -> TestServer {
    let router = build_router(state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to create test server")
}

/// Server backed by an empty in-memory store
pub fn create_test_server() -> TestServer {
    server_for(create_test_state(Arc::new(InMemoryProductService::new()), create_test_config()))
}

pub fn create_test_server_with_config(config: Config) -> TestServer {
    server_for(create_test_state(Arc::new(InMemoryProductService::new()), config))
}

/// Server whose storage fails every call, for checking how unexpected errors surface
pub fn create_failing_test_server() -> TestServer {
    server_for(create_test_state(Arc::new(FailingProductService), create_test_config()))
}

/// Create `count` products named `Product 1..=count` through the API, returning their ids in
/// creation order
pub async fn seed_products(server: &TestServer, count: usize) -> Vec<ProductId> {
    let mut ids = Vec::with_capacity(count);
    for i in 1..=count {
        let response = server
            .post("/products")
            .json(&json!({
                "name": format!("Product {i}"),
                "description": format!("Description of product {i}"),
                "price": 1,
                "quantity": 1,
            }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        ids.push(body["product"]["id"].as_i64().expect("created product id"));
    }
    ids
}

struct FailingProductService;

fn storage_failure<T>() -> Result<T> {
    Err(Error::Other(anyhow::anyhow!("connection reset by peer")))
}

#[async_trait]
impl ProductService for FailingProductService {
    async fn list_products(&self, _search: Option<&str>, _page: PageRequest) -> Result<Page<ProductDBResponse>> {
        storage_failure()
    }

    async fn get_product(&self, _id: ProductId) -> Result<Option<ProductDBResponse>> {
        storage_failure()
    }

    async fn create_product(&self, _request: &ProductCreateDBRequest) -> Result<ProductDBResponse> {
        storage_failure()
    }

    async fn update_product(&self, _id: ProductId, _request: &ProductUpdateDBRequest) -> Result<ProductDBResponse> {
        storage_failure()
    }

    async fn delete_product(&self, _id: ProductId) -> Result<()> {
        storage_failure()
    }
}
