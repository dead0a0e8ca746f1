//! In-memory product storage.
//!
//! Products live in a map behind a lock. Suitable for tests and single-process demos; everything is
//! lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::ProductService;
use crate::api::models::pagination::{Page, PageRequest};
use crate::db::handlers::products::ProductFilter;
use crate::db::models::products::{Product, ProductCreateDBRequest, ProductDBResponse, ProductUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::types::ProductId;

#[derive(Default)]
struct Store {
    products: HashMap<ProductId, Product>,
    last_id: ProductId,
}

#[derive(Clone, Default)]
pub struct InMemoryProductService {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductService {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductService for InMemoryProductService {
    async fn list_products(&self, search: Option<&str>, page: PageRequest) -> Result<Page<ProductDBResponse>> {
        let filter = match search {
            Some(search) => ProductFilter::new(page.skip(), page.limit()).with_search(search),
            None => ProductFilter::new(page.skip(), page.limit()),
        };

        let store = self.store.read();
        let mut matching: Vec<&Product> = store.products.values().filter(|p| filter.matches(&p.name)).collect();
        // Newest first, id breaks ties between rows created in the same instant
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(filter.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(filter.limit).unwrap_or(0))
            .cloned()
            .collect();

        Ok(Page::new(items, total, page))
    }

    async fn get_product(&self, id: ProductId) -> Result<Option<ProductDBResponse>> {
        Ok(self.store.read().products.get(&id).cloned())
    }

    async fn create_product(&self, request: &ProductCreateDBRequest) -> Result<ProductDBResponse> {
        let mut store = self.store.write();
        store.last_id += 1;

        let now = Utc::now();
        let product = Product {
            id: store.last_id,
            name: request.name.clone(),
            description: request.description.clone(),
            price: request.price,
            quantity: request.quantity,
            created_at: now,
            updated_at: now,
        };
        store.products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn update_product(&self, id: ProductId, request: &ProductUpdateDBRequest) -> Result<ProductDBResponse> {
        let mut store = self.store.write();
        let product = store.products.get_mut(&id).ok_or_else(|| Error::product_not_found(id))?;

        request.apply_to(product);
        product.updated_at = Utc::now();

        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<()> {
        match self.store.write().products.remove(&id) {
            Some(_) => {
                tracing::info!(product_id = id, "Deleted product");
                Ok(())
            }
            None => Err(Error::product_not_found(id)),
        }
    }
}
