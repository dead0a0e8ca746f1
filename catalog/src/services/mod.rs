//! Product business operations.
//!
//! HTTP handlers talk to a [`ProductService`] rather than to the database directly, so the
//! storage backend is chosen once at startup:
//!
//! - [`postgres::PostgresProductService`]: backed by the `products` table through the
//!   [`crate::db::handlers::Products`] repository
//! - [`in_memory::InMemoryProductService`]: a process-local map, used by tests and by
//!   `database.type: memory` deployments. Data is lost on restart.
//!
//! Inputs are expected to be validated already. Writes against a missing id fail with
//! [`Error::NotFound`](crate::errors::Error::NotFound).

use async_trait::async_trait;

use crate::api::models::pagination::{Page, PageRequest};
use crate::db::models::products::{ProductCreateDBRequest, ProductDBResponse, ProductUpdateDBRequest};
use crate::errors::Result;
use crate::types::ProductId;

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryProductService;
pub use postgres::PostgresProductService;

#[async_trait]
pub trait ProductService: Send + Sync {
    /// One page of products, newest first, optionally filtered by a case-insensitive substring
    /// of the name. A blank search term means no filter.
    async fn list_products(&self, search: Option<&str>, page: PageRequest) -> Result<Page<ProductDBResponse>>;

    async fn get_product(&self, id: ProductId) -> Result<Option<ProductDBResponse>>;

    async fn create_product(&self, request: &ProductCreateDBRequest) -> Result<ProductDBResponse>;

    /// Apply the supplied fields and refresh `updated_at`. An empty update still refreshes it.
    async fn update_product(&self, id: ProductId, request: &ProductUpdateDBRequest) -> Result<ProductDBResponse>;

    async fn delete_product(&self, id: ProductId) -> Result<()>;
}
