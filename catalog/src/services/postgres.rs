use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use super::ProductService;
use crate::api::models::pagination::{Page, PageRequest};
use crate::db::errors::DbError;
use crate::db::handlers::{Products, Repository, products::ProductFilter};
use crate::db::models::products::{ProductCreateDBRequest, ProductDBResponse, ProductUpdateDBRequest};
use crate::errors::{Error, Result};
use crate::types::ProductId;

/// Product service over a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PostgresProductService {
    db: PgPool,
}

impl PostgresProductService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Read-only transaction whose statements all see one snapshot, so the total and the page agree
/// under concurrent writes
async fn begin_snapshot(db: &PgPool) -> Result<Transaction<'static, Postgres>> {
    let mut tx = db.begin().await.map_err(|e| Error::Database(e.into()))?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Database(e.into()))?;
    Ok(tx)
}

fn not_found_as(id: ProductId) -> impl FnOnce(DbError) -> Error {
    move |e| match e {
        DbError::NotFound => Error::product_not_found(id),
        other => Error::Database(other),
    }
}

#[async_trait]
impl ProductService for PostgresProductService {
    #[instrument(skip(self), err)]
    async fn list_products(&self, search: Option<&str>, page: PageRequest) -> Result<Page<ProductDBResponse>> {
        let mut filter = ProductFilter::new(page.skip(), page.limit());
        if let Some(search) = search {
            filter = filter.with_search(search);
        }

        let mut tx = begin_snapshot(&self.db).await?;
        let (total, items) = {
            let mut repo = Products::new(&mut tx);
            let total = repo.count(&filter).await?;
            let items = repo.list(&filter).await?;
            (total, items)
        };
        tx.commit().await.map_err(|e| Error::Database(e.into()))?;

        Ok(Page::new(items, total, page))
    }

    #[instrument(skip(self), err)]
    async fn get_product(&self, id: ProductId) -> Result<Option<ProductDBResponse>> {
        let mut conn = self.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
        Ok(Products::new(&mut conn).get_by_id(id).await?)
    }

    #[instrument(skip(self, request), err)]
    async fn create_product(&self, request: &ProductCreateDBRequest) -> Result<ProductDBResponse> {
        let mut conn = self.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
        let product = Products::new(&mut conn).create(request).await?;
        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    #[instrument(skip(self, request), err)]
    async fn update_product(&self, id: ProductId, request: &ProductUpdateDBRequest) -> Result<ProductDBResponse> {
        let mut conn = self.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
        Products::new(&mut conn).update(id, request).await.map_err(not_found_as(id))
    }

    #[instrument(skip(self), err)]
    async fn delete_product(&self, id: ProductId) -> Result<()> {
        let mut conn = self.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
        if Products::new(&mut conn).delete(id).await? {
            tracing::info!(product_id = id, "Deleted product");
            Ok(())
        } else {
            Err(Error::product_not_found(id))
        }
    }
}
