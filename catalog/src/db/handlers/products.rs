//! Database repository for products.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::products::{Product, ProductCreateDBRequest, ProductDBResponse, ProductUpdateDBRequest},
};
use crate::types::ProductId;
use sqlx::{PgConnection, Postgres, QueryBuilder};
use tracing::instrument;

/// Case-folded form of a product name, as stored in `name_folded` and compared by search.
///
/// Folding happens here rather than with SQL `LOWER()`, which only folds ASCII under the C locale.
pub fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// Filter for listing products
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub skip: i64,
    pub limit: i64,
    pub search: Option<String>, // Case-insensitive substring search on name
}

impl ProductFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit, search: None }
    }

    /// Attach a search term. Blank terms are ignored.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        let trimmed = search.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Case-folded LIKE pattern for the search term, with `%`, `_` and `\` escaped so the term
    /// matches literally.
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|search| {
            let mut pattern = String::with_capacity(search.len() + 2);
            pattern.push('%');
            for c in fold_name(search).chars() {
                if matches!(c, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(c);
            }
            pattern.push('%');
            pattern
        })
    }

    /// Whether a product name passes the search filter
    pub fn matches(&self, name: &str) -> bool {
        match &self.search {
            Some(search) => fold_name(name).contains(&fold_name(search)),
            None => true,
        }
    }
}

fn push_search_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    if let Some(pattern) = filter.search_pattern() {
        query.push(" AND name_folded LIKE ");
        query.push_bind(pattern);
        query.push(r" ESCAPE '\'");
    }
}

pub struct Products<'c> {
    db: &'c mut PgConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Products<'c> {
    type CreateRequest = ProductCreateDBRequest;
    type UpdateRequest = ProductUpdateDBRequest;
    type Response = ProductDBResponse;
    type Id = ProductId;
    type Filter = ProductFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        // created_at and updated_at use database DEFAULT NOW()
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, name_folded, description, price, quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, price, quantity, created_at, updated_at
            "#,
        )
        .bind(&request.name)
        .bind(fold_name(&request.name))
        .bind(&request.description)
        .bind(request.price)
        .bind(request.quantity)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(product)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, description, price, quantity, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(product)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT id, name, description, price, quantity, created_at, updated_at FROM products WHERE 1=1",
        );
        push_search_filter(&mut query, filter);

        query.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        query.push_bind(filter.limit);
        query.push(" OFFSET ");
        query.push_bind(filter.skip);

        tracing::debug!("Executing SQL: {}", query.sql());

        let products = query.build_query_as::<Product>().fetch_all(&mut *self.db).await?;

        tracing::debug!("Retrieved {} products", products.len());

        Ok(products)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        // Single conditional write: a missing row comes back as no RETURNING row
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                name_folded = COALESCE($7, name_folded),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                price = COALESCE($5, price),
                quantity = COALESCE($6, quantity),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, price, quantity, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(request.description.is_some())
        .bind(request.description.clone().flatten())
        .bind(request.price)
        .bind(request.quantity)
        .bind(request.name.as_deref().map(fold_name))
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(product)
    }
}

impl<'c> Products<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Count products matching the filter, ignoring skip/limit
    #[instrument(skip(self, filter), err)]
    pub async fn count(&mut self, filter: &ProductFilter) -> Result<i64> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products WHERE 1=1");
        push_search_filter(&mut query, filter);

        let count: i64 = query.build_query_scalar().fetch_one(&mut *self.db).await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sqlx::PgPool;

    fn create_request(name: &str, price: &str, quantity: i32) -> ProductCreateDBRequest {
        ProductCreateDBRequest {
            name: name.to_string(),
            description: Some(format!("{name} description")),
            price: price.parse::<Decimal>().unwrap(),
            quantity,
        }
    }

    #[test]
    fn test_filter_ignores_blank_search() {
        let filter = ProductFilter::new(0, 10).with_search("   ");
        assert_eq!(filter.search, None);
        assert_eq!(filter.search_pattern(), None);
        assert!(filter.matches("anything"));
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        let filter = ProductFilter::new(0, 10).with_search(" 100%_Cotton\\ ");
        assert_eq!(filter.search.as_deref(), Some("100%_Cotton\\"));
        assert_eq!(filter.search_pattern().as_deref(), Some("%100\\%\\_cotton\\\\%"));
    }

    #[test]
    fn test_filter_matches_case_insensitively() {
        let filter = ProductFilter::new(0, 10).with_search("ABC");
        assert!(filter.matches("xxabcxx"));
        assert!(filter.matches("Abc"));
        assert!(!filter.matches("ab c"));
    }

    #[test]
    fn test_fold_name_handles_non_ascii() {
        assert_eq!(fold_name("Синяя РУЧКА"), "синяя ручка");
        let filter = ProductFilter::new(0, 10).with_search("РучКа");
        assert_eq!(filter.search_pattern().as_deref(), Some("%ручка%"));
        assert!(filter.matches("Синяя РУЧКА"));
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_create_and_get_product(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Products::new(&mut conn);

        let created = repo.create(&create_request("Pen", "1.50", 100)).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.price, "1.50".parse::<Decimal>().unwrap());

        let fetched = repo.get_by_id(created.id).await.unwrap().expect("product should exist");
        assert_eq!(fetched, created);
        assert!(repo.get_by_id(created.id + 1000).await.unwrap().is_none());
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_partial_update_and_missing_row(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Products::new(&mut conn);

        let created = repo.create(&create_request("Notebook", "3.00", 5)).await.unwrap();
        let update = ProductUpdateDBRequest {
            price: Some("4.25".parse().unwrap()),
            description: Some(None),
            ..Default::default()
        };
        let updated = repo.update(created.id, &update).await.unwrap();
        assert_eq!(updated.name, "Notebook");
        assert_eq!(updated.quantity, 5);
        assert_eq!(updated.description, None);
        assert_eq!(updated.price, "4.25".parse::<Decimal>().unwrap());

        let missing = repo.update(created.id + 1000, &update).await;
        assert!(matches!(missing, Err(DbError::NotFound)));
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_list_search_count_and_delete(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Products::new(&mut conn);

        for name in ["Red ABC pen", "Blue pen", "abc notebook", "50% off_sale"] {
            repo.create(&create_request(name, "1.00", 1)).await.unwrap();
        }

        let filter = ProductFilter::new(0, 10).with_search("abc");
        let found = repo.list(&filter).await.unwrap();
        assert_eq!(found.len(), 2);
        // Newest first
        assert_eq!(found[0].name, "abc notebook");
        assert_eq!(repo.count(&filter).await.unwrap(), 2);

        let literal = ProductFilter::new(0, 10).with_search("0% off_");
        assert_eq!(repo.count(&literal).await.unwrap(), 1);

        let all = repo.list(&ProductFilter::new(1, 2)).await.unwrap();
        assert_eq!(all.len(), 2);

        assert!(repo.delete(found[0].id).await.unwrap());
        assert!(!repo.delete(found[0].id).await.unwrap());
        assert_eq!(repo.count(&ProductFilter::new(0, 10)).await.unwrap(), 3);
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_search_folds_non_ascii_case(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Products::new(&mut conn);

        let pen = repo.create(&create_request("Синяя РУЧКА", "12.00", 3)).await.unwrap();
        repo.create(&create_request("Красный карандаш", "5.00", 1)).await.unwrap();

        let filter = ProductFilter::new(0, 10).with_search("ручка");
        let found = repo.list(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, pen.id);
        assert_eq!(repo.count(&filter).await.unwrap(), 1);

        // Renaming refreshes the folded copy
        let rename = ProductUpdateDBRequest {
            name: Some("ЗЕЛЁНЫЙ маркер".to_string()),
            ..Default::default()
        };
        repo.update(pen.id, &rename).await.unwrap();
        assert_eq!(repo.count(&filter).await.unwrap(), 0);
        assert_eq!(repo.count(&ProductFilter::new(0, 10).with_search("зелёный")).await.unwrap(), 1);
    }
}
