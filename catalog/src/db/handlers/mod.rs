//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection (or transaction), builds and binds its
//! queries, and returns models from [`crate::db::models`]. Repositories implement
//! the [`Repository`] trait for the common CRUD surface and add table-specific
//! helpers (such as [`Products::count`]) as inherent methods.
//!
//! ```ignore
//! use catalog::db::handlers::{Products, Repository};
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut repo = Products::new(&mut conn);
//!
//!     if let Some(product) = repo.get_by_id(42).await? {
//!         println!("Found product: {}", product.name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod products;
pub mod repository;

pub use products::Products;
pub use repository::Repository;
