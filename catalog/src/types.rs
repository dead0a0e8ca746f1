//! Common type definitions.
//!
//! Products are keyed by the `BIGSERIAL` primary key of the `products` table.

/// Identifier of a product row
pub type ProductId = i64;

/// Resource name used in user-facing messages
pub const PRODUCT_RESOURCE: &str = "Product";
