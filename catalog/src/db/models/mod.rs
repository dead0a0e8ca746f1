//! Database record models matching table schemas.
//!
//! These structs correspond directly to rows of the `products` table and to the
//! insert/update payloads the repositories accept. They derive `sqlx::FromRow`
//! and are kept separate from the API models in [`crate::api::models`], so the
//! wire format (float prices, formatted timestamps) can evolve independently of
//! storage.
//!
//! - [`products`]: Product rows and create/update requests

pub mod products;
