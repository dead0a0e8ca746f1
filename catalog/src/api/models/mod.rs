//! API request and response data models.
//!
//! These structures define the public HTTP contract and are kept separate from the database
//! models in [`crate::db::models`], so the wire format can evolve independently of storage.
//!
//! - [`products`]: the product payload, its validation rules, and the product resource
//! - [`pagination`]: page-number query parameters and the [`pagination::Page`] result
//! - [`envelope`]: the `success`/`message`/`errors` wrappers every JSON response uses

pub mod envelope;
pub mod pagination;
pub mod products;
