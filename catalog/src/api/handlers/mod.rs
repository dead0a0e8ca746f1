//! HTTP request handlers.
//!
//! - [`products`]: the JSON CRUD endpoints under `/products`
//! - [`pages`]: the server-rendered product management page
//! - [`static_assets`]: the embedded script and stylesheet under `/assets`

pub mod pages;
pub mod products;
pub mod static_assets;
