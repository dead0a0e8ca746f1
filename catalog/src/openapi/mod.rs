//! OpenAPI documentation configuration.
//!
//! - [`products::ProductsApiDoc`]: the JSON product endpoints under `/products`
//!
//! The page (`/`), static assets and `/healthz` are not part of the document.

pub mod products;

pub use products::ProductsApiDoc;
