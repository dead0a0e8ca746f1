//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures
//!
//! # Routes
//!
//! - `GET /`: product management page
//! - `GET|POST /products`: rendered product list, product creation
//! - `GET|PUT|DELETE /products/{id}`: single product operations
//! - `GET /assets/{*path}`: page script and stylesheet
//! - `GET /healthz`: liveness check
//!
//! When `enable_api_docs` is set, the OpenAPI document is served at `/api-docs/openapi.json`
//! with a browsable reference at `/docs`.

pub mod handlers;
pub mod models;
