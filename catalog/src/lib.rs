//! # catalog: product catalog manager
//!
//! `catalog` serves a single-page product management screen backed by a small JSON API. The page
//! shows a searchable, paginated product table with create, edit and delete dialogs; the table
//! and its pagination bar are rendered on the server and swapped into the page by a small script.
//!
//! ## Architecture
//!
//! The application is built on [Axum](https://github.com/tokio-rs/axum). Products are kept in
//! PostgreSQL (recommended) or in process memory, selected by `database.type` in the
//! configuration.
//!
//! A request to `/products` flows through:
//!
//! 1. **Handler** ([`api::handlers::products`]): extracts the path, query or JSON body. Malformed
//!    input becomes a 400 envelope, never axum's plain-text rejection.
//! 2. **Validation** ([`validation`], [`api::models::products::ProductPayload`]): trims and checks
//!    every field, collecting all problems per field into a 422 response.
//! 3. **Service** ([`services::ProductService`]): the storage backend, shared as a trait object in
//!    [`AppState`].
//! 4. **Rendering** ([`views`]): the listing endpoint returns the table and pagination bar as
//!    HTML fragments rendered with minijinja.
//!
//! Every JSON response carries a `success` flag; failures also carry a human readable `message`
//! (see [`errors::Error`]).
//!
//! ## Running
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/catalog catalog -f config.yaml
//! ```
//!
//! Migrations in `./migrations` run automatically at startup when PostgreSQL is used.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod openapi;
pub mod services;
mod static_assets;
pub mod telemetry;
pub mod types;
pub mod validation;
pub mod views;

#[cfg(test)]
pub mod test_utils;

use std::sync::Arc;

use axum::{
    Json, Router,
    http::{self, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
};
use bon::Builder;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    api::models::envelope::ErrorResponse,
    config::{CorsOrigin, DatabaseConfig, PoolSettings},
    openapi::ProductsApiDoc,
    services::{InMemoryProductService, PostgresProductService, ProductService},
    views::Views,
};

pub use config::Config;
pub use types::ProductId;

/// Application state shared across all request handlers.
///
/// ```ignore
/// let state = AppState::builder()
///     .products(Arc::new(InMemoryProductService::new()))
///     .views(Arc::new(Views::new("₽")?))
///     .config(config)
///     .build();
/// ```
#[derive(Clone, Builder)]
pub struct AppState {
    pub products: Arc<dyn ProductService>,
    pub views: Arc<Views>,
    pub config: Config,
}

/// Get the catalog database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

async fn connect_pool(url: &str, settings: &PoolSettings) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout())
        .idle_timeout(settings.idle_timeout())
        .max_lifetime(settings.max_lifetime())
        .connect(url)
        .await?;
    Ok(pool)
}

/// Pick the storage backend. PostgreSQL pools are migrated before use.
async fn setup_storage(config: &Config) -> anyhow::Result<(Arc<dyn ProductService>, Option<PgPool>)> {
    match &config.database {
        DatabaseConfig::External { url, pool } => {
            info!("Using external database");
            let pool = connect_pool(url, pool).await?;
            migrator().run(&pool).await?;
            Ok((Arc::new(PostgresProductService::new(pool.clone())), Some(pool)))
        }
        DatabaseConfig::Memory => {
            info!("Using in-memory storage: products will be lost on shutdown");
            Ok((Arc::new(InMemoryProductService::new()), None))
        }
    }
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.cors;

    let allow_origin = if cors_config.allowed_origins.contains(&CorsOrigin::Wildcard) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                origins.push(url.origin().ascii_serialization().parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([http::header::CONTENT_TYPE, http::header::ACCEPT])
        .allow_credentials(cors_config.allow_credentials);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}

/// Build the application router with all endpoints and middleware.
///
/// - `/`: the product management page
/// - `/products`, `/products/{id}`: the JSON API
/// - `/assets/{*path}`: embedded script and stylesheet
/// - `/healthz`: liveness
/// - `/api-docs/openapi.json` and `/docs` when `enable_api_docs` is set
///
/// Unknown routes get a 404 JSON envelope.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    use api::handlers::{pages, products, static_assets};

    let enable_api_docs = state.config.enable_api_docs;
    let cors_layer = create_cors_layer(&state.config)?;

    let mut router = Router::new()
        .route("/", get(pages::home))
        .route("/products", get(products::list_products).post(products::create_product))
        .route(
            "/products/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/assets/{*path}", get(static_assets::serve_embedded_asset))
        .route("/healthz", get(|| async { "OK" }))
        .fallback(not_found)
        .with_state(state);

    if enable_api_docs {
        router = router
            .route("/api-docs/openapi.json", get(|| async { Json(ProductsApiDoc::openapi()) }))
            .merge(Scalar::with_url("/docs", ProductsApiDoc::openapi()));
    }

    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// A configured application: storage connected, router built, ready to serve.
pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting catalog with configuration: {:#?}", config);

        let (products, pool) = setup_storage(&config).await?;
        let views = Views::new(config.catalog.currency_symbol.clone())?;

        let app_state = AppState::builder()
            .products(products)
            .views(Arc::new(views))
            .config(config.clone())
            .build();

        let router = build_router(app_state)?;

        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Catalog listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::{create_test_config, create_test_server, create_test_server_with_config};
    use serde_json::Value;
    use sqlx::ConnectOptions;

    #[tokio::test]
    async fn test_healthz() {
        let server = create_test_server();

        let response = server.get("/healthz").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "OK");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_not_found() {
        let server = create_test_server();

        let response = server.get("/nope").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Not found");
    }

    #[tokio::test]
    async fn test_api_docs_enabled() {
        let server = create_test_server();

        let response = server.get("/api-docs/openapi.json").await;
        response.assert_status_ok();
        let doc: Value = response.json();
        assert!(doc["paths"]["/products/{id}"].is_object());

        server.get("/docs").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_api_docs_disabled() {
        let config = Config {
            enable_api_docs: false,
            ..create_test_config()
        };
        let server = create_test_server_with_config(config);

        server.get("/api-docs/openapi.json").await.assert_status(StatusCode::NOT_FOUND);
        server.get("/docs").await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        let mut config = create_test_config();
        config.cors.allowed_origins = vec![CorsOrigin::Url("https://shop.example.com".parse().unwrap())];
        let server = create_test_server_with_config(config);

        let response = server
            .method(Method::OPTIONS, "/products")
            .add_header("origin", "https://shop.example.com")
            .add_header("access-control-request-method", "POST")
            .await;

        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .map(|v| v.to_str().unwrap()),
            Some("https://shop.example.com")
        );
    }

    #[tokio::test]
    async fn test_application_with_memory_storage() {
        let app = Application::new(create_test_config()).await.unwrap();
        let server = app.into_test_server();

        server.get("/healthz").await.assert_status_ok();
        let body: Value = server.get("/products").await.json();
        assert_eq!(body["total"], 0);
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL pointing at a PostgreSQL server"]
    async fn test_application_with_external_database(pool: PgPool) {
        let mut config = create_test_config();
        config.database = DatabaseConfig::External {
            url: pool.connect_options().to_url_lossy().to_string(),
            pool: PoolSettings {
                max_connections: 2,
                ..Default::default()
            },
        };

        let server = Application::new(config).await.unwrap().into_test_server();

        let created: Value = server
            .post("/products")
            .json(&serde_json::json!({ "name": "Pen", "price": 1.25, "quantity": 3 }))
            .await
            .json();
        assert_eq!(created["product"]["price"], 1.25);

        let body: Value = server.get("/products").await.json();
        assert_eq!(body["total"], 1);
    }
}
