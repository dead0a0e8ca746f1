//! HTTP handlers for the product CRUD endpoints.
//!
//! Each handler accepts the raw extractor result so a malformed body or path still gets the
//! JSON envelope (400) instead of axum's plain-text rejection.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    AppState,
    api::models::{
        envelope::{ErrorResponse, MessageResponse, PRODUCT_DELETED, PRODUCT_UPDATED, ProductEnvelope, ProductListResponse},
        products::{ListProductsQuery, ProductPayload, ProductResponse},
    },
    errors::{Error, Result},
    types::ProductId,
};

fn product_id(path: std::result::Result<Path<ProductId>, PathRejection>) -> Result<ProductId> {
    let Path(id) = path?;
    Ok(id)
}

fn payload(body: std::result::Result<Json<ProductPayload>, JsonRejection>) -> Result<ProductPayload> {
    let Json(payload) = body?;
    Ok(payload)
}

/// List products as rendered HTML fragments
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    summary = "List products",
    description = "Returns one page of the product table, newest first, rendered as HTML along with the pagination bar.",
    params(ListProductsQuery),
    responses(
        (status = 200, description = "Rendered page of products", body = ProductListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_products(State(state): State<AppState>, Query(query): Query<ListProductsQuery>) -> Result<Json<ProductListResponse>> {
    let request = query.pagination.request(&state.config.pagination);

    let page = state
        .products
        .list_products(query.search.as_deref(), request)
        .await
        .map_err(|e| e.or_internal("list products"))?;

    let html = state
        .views
        .render_table(&page)
        .map_err(|e| Error::Other(e.into()).or_internal("list products"))?;
    let pagination = state
        .views
        .render_pagination(&page)
        .map_err(|e| Error::Other(e.into()).or_internal("list products"))?;

    Ok(Json(ProductListResponse::new(html, pagination, page.total)))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    summary = "Create product",
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product created", body = ProductEnvelope),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_product(
    State(state): State<AppState>,
    body: std::result::Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Json<ProductEnvelope>> {
    let request = payload(body)?.validate_create()?;

    let product = state
        .products
        .create_product(&request)
        .await
        .map_err(|e| e.or_internal("create product"))?;

    Ok(Json(ProductEnvelope::created(ProductResponse::from(product))))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    summary = "Get product",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product details", body = ProductEnvelope),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_product(
    State(state): State<AppState>,
    path: std::result::Result<Path<ProductId>, PathRejection>,
) -> Result<Json<ProductEnvelope>> {
    let id = product_id(path)?;

    match state.products.get_product(id).await.map_err(|e| e.or_internal("load product"))? {
        Some(product) => Ok(Json(ProductEnvelope::found(ProductResponse::from(product)))),
        None => Err(Error::product_not_found(id)),
    }
}

/// Update some or all fields of a product
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    summary = "Update product",
    description = "Only the supplied fields change. Send `description: null` to clear the description.",
    request_body = ProductPayload,
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product updated", body = MessageResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_product(
    State(state): State<AppState>,
    path: std::result::Result<Path<ProductId>, PathRejection>,
    body: std::result::Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let id = product_id(path)?;
    let request = payload(body)?.validate_update()?;

    state
        .products
        .update_product(id, &request)
        .await
        .map_err(|e| e.or_internal("update product"))?;

    Ok(Json(MessageResponse::new(PRODUCT_UPDATED)))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    summary = "Delete product",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_product(
    State(state): State<AppState>,
    path: std::result::Result<Path<ProductId>, PathRejection>,
) -> Result<Json<MessageResponse>> {
    let id = product_id(path)?;

    state
        .products
        .delete_product(id)
        .await
        .map_err(|e| e.or_internal("delete product"))?;

    Ok(Json(MessageResponse::new(PRODUCT_DELETED)))
}
