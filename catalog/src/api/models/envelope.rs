//! JSON response envelopes.
//!
//! Every JSON response carries a `success` flag. Successful writes add a human readable
//! `message`, failures add a `message` and, for validation failures, a per-field `errors` map.

use serde::Serialize;
use utoipa::ToSchema;

use super::products::ProductResponse;
use crate::validation::ValidationErrors;

pub const PRODUCT_CREATED: &str = "Product created successfully";
pub const PRODUCT_UPDATED: &str = "Product updated successfully";
pub const PRODUCT_DELETED: &str = "Product deleted successfully";

/// A failed request
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    pub message: String,
    /// Field name to list of messages, present only for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<std::collections::HashMap<String, Vec<String>>>)]
    pub errors: Option<ValidationErrors>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: ValidationErrors) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// A successful write with nothing to return but a message
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// A single product, optionally with a message (create)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub product: ProductResponse,
}

impl ProductEnvelope {
    pub fn created(product: ProductResponse) -> Self {
        Self {
            success: true,
            message: Some(PRODUCT_CREATED.to_string()),
            product,
        }
    }

    pub fn found(product: ProductResponse) -> Self {
        Self {
            success: true,
            message: None,
            product,
        }
    }
}

/// A rendered page of the product table
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductListResponse {
    pub success: bool,
    /// Table fragment (or the "no products" notice)
    pub html: String,
    /// Pagination fragment, empty when everything fits on one page
    pub pagination: String,
    /// Number of products matching the search, across all pages
    pub total: i64,
}

impl ProductListResponse {
    pub fn new(html: String, pagination: String, total: i64) -> Self {
        Self {
            success: true,
            html,
            pagination,
            total,
        }
    }
}
