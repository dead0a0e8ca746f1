//! Database models for products.

use crate::types::ProductId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Database representation of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to insert a new product. Fields are expected to be validated already.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCreateDBRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
}

/// Request to update an existing product.
///
/// `None` leaves a column untouched. `description` is doubly optional so that
/// `Some(None)` can clear it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductUpdateDBRequest {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
}

impl ProductUpdateDBRequest {
    /// Apply the supplied fields to an in-memory product
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
    }
}

/// Response from database after creating or updating a product
pub type ProductDBResponse = Product;
