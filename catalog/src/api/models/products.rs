//! API request/response models for products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use super::pagination::Pagination;
use crate::db::models::products::{ProductCreateDBRequest, ProductDBResponse, ProductUpdateDBRequest};
use crate::types::ProductId;
use crate::validation::{self, Input, Presence, ValidationErrors, Validator};

/// Timestamp format used in product resources
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const NAME_MAX_CHARS: usize = 255;
pub const PRICE_SCALE: u32 = 2;

/// Largest price that fits the `NUMERIC(12, 2)` column
pub fn max_price() -> Decimal {
    Decimal::new(999_999_999_999, PRICE_SCALE)
}

/// Query parameters for listing products
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProductsQuery {
    /// Case-insensitive substring match on product name
    pub search: Option<String>,

    /// Pagination parameters
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,
}

/// Product fields as sent by the client, before validation.
///
/// Every field keeps its raw JSON value so that validation can report type mismatches per field
/// and tell an omitted field apart from an explicit `null`. Unknown fields are ignored.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProductPayload {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, max_length = 255)]
    pub name: Option<Option<Value>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<Value>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<f64>, minimum = 0)]
    pub price: Option<Option<Value>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>, minimum = 0)]
    pub quantity: Option<Option<Value>>,
}

impl ProductPayload {
    /// Validate a create request: name, price and quantity are required
    pub fn validate_create(self) -> Result<ProductCreateDBRequest, ValidationErrors> {
        let mut v = Validator::new();
        let name = v.field(
            "name",
            Input::from_raw(self.name),
            Presence::Required,
            false,
            validation::string(Some(NAME_MAX_CHARS)),
        );
        let description = v.field(
            "description",
            Input::from_raw(self.description),
            Presence::Sometimes,
            true,
            validation::string(None),
        );
        let price = v.field(
            "price",
            Input::from_raw(self.price),
            Presence::Required,
            false,
            validation::non_negative_decimal(max_price(), PRICE_SCALE),
        );
        let quantity = v.field(
            "quantity",
            Input::from_raw(self.quantity),
            Presence::Required,
            false,
            validation::non_negative_i32(),
        );

        let request = match (name.flatten(), price.flatten(), quantity.flatten()) {
            (Some(name), Some(price), Some(quantity)) => Some(ProductCreateDBRequest {
                name,
                description: description.flatten(),
                price,
                quantity,
            }),
            _ => None,
        };
        v.finish(request)
    }

    /// Validate an update request: every field is optional, `description: null` clears it
    pub fn validate_update(self) -> Result<ProductUpdateDBRequest, ValidationErrors> {
        let mut v = Validator::new();
        let name = v.field(
            "name",
            Input::from_raw(self.name),
            Presence::Sometimes,
            false,
            validation::string(Some(NAME_MAX_CHARS)),
        );
        let description = v.field(
            "description",
            Input::from_raw(self.description),
            Presence::Sometimes,
            true,
            validation::string(None),
        );
        let price = v.field(
            "price",
            Input::from_raw(self.price),
            Presence::Sometimes,
            false,
            validation::non_negative_decimal(max_price(), PRICE_SCALE),
        );
        let quantity = v.field(
            "quantity",
            Input::from_raw(self.quantity),
            Presence::Sometimes,
            false,
            validation::non_negative_i32(),
        );

        v.finish(Some(ProductUpdateDBRequest {
            name: name.flatten(),
            description,
            price: price.flatten(),
            quantity: quantity.flatten(),
        }))
    }
}

fn serialize_timestamp<S: Serializer>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&timestamp.format(TIMESTAMP_FORMAT))
}

/// Product resource returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    #[schema(value_type = f64, example = 1.5)]
    pub price: Decimal,
    pub quantity: i32,
    #[serde(serialize_with = "serialize_timestamp")]
    #[schema(value_type = String, example = "2025-06-01 12:00:00")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_timestamp")]
    #[schema(value_type = String, example = "2025-06-01 12:00:00")]
    pub updated_at: DateTime<Utc>,
}

impl From<ProductDBResponse> for ProductResponse {
    fn from(db: ProductDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            description: db.description,
            price: db.price,
            quantity: db.quantity,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
