//! OpenAPI document for the product endpoints.

use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::products::list_products,
        api::handlers::products::create_product,
        api::handlers::products::get_product,
        api::handlers::products::update_product,
        api::handlers::products::delete_product,
    ),
    components(
        schemas(
            api::models::products::ProductPayload,
            api::models::products::ProductResponse,
            api::models::envelope::ProductEnvelope,
            api::models::envelope::ProductListResponse,
            api::models::envelope::MessageResponse,
            api::models::envelope::ErrorResponse,
        )
    ),
    tags(
        (name = "products", description = "Product catalog management"),
    ),
    info(
        title = "Catalog API",
        version = "1.0.0",
        description = "Create, list, update and delete catalog products.

## Responses

Every JSON response carries a `success` flag. Failures add a `message`, and validation failures
(422) also list the problems per field:

```json
{
  \"success\": false,
  \"message\": \"The given data was invalid\",
  \"errors\": { \"price\": [\"The price field is required.\"] }
}
```

## Listing

`GET /products` returns the product table and pagination bar already rendered as HTML, together
with the number of matching products.",
    ),
)]
pub struct ProductsApiDoc;
