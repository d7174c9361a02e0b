use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Catalog API",
        version = "1.0.0",
        description = r#"
# Product Catalog API

A CRUD service over a product catalog with on-demand euro pricing.

## Features

- **Product Management**: Create, read, update, and delete catalog products
- **Euro Pricing**: Per-product prices converted at the current sell rate
- **Bulk Import**: One-time CSV loading through the admin binary

## Error Handling

Errors use a flat response body with appropriate HTTP status codes:

```json
{
  "message": "Product not found"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    ),
    paths(
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::products::update_product,
        crate::handlers::products::delete_product,
        crate::handlers::products::get_product_in_euros,
    ),
    components(
        schemas(
            crate::handlers::products::ProductPayload,
            crate::handlers::products::ProductResponse,
            crate::handlers::products::ProductEuroResponse,
            crate::handlers::products::MessageResponse,
            crate::errors::ErrorBody
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        let openapi = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Catalog API"));
        assert!(json.contains("/products/dolar/:id"));
        assert!(json.contains("ProductEuroResponse"));
    }
}
