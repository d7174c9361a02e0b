use crate::handlers::common::{
    created_response, map_service_error, success_response, validate_input,
};
use crate::{
    entities::product::Model as ProductModel, errors::ApiError,
    repositories::product_repository::NewProduct, AppState,
};
use axum::{
    extract::{Json, Path, State},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

const PRODUCT_CREATED: &str = "Product successfully created";
const PRODUCT_UPDATED: &str = "Product successfully updated";
const PRODUCT_DELETED: &str = "Product successfully deleted";

fn normalize_string(value: String) -> String {
    value.trim().to_string()
}

fn require<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::ValidationError(format!("Missing required field: {field}")))
}

fn ensure_f64_non_negative(value: f64, field: &str) -> Result<(), ApiError> {
    if value < 0.0 {
        Err(ApiError::ValidationError(format!(
            "{field} cannot be negative"
        )))
    } else {
        Ok(())
    }
}

/// Creates the router for product endpoints
pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/dolar/:id", get(get_product_in_euros))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// Payload accepted when creating or replacing a product.
///
/// Every field is required; they are optional here only so that a
/// missing one yields a validation failure instead of a rejected body.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductPayload {
    /// Source dataset ordinal
    #[serde(default)]
    #[schema(example = 1)]
    pub index: Option<i64>,
    /// Product display name
    #[serde(default)]
    #[validate(length(min = 1))]
    #[schema(example = "Shirt")]
    pub product: Option<String>,
    /// Top-level category
    #[serde(default)]
    #[schema(example = "Clothing")]
    pub category: Option<String>,
    /// Second-level category
    #[serde(default)]
    #[schema(example = "Men")]
    pub sub_category: Option<String>,
    /// Brand name
    #[serde(default)]
    #[schema(example = "BrandX")]
    pub brand: Option<String>,
    /// Current price in the source currency
    #[serde(default)]
    #[schema(example = 10.0)]
    pub sale_price: Option<f64>,
    /// List price in the source currency
    #[serde(default)]
    #[schema(example = 12.0)]
    pub market_price: Option<f64>,
    /// Product type label
    #[serde(default, rename = "type")]
    #[schema(example = "Casual")]
    pub product_type: Option<String>,
    /// Customer rating, expected 0-5
    #[serde(default)]
    #[schema(example = 4.1)]
    pub rating: Option<f64>,
    /// Free text description
    #[serde(default)]
    #[schema(example = "Cotton shirt")]
    pub description: Option<String>,
}

impl ProductPayload {
    /// Check presence of every field and shape the payload for the store
    fn into_new_product(self) -> Result<NewProduct, ApiError> {
        let product = normalize_string(require(self.product, "product")?);
        if product.is_empty() {
            return Err(ApiError::ValidationError(
                "Product name cannot be blank".to_string(),
            ));
        }

        let sale_price = require(self.sale_price, "sale_price")?;
        ensure_f64_non_negative(sale_price, "sale_price")?;

        let market_price = require(self.market_price, "market_price")?;
        ensure_f64_non_negative(market_price, "market_price")?;

        let rating = require(self.rating, "rating")?;
        ensure_f64_non_negative(rating, "rating")?;

        Ok(NewProduct {
            index: require(self.index, "index")?,
            product,
            category: normalize_string(require(self.category, "category")?),
            sub_category: normalize_string(require(self.sub_category, "sub_category")?),
            brand: normalize_string(require(self.brand, "brand")?),
            sale_price,
            market_price,
            product_type: normalize_string(require(self.product_type, "type")?),
            rating,
            description: normalize_string(require(self.description, "description")?),
        })
    }
}

/// Catalog product as returned by every read endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    /// Store-assigned identifier
    #[schema(example = 1)]
    pub id: i64,
    /// Source dataset ordinal
    #[schema(example = 1)]
    pub index: i64,
    /// Product display name
    #[schema(example = "Shirt")]
    pub product: String,
    /// Top-level category
    #[schema(example = "Clothing")]
    pub category: String,
    /// Second-level category
    #[schema(example = "Men")]
    pub sub_category: String,
    /// Brand name
    #[schema(example = "BrandX")]
    pub brand: String,
    /// Current price in the source currency
    #[schema(example = 10.0)]
    pub sale_price: f64,
    /// List price in the source currency
    #[schema(example = 12.0)]
    pub market_price: f64,
    /// Product type label
    #[serde(rename = "type")]
    #[schema(example = "Casual")]
    pub product_type: String,
    /// Customer rating
    #[schema(example = 4.1)]
    pub rating: f64,
    /// Free text description
    #[schema(example = "Cotton shirt")]
    pub description: String,
}

impl From<ProductModel> for ProductResponse {
    fn from(model: ProductModel) -> Self {
        Self {
            id: model.id,
            index: model.index,
            product: model.product,
            category: model.category,
            sub_category: model.sub_category,
            brand: model.brand,
            sale_price: model.sale_price,
            market_price: model.market_price,
            product_type: model.product_type,
            rating: model.rating,
            description: model.description,
        }
    }
}

/// Catalog product extended with euro prices computed from the live rate
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductEuroResponse {
    /// Store-assigned identifier
    #[schema(example = 1)]
    pub id: i64,
    /// Source dataset ordinal
    #[schema(example = 1)]
    pub index: i64,
    /// Product display name
    #[schema(example = "Shirt")]
    pub product: String,
    /// Top-level category
    #[schema(example = "Clothing")]
    pub category: String,
    /// Second-level category
    #[schema(example = "Men")]
    pub sub_category: String,
    /// Brand name
    #[schema(example = "BrandX")]
    pub brand: String,
    /// Current price in the source currency
    #[schema(example = 10.0)]
    pub sale_price: f64,
    /// List price in the source currency
    #[schema(example = 12.0)]
    pub market_price: f64,
    /// Product type label
    #[serde(rename = "type")]
    #[schema(example = "Casual")]
    pub product_type: String,
    /// Customer rating
    #[schema(example = 4.1)]
    pub rating: f64,
    /// Free text description
    #[schema(example = "Cotton shirt")]
    pub description: String,
    /// Sale price converted at the current sell rate
    #[schema(example = 9.2)]
    pub sale_price_euro: f64,
    /// Market price converted at the current sell rate
    #[schema(example = 11.04)]
    pub market_price_euro: f64,
}

impl ProductEuroResponse {
    /// Derive the euro view of a product from the live sell rate
    fn from_model_and_rate(model: ProductModel, rate: f64) -> Self {
        Self {
            id: model.id,
            index: model.index,
            product: model.product,
            category: model.category,
            sub_category: model.sub_category,
            brand: model.brand,
            sale_price: model.sale_price,
            market_price: model.market_price,
            product_type: model.product_type,
            rating: model.rating,
            description: model.description,
            sale_price_euro: model.sale_price * rate,
            market_price_euro: model.market_price * rate,
        }
    }
}

/// Confirmation message returned by write endpoints
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Product successfully created")]
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// List all products
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "Every product in the catalog", body = Vec<ProductResponse>),
        (status = 500, description = "Store failure", body = crate::errors::ErrorBody)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let products = state
        .catalog
        .list_products()
        .await
        .map_err(map_service_error)?;

    let body: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();

    Ok(success_response(body))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/products/:id",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product retrieved", body = ProductResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorBody)
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product = state
        .catalog
        .get_product(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ProductResponse::from(product)))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Product created", body = MessageResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorBody)
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let input = payload.into_new_product()?;

    state
        .catalog
        .create_product(input)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(MessageResponse::new(PRODUCT_CREATED)))
}

/// Replace a product
#[utoipa::path(
    put,
    path = "/products/:id",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product updated", body = MessageResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorBody),
        (status = 404, description = "Product not found", body = crate::errors::ErrorBody)
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    validate_input(&payload)?;
    let input = payload.into_new_product()?;

    state
        .catalog
        .update_product(id, input)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(MessageResponse::new(PRODUCT_UPDATED)))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/products/:id",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted (idempotent)", body = MessageResponse),
        (status = 500, description = "Store failure", body = crate::errors::ErrorBody)
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .catalog
        .delete_product(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(MessageResponse::new(PRODUCT_DELETED)))
}

/// Get a product with euro prices computed from the live rate
#[utoipa::path(
    get,
    path = "/products/dolar/:id",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product with euro prices", body = ProductEuroResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorBody),
        (status = 502, description = "Exchange rate lookup failed", body = crate::errors::ErrorBody)
    ),
    tag = "Products"
)]
pub async fn get_product_in_euros(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let (product, rate) = state
        .catalog
        .get_product_with_eur(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(ProductEuroResponse::from_model_and_rate(
        product, rate,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> ProductPayload {
        ProductPayload {
            index: Some(1),
            product: Some("Shirt".to_string()),
            category: Some("Clothing".to_string()),
            sub_category: Some("Men".to_string()),
            brand: Some("BrandX".to_string()),
            sale_price: Some(10.0),
            market_price: Some(12.0),
            product_type: Some("Casual".to_string()),
            rating: Some(4.1),
            description: Some("Cotton shirt".to_string()),
        }
    }

    #[test]
    fn full_payload_maps_to_store_input() {
        let input = full_payload().into_new_product().unwrap();
        assert_eq!(input.product, "Shirt");
        assert_eq!(input.product_type, "Casual");
        assert!((input.sale_price - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_field_is_named_in_the_error() {
        let mut payload = full_payload();
        payload.market_price = None;

        let err = payload.into_new_product().unwrap_err();
        match err {
            ApiError::ValidationError(message) => {
                assert_eq!(message, "Missing required field: market_price");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_product_name_is_rejected() {
        let mut payload = full_payload();
        payload.product = Some("   ".to_string());

        let err = payload.into_new_product().unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut payload = full_payload();
        payload.sale_price = Some(-1.0);

        let err = payload.into_new_product().unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[test]
    fn names_are_trimmed() {
        let mut payload = full_payload();
        payload.product = Some("  Shirt  ".to_string());
        payload.brand = Some(" BrandX ".to_string());

        let input = payload.into_new_product().unwrap();
        assert_eq!(input.product, "Shirt");
        assert_eq!(input.brand, "BrandX");
    }

    #[test]
    fn euro_view_multiplies_both_prices() {
        let model = ProductModel {
            id: 7,
            index: 1,
            product: "Shirt".to_string(),
            category: "Clothing".to_string(),
            sub_category: "Men".to_string(),
            brand: "BrandX".to_string(),
            sale_price: 10.0,
            market_price: 12.0,
            product_type: "Casual".to_string(),
            rating: 4.1,
            description: "Cotton shirt".to_string(),
            sale_price_euro: None,
            market_price_euro: None,
        };

        let view = ProductEuroResponse::from_model_and_rate(model, 2.0);
        assert!((view.sale_price_euro - 20.0).abs() < f64::EPSILON);
        assert!((view.market_price_euro - 24.0).abs() < f64::EPSILON);
    }
}
