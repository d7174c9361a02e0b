use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, instrument};

use crate::db::DbPool;
use crate::entities::product::Model as ProductModel;
use crate::errors::ServiceError;
use crate::import::{self, ImportSummary};
use crate::repositories::product_repository::{NewProduct, ProductRepository};
use crate::services::currency::CurrencyClient;

/// Message reported whenever a product id has no row behind it
pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Outcome of a catalog-wide euro conversion
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CatalogConversion {
    pub rate: f64,
    pub rows: u64,
}

/// Service for managing the product catalog
pub struct CatalogService {
    repository: ProductRepository,
    currency: Arc<CurrencyClient>,
}

impl CatalogService {
    /// Creates a new catalog service instance
    pub fn new(db_pool: Arc<DbPool>, currency: Arc<CurrencyClient>) -> Self {
        Self {
            repository: ProductRepository::new(db_pool),
            currency,
        }
    }

    /// All products, in the order they were inserted
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductModel>, ServiceError> {
        self.repository.find_all().await.map_err(|e| {
            error!("Failed to list products: {}", e);
            e
        })
    }

    /// One product by id
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i64) -> Result<ProductModel, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(PRODUCT_NOT_FOUND.to_string()))
    }

    /// Store a new product and return its assigned id
    #[instrument(skip(self, new))]
    pub async fn create_product(&self, new: NewProduct) -> Result<i64, ServiceError> {
        let created = self.repository.insert(new).await.map_err(|e| {
            error!("Failed to create product: {}", e);
            e
        })?;

        info!(product_id = created.id, "Product created");
        Ok(created.id)
    }

    /// Replace every writable field of an existing product
    #[instrument(skip(self, new))]
    pub async fn update_product(
        &self,
        id: i64,
        new: NewProduct,
    ) -> Result<ProductModel, ServiceError> {
        match self.repository.update(id, new).await? {
            Some(model) => {
                info!(product_id = id, "Product updated");
                Ok(model)
            }
            None => Err(ServiceError::NotFound(PRODUCT_NOT_FOUND.to_string())),
        }
    }

    /// Delete a product. Deleting an id that never existed still succeeds.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i64) -> Result<(), ServiceError> {
        let removed = self.repository.delete(id).await.map_err(|e| {
            error!("Failed to delete product {}: {}", id, e);
            e
        })?;

        info!(product_id = id, removed, "Product delete processed");
        Ok(())
    }

    /// One product together with the live sell rate for euro pricing.
    ///
    /// Absence is reported before any lookup happens, so a missing id
    /// never costs an upstream call. The euro figures derived from the
    /// returned rate are per-request and never written back.
    #[instrument(skip(self))]
    pub async fn get_product_with_eur(
        &self,
        id: i64,
    ) -> Result<(ProductModel, f64), ServiceError> {
        let product = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(PRODUCT_NOT_FOUND.to_string()))?;

        let rate = self.currency.fetch_sell_rate().await?;

        Ok((product, rate))
    }

    /// Fetch the live rate and persist euro prices for every product
    #[instrument(skip(self))]
    pub async fn convert_catalog_prices(&self) -> Result<CatalogConversion, ServiceError> {
        let rate = self.currency.fetch_sell_rate().await?;
        let rows = self.repository.apply_conversion(rate).await?;

        info!(rate, rows, "Catalog prices converted to euro");
        Ok(CatalogConversion { rate, rows })
    }

    /// Load a catalog CSV through the bulk insert path
    #[instrument(skip(self))]
    pub async fn import_from_csv(&self, path: &Path) -> Result<ImportSummary, ServiceError> {
        import::import_csv(&self.repository, path).await
    }
}
