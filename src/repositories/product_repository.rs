use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, NotSet, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::entities::product::{
    ActiveModel as ProductActiveModel, Column, Entity as Product, Model as ProductModel,
};
use crate::errors::AppError;
use crate::repositories::Repository;

use super::BaseRepository;

/// Writable fields of a catalog product. The store assigns the id and
/// only an explicit conversion touches the euro columns.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub index: i64,
    pub product: String,
    pub category: String,
    pub sub_category: String,
    pub brand: String,
    pub sale_price: f64,
    pub market_price: f64,
    #[serde(rename = "type")]
    pub product_type: String,
    pub rating: f64,
    pub description: String,
}

impl NewProduct {
    fn into_active_model(self) -> ProductActiveModel {
        ProductActiveModel {
            id: NotSet,
            index: Set(self.index),
            product: Set(self.product),
            category: Set(self.category),
            sub_category: Set(self.sub_category),
            brand: Set(self.brand),
            sale_price: Set(self.sale_price),
            market_price: Set(self.market_price),
            product_type: Set(self.product_type),
            rating: Set(self.rating),
            description: Set(self.description),
            sale_price_euro: NotSet,
            market_price_euro: NotSet,
        }
    }
}

/// Repository for catalog product operations
#[derive(Debug)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All products in insertion order
    pub async fn find_all(&self) -> Result<Vec<ProductModel>, AppError> {
        Product::find()
            .order_by_asc(Column::Id)
            .all(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Find a product by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<ProductModel>, AppError> {
        Product::find_by_id(id)
            .one(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Store a new product and return it with its assigned id
    pub async fn insert(&self, new: NewProduct) -> Result<ProductModel, AppError> {
        new.into_active_model()
            .insert(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)
    }

    /// Replace every writable field of an existing product.
    ///
    /// Returns `Ok(None)` when no row has the given id; a missing row is
    /// never created here.
    pub async fn update(&self, id: i64, new: NewProduct) -> Result<Option<ProductModel>, AppError> {
        let existing = self.find_by_id(id).await?;

        let Some(existing) = existing else {
            return Ok(None);
        };

        let mut active_model: ProductActiveModel = existing.into();
        active_model.index = Set(new.index);
        active_model.product = Set(new.product);
        active_model.category = Set(new.category);
        active_model.sub_category = Set(new.sub_category);
        active_model.brand = Set(new.brand);
        active_model.sale_price = Set(new.sale_price);
        active_model.market_price = Set(new.market_price);
        active_model.product_type = Set(new.product_type);
        active_model.rating = Set(new.rating);
        active_model.description = Set(new.description);

        let updated = active_model
            .update(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(Some(updated))
    }

    /// Delete a product by ID. Deleting an absent row is a no-op;
    /// the returned count says whether a row actually went away.
    pub async fn delete(&self, id: i64) -> Result<u64, AppError> {
        let result = Product::delete_by_id(id)
            .exec(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(result.rows_affected)
    }

    /// Insert a batch of products one by one, skipping rows the database
    /// rejects. Returns `(inserted, failed)` counts.
    pub async fn bulk_insert(&self, rows: Vec<NewProduct>) -> Result<(u64, u64), AppError> {
        let mut inserted = 0u64;
        let mut failed = 0u64;

        for row in rows {
            let label = row.product.clone();
            match row.into_active_model().insert(self.base.get_db()).await {
                Ok(_) => inserted += 1,
                Err(e) => {
                    warn!(product = %label, error = %e, "Skipping row rejected by the database");
                    failed += 1;
                }
            }
        }

        Ok((inserted, failed))
    }

    /// Persist euro prices for the whole catalog in a single statement.
    ///
    /// Returns the number of rows the update touched.
    pub async fn apply_conversion(&self, rate: f64) -> Result<u64, AppError> {
        let result = Product::update_many()
            .col_expr(
                Column::SalePriceEuro,
                Expr::col(Column::SalePrice).mul(rate),
            )
            .col_expr(
                Column::MarketPriceEuro,
                Expr::col(Column::MarketPrice).mul(rate),
            )
            .exec(self.base.get_db())
            .await
            .map_err(AppError::DatabaseError)?;

        Ok(result.rows_affected)
    }
}

impl Repository for ProductRepository {
    fn get_db(&self) -> &DatabaseConnection {
        self.base.get_db()
    }
}
