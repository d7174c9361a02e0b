use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog product entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_catalog")]
pub struct Model {
    /// Primary key, assigned by the store
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Ordinal carried over from the source dataset, not unique
    pub index: i64,

    /// Product display name
    pub product: String,

    /// Top-level category
    pub category: String,

    pub sub_category: String,

    pub brand: String,

    /// Current price in the source currency
    pub sale_price: f64,

    /// List price in the source currency
    pub market_price: f64,

    /// Product type label
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub product_type: String,

    /// Customer rating, expected 0-5 but unenforced
    pub rating: f64,

    pub description: String,

    /// Euro sale price, written only by an explicit conversion
    pub sale_price_euro: Option<f64>,

    /// Euro market price, written only by an explicit conversion
    pub market_price_euro: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
