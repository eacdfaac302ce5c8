use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    domain::{ProductCategory, product_specs::MineralSpecs},
    models::Product,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category: ProductCategory,
    #[serde(default)]
    pub specs: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock_quantity: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub category: Option<ProductCategory>,
    pub specs: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub stock_quantity: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct AdminProductQuery {
    pub category: Option<ProductCategory>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

/// Storefront card for one mineral.
#[derive(Debug, Serialize, ToSchema)]
pub struct MineralCard {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image: String,
    #[serde(flatten)]
    pub attributes: MineralSpecs,
    pub price_cents: i64,
    pub specs: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MineralList {
    pub minerals: Vec<MineralCard>,
}
