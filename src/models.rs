use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ProductSpecs;

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminUser {
    pub id: Uuid,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category: String,
    pub specs: Vec<String>,
    pub images: Vec<String>,
    /// Typed attributes derived from `specs`; absent for unknown categories.
    pub details: Option<ProductSpecs>,
    pub stock_quantity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub total_orders: i64,
    pub total_spent_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub product_id: Option<Uuid>,
    pub quantity: i32,
    pub total_amount_cents: i64,
    pub status: String,
    pub tracking_number: Option<String>,
    pub shipping_address: Option<String>,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin order listing row: the order plus the product it references.
#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct OrderListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: Order,
    pub product_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, FromRow)]
pub struct ReturnRequest {
    pub id: Uuid,
    pub order_id: Uuid,
    pub reason: String,
    pub status: String,
    pub refund_amount_cents: Option<i64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct ReturnListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub request: ReturnRequest,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub product_name: Option<String>,
}
