use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_TREND_DAYS: i32 = 30;
pub const MAX_TREND_DAYS: i32 = 365;

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct ProductSales {
    pub name: String,
    pub orders_count: i64,
    pub revenue: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SalesSummary {
    pub total_orders: i64,
    pub total_revenue: i64,
    pub avg_order_value: i64,
    pub total_products: i64,
    pub total_customers: i64,
    pub product_sales: Vec<ProductSales>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
pub struct TrendsQuery {
    pub period: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct SalesTrendPoint {
    pub date: NaiveDate,
    pub orders: i64,
    pub revenue: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SalesTrends {
    pub period_days: i32,
    pub trends: Vec<SalesTrendPoint>,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct StateSales {
    pub state: String,
    pub orders: i64,
    pub revenue: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GeographicSales {
    pub geographic: Vec<StateSales>,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct TopCustomer {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub total_orders: i64,
    pub total_spent_cents: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerAnalytics {
    pub top_customers: Vec<TopCustomer>,
}
