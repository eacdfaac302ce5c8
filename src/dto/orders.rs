use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, OrderListing};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
    pub tracking_number: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateRequest {
    #[serde(alias = "order_ids")]
    pub order_ids: Vec<Uuid>,
    #[serde(alias = "new_status", alias = "status")]
    pub new_status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkUpdateResult {
    pub updated_count: u64,
    pub status: String,
    pub order_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderListing>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderUpdated {
    pub order: Order,
    pub previous_status: String,
}
