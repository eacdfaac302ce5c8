use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::ReturnListing;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReturnRequest {
    pub order_id: Uuid,
    pub reason: String,
    pub refund_amount_cents: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReturnRequest {
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReturnList {
    pub items: Vec<ReturnListing>,
}
