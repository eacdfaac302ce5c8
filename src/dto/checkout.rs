use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::payment::PaymentVerification;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ContactInfo {
    #[serde(alias = "fullName")]
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(alias = "street")]
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl ContactInfo {
    /// Trimmed copy; the email stored on orders and used for customer lookup
    /// is this one.
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            ..self.clone()
        }
    }

    /// Single-line address stored on each order as a snapshot.
    pub fn shipping_address(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.address, &self.city, &self.state, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: String,
    pub price: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub name: Option<String>,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(alias = "formData")]
    pub contact: ContactInfo,
    pub cart_items: Vec<CartItem>,
    pub subtotal: Option<i64>,
    #[serde(default)]
    pub shipping: i64,
    pub total: Option<i64>,
    pub payment_method: Option<String>,
    pub payment_reference: Option<String>,
    pub payment_status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutKind {
    Purchase,
    SellInquiry,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutReceipt {
    pub success: bool,
    pub order_number: String,
    pub kind: CheckoutKind,
    pub order_ids: Vec<Uuid>,
    pub total_amount_cents: i64,
    pub payment_required: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyPaymentRequest {
    pub reference: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub verification: PaymentVerification,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusByNumberRequest {
    pub order_number: String,
    pub status: String,
    pub payment_reference: Option<String>,
}
