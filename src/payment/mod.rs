//! Payment-gateway collaborator used by `/api/verify-payment`.
//!
//! Verification never touches orders: callers move order status separately
//! once a payment is confirmed.

mod paystack;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub use paystack::PaystackGateway;

/// Outcome of asking the gateway about one transaction reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaymentVerification {
    pub reference: String,
    pub verified: bool,
    /// Amount the gateway reports, in minor units.
    pub amount: Option<i64>,
    pub gateway_status: String,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("payment gateway is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected gateway response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn verify(&self, reference: &str) -> Result<PaymentVerification, GatewayError>;
}

/// Gateway used when no secret key is configured; every check fails.
pub struct DisabledGateway;

#[async_trait]
impl PaymentGateway for DisabledGateway {
    async fn verify(&self, _reference: &str) -> Result<PaymentVerification, GatewayError> {
        Err(GatewayError::NotConfigured)
    }
}
