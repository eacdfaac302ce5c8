use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::{GatewayError, PaymentGateway, PaymentVerification};

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Paystack adapter; `GET /transaction/verify/{reference}` with the secret key.
pub struct PaystackGateway {
    client: Client,
    secret_key: String,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct VerifyEnvelope {
    status: bool,
    #[serde(default)]
    message: Option<String>,
    data: Option<VerifyData>,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    status: String,
    reference: Option<String>,
    amount: Option<i64>,
}

impl PaystackGateway {
    pub fn new(secret_key: &str, base_url: &str) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| {
            GatewayError::InvalidResponse(format!("invalid base URL '{base_url}': {e}"))
        })?;

        Ok(Self {
            client,
            secret_key: secret_key.to_owned(),
            base_url,
        })
    }

    fn verify_url(&self, reference: &str) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidResponse("base URL cannot have a path".into()))?
            .pop_if_empty()
            .extend(["transaction", "verify", reference]);
        Ok(url)
    }
}

#[async_trait]
impl PaymentGateway for PaystackGateway {
    async fn verify(&self, reference: &str) -> Result<PaymentVerification, GatewayError> {
        let url = self.verify_url(reference)?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        let http_status = response.status();
        if http_status.is_server_error() {
            return Err(GatewayError::InvalidResponse(format!(
                "gateway returned {http_status}"
            )));
        }

        // Paystack answers unknown references with 4xx and `status: false`.
        let envelope: VerifyEnvelope = response.json().await?;
        let data = match (envelope.status, envelope.data) {
            (true, Some(data)) => data,
            _ => {
                tracing::info!(
                    reference,
                    message = envelope.message.as_deref().unwrap_or("-"),
                    "payment not verified"
                );
                return Ok(PaymentVerification {
                    reference: reference.to_string(),
                    verified: false,
                    amount: None,
                    gateway_status: "failed".to_string(),
                });
            }
        };

        Ok(PaymentVerification {
            reference: data.reference.unwrap_or_else(|| reference.to_string()),
            verified: data.status == "success",
            amount: data.amount,
            gateway_status: data.status,
        })
    }
}
