use crate::{
    dto::checkout::{VerifyPaymentRequest, VerifyPaymentResponse},
    error::{AppError, AppResult},
    payment::PaymentGateway,
    response::ApiResponse,
};

/// Ask the gateway about a reference. Orders are left untouched either way.
pub async fn verify_payment(
    gateway: &dyn PaymentGateway,
    payload: VerifyPaymentRequest,
) -> AppResult<ApiResponse<VerifyPaymentResponse>> {
    let reference = payload
        .reference
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::BadRequest("Payment reference is required".into()))?;

    let verification = gateway.verify(reference).await?;
    if !verification.verified {
        tracing::info!(reference, status = %verification.gateway_status, "payment verification failed");
        return Err(AppError::BadRequest("Payment verification failed".into()));
    }

    tracing::info!(reference, amount = ?verification.amount, "payment verified");
    Ok(ApiResponse::ok(
        "Payment verified successfully",
        VerifyPaymentResponse {
            success: true,
            verification,
        },
    ))
}
