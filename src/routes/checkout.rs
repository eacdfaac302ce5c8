use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::{
        checkout::{
            CheckoutReceipt, CheckoutRequest, UpdateStatusByNumberRequest, VerifyPaymentRequest,
            VerifyPaymentResponse,
        },
        orders::BulkUpdateResult,
    },
    error::AppResult,
    response::ApiResponse,
    services::{checkout_service, order_service, payment_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/create-payment", post(create_payment))
        .route("/verify-payment", post(verify_payment))
        .route("/update-order-status", post(update_order_status))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Orders created, or sell inquiry acknowledged", body = ApiResponse<CheckoutReceipt>),
        (status = 400, description = "Invalid cart or contact details"),
        (status = 404, description = "Unknown product")
    ),
    security(()),
    tag = "Checkout"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutReceipt>>> {
    let resp = checkout_service::checkout(&state, payload).await?;
    Ok(Json(resp))
}

/// Same intake as `/orders`; kept for clients that start payment here.
#[utoipa::path(
    post,
    path = "/api/create-payment",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Orders created", body = ApiResponse<CheckoutReceipt>),
        (status = 400, description = "Invalid cart or contact details")
    ),
    security(()),
    tag = "Checkout"
)]
pub async fn create_payment(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutReceipt>>> {
    let resp = checkout_service::checkout(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/verify-payment",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Payment verified", body = ApiResponse<VerifyPaymentResponse>),
        (status = 400, description = "Missing reference or verification failed"),
        (status = 502, description = "Payment gateway unavailable")
    ),
    security(()),
    tag = "Checkout"
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(payload): Json<VerifyPaymentRequest>,
) -> AppResult<Json<ApiResponse<VerifyPaymentResponse>>> {
    let resp = payment_service::verify_payment(state.gateway.as_ref(), payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/update-order-status",
    request_body = UpdateStatusByNumberRequest,
    responses(
        (status = 200, description = "Every line of the order updated", body = ApiResponse<BulkUpdateResult>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "No orders for this order number"),
        (status = 409, description = "Transition not allowed")
    ),
    security(()),
    tag = "Checkout"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Json(payload): Json<UpdateStatusByNumberRequest>,
) -> AppResult<Json<ApiResponse<BulkUpdateResult>>> {
    let resp = order_service::update_status_by_order_number(&state, payload).await?;
    Ok(Json(resp))
}
