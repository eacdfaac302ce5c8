use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        customers::CustomerList,
        orders::{BulkUpdateRequest, BulkUpdateResult, OrderList, OrderUpdated, UpdateOrderStatusRequest},
        returns::{CreateReturnRequest, ReturnList, UpdateReturnRequest},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::ReturnRequest,
    response::ApiResponse,
    routes::params::{OrderListRaw, Pagination},
    services::{customer_service, order_service, return_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/bulk-update", put(bulk_update_orders))
        .route("/orders/{id}/status", put(update_order_status))
        .route("/customers", get(list_customers))
        .route("/returns", get(list_returns).post(create_return))
        .route("/returns/{id}", put(update_return))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(OrderListRaw),
    responses(
        (status = 200, description = "Orders with product names", body = ApiResponse<OrderList>),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListRaw>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &user, query.into()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<OrderUpdated>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed")
    ),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<OrderUpdated>>> {
    let resp = order_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/orders/bulk-update",
    request_body = BulkUpdateRequest,
    responses(
        (status = 200, description = "Listed orders updated", body = ApiResponse<BulkUpdateResult>),
        (status = 400, description = "Empty id list or unknown status"),
        (status = 404, description = "An id does not exist"),
        (status = 409, description = "A transition is not allowed")
    ),
    tag = "Admin"
)]
pub async fn bulk_update_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BulkUpdateRequest>,
) -> AppResult<Json<ApiResponse<BulkUpdateResult>>> {
    let resp = order_service::bulk_update_status(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/customers",
    params(Pagination),
    responses(
        (status = 200, description = "Customers with lifetime counters", body = ApiResponse<CustomerList>)
    ),
    tag = "Admin"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<CustomerList>>> {
    let resp = customer_service::list_customers(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/returns",
    responses(
        (status = 200, description = "Return requests", body = ApiResponse<ReturnList>)
    ),
    tag = "Returns"
)]
pub async fn list_returns(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ReturnList>>> {
    let resp = return_service::list_returns(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/returns",
    request_body = CreateReturnRequest,
    responses(
        (status = 200, description = "Return request created", body = ApiResponse<ReturnRequest>),
        (status = 400, description = "Missing reason or refund out of range"),
        (status = 404, description = "Order not found")
    ),
    tag = "Returns"
)]
pub async fn create_return(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateReturnRequest>,
) -> AppResult<Json<ApiResponse<ReturnRequest>>> {
    let resp = return_service::create_return(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/returns/{id}",
    params(("id" = Uuid, Path, description = "Return id")),
    request_body = UpdateReturnRequest,
    responses(
        (status = 200, description = "Return updated", body = ApiResponse<ReturnRequest>),
        (status = 400, description = "Unknown return status"),
        (status = 404, description = "Return not found")
    ),
    tag = "Returns"
)]
pub async fn update_return(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReturnRequest>,
) -> AppResult<Json<ApiResponse<ReturnRequest>>> {
    let resp = return_service::update_return(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
