use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::analytics::{CustomerAnalytics, GeographicSales, SalesSummary, SalesTrends, TrendsQuery},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::analytics_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sales/analytics", get(sales_summary))
        .route("/analytics/sales-trends", get(sales_trends))
        .route("/analytics/geographic-sales", get(geographic_sales))
        .route("/analytics/customer-analytics", get(customer_analytics))
}

#[utoipa::path(
    get,
    path = "/api/admin/sales/analytics",
    responses(
        (status = 200, description = "Totals over non-cancelled orders", body = ApiResponse<SalesSummary>),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Analytics"
)]
pub async fn sales_summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<SalesSummary>>> {
    let resp = analytics_service::sales_summary(&state.pool, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/analytics/sales-trends",
    params(TrendsQuery),
    responses(
        (status = 200, description = "Daily orders and revenue", body = ApiResponse<SalesTrends>),
        (status = 400, description = "Period out of range")
    ),
    tag = "Analytics"
)]
pub async fn sales_trends(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TrendsQuery>,
) -> AppResult<Json<ApiResponse<SalesTrends>>> {
    let resp = analytics_service::sales_trends(&state.pool, &user, query.period).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/analytics/geographic-sales",
    responses(
        (status = 200, description = "Top states by revenue", body = ApiResponse<GeographicSales>)
    ),
    tag = "Analytics"
)]
pub async fn geographic_sales(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<GeographicSales>>> {
    let resp = analytics_service::geographic_sales(&state.pool, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/analytics/customer-analytics",
    responses(
        (status = 200, description = "Top customers by spend", body = ApiResponse<CustomerAnalytics>)
    ),
    tag = "Analytics"
)]
pub async fn customer_analytics(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CustomerAnalytics>>> {
    let resp = analytics_service::customer_analytics(&state.pool, &user).await?;
    Ok(Json(resp))
}
