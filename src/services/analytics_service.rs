//! Sales figures derived from the order and customer tables on every request.
//!
//! Nothing here is cached: cancelled orders are excluded at query time and
//! `NULL` aggregates collapse to zero.

use crate::{
    db::DbPool,
    dto::analytics::{
        CustomerAnalytics, DEFAULT_TREND_DAYS, GeographicSales, MAX_TREND_DAYS, ProductSales,
        SalesSummary, SalesTrendPoint, SalesTrends, StateSales, TopCustomer,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::ApiResponse,
};

const RANKING_LIMIT: i64 = 10;

pub async fn sales_summary(pool: &DbPool, user: &AuthUser) -> AppResult<ApiResponse<SalesSummary>> {
    ensure_admin(user)?;
    let summary = compute_summary(pool).await?;
    Ok(ApiResponse::ok("Sales analytics", summary))
}

pub async fn compute_summary(pool: &DbPool) -> AppResult<SalesSummary> {
    let (total_orders, total_revenue, avg_order_value): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*)::BIGINT,
            COALESCE(SUM(total_amount_cents), 0)::BIGINT,
            COALESCE(ROUND(AVG(total_amount_cents)), 0)::BIGINT
        FROM orders
        WHERE status <> 'cancelled'
        "#,
    )
    .fetch_one(pool)
    .await?;

    let (total_products,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM products WHERE is_active")
            .fetch_one(pool)
            .await?;

    let (total_customers,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
        .fetch_one(pool)
        .await?;

    let product_sales = sqlx::query_as::<_, ProductSales>(
        r#"
        SELECT
            p.name,
            COUNT(o.id)::BIGINT AS orders_count,
            COALESCE(SUM(o.total_amount_cents), 0)::BIGINT AS revenue
        FROM products p
        LEFT JOIN orders o ON o.product_id = p.id AND o.status <> 'cancelled'
        GROUP BY p.id, p.name
        ORDER BY revenue DESC, p.name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(SalesSummary {
        total_orders,
        total_revenue,
        avg_order_value,
        total_products,
        total_customers,
        product_sales,
    })
}

pub async fn sales_trends(
    pool: &DbPool,
    user: &AuthUser,
    period: Option<i32>,
) -> AppResult<ApiResponse<SalesTrends>> {
    ensure_admin(user)?;
    let period_days = normalize_period(period)?;

    let trends = sqlx::query_as::<_, SalesTrendPoint>(
        r#"
        SELECT
            created_at::DATE AS date,
            COUNT(*)::BIGINT AS orders,
            COALESCE(SUM(total_amount_cents), 0)::BIGINT AS revenue
        FROM orders
        WHERE created_at >= NOW() - make_interval(days => $1)
          AND status <> 'cancelled'
        GROUP BY created_at::DATE
        ORDER BY date DESC
        "#,
    )
    .bind(period_days)
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::ok(
        "Sales trends",
        SalesTrends {
            period_days,
            trends,
        },
    ))
}

pub fn normalize_period(period: Option<i32>) -> AppResult<i32> {
    let days = period.unwrap_or(DEFAULT_TREND_DAYS);
    if !(1..=MAX_TREND_DAYS).contains(&days) {
        return Err(AppError::BadRequest(format!(
            "period must be between 1 and {MAX_TREND_DAYS} days"
        )));
    }
    Ok(days)
}

pub async fn geographic_sales(
    pool: &DbPool,
    user: &AuthUser,
) -> AppResult<ApiResponse<GeographicSales>> {
    ensure_admin(user)?;

    let geographic = sqlx::query_as::<_, StateSales>(
        r#"
        SELECT
            c.state AS state,
            COUNT(o.id)::BIGINT AS orders,
            COALESCE(SUM(o.total_amount_cents), 0)::BIGINT AS revenue
        FROM orders o
        JOIN customers c ON c.id = o.customer_id
        WHERE o.status <> 'cancelled'
          AND c.state IS NOT NULL
          AND c.state <> ''
        GROUP BY c.state
        ORDER BY revenue DESC, c.state ASC
        LIMIT $1
        "#,
    )
    .bind(RANKING_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::ok("Geographic sales", GeographicSales { geographic }))
}

pub async fn customer_analytics(
    pool: &DbPool,
    user: &AuthUser,
) -> AppResult<ApiResponse<CustomerAnalytics>> {
    ensure_admin(user)?;

    let top_customers = sqlx::query_as::<_, TopCustomer>(
        r#"
        SELECT
            c.id,
            c.name,
            c.email,
            COUNT(o.id)::BIGINT AS total_orders,
            COALESCE(SUM(o.total_amount_cents), 0)::BIGINT AS total_spent_cents
        FROM customers c
        JOIN orders o ON o.customer_id = c.id AND o.status <> 'cancelled'
        GROUP BY c.id, c.name, c.email
        HAVING COUNT(o.id) > 0
        ORDER BY total_spent_cents DESC, c.name ASC
        LIMIT $1
        "#,
    )
    .bind(RANKING_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::ok(
        "Customer analytics",
        CustomerAnalytics { top_customers },
    ))
}
