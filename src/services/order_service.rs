use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use sea_orm::sea_query::{Expr, LockType};
use uuid::Uuid;

use crate::{
    audit::record_admin_action,
    domain::{OrderStatus, checkout::tracking_prefix_pattern},
    dto::{
        checkout::UpdateStatusByNumberRequest,
        orders::{BulkUpdateRequest, BulkUpdateResult, OrderList, OrderUpdated, UpdateOrderStatusRequest},
    },
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderListing},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination.normalize();
    let status = query.status.as_deref().filter(|s| !s.is_empty());
    let direction = query.sort_order.unwrap_or(SortOrder::Desc).as_sql();

    let items = sqlx::query_as::<_, OrderListing>(&format!(
        r#"
        SELECT o.*, p.name AS product_name
        FROM orders o
        LEFT JOIN products p ON p.id = o.product_id
        WHERE ($1::TEXT IS NULL OR o.status = $1)
        ORDER BY o.created_at {direction}, o.tracking_number {direction}
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(status)
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM orders WHERE ($1::TEXT IS NULL OR status = $1)")
            .bind(status)
            .fetch_one(&state.pool)
            .await?;

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(Meta::new(page, limit, total.0)),
    ))
}

/// Admin transition of one order. Amounts are never touched.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<OrderUpdated>> {
    ensure_admin(user)?;
    let requested = parse_status(&payload.status)?;

    let txn = state.orm.begin().await?;
    let existing = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let previous_status = existing.status.clone();
    current_status(&existing)?.transition_to(requested)?;

    let mut active: OrderActive = existing.into();
    active.status = Set(requested.as_str().to_string());
    if let Some(tracking) = payload.tracking_number.filter(|t| !t.trim().is_empty()) {
        active.tracking_number = Set(Some(tracking));
    }
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(order_id = %order.id, from = %previous_status, to = %requested, "order status updated");
    record_admin_action(
        &state.pool,
        Some(user),
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "from": previous_status, "to": order.status }),
    )
    .await;

    Ok(ApiResponse::ok(
        format!("Order status updated to {requested}"),
        OrderUpdated {
            order: order_from_entity(order),
            previous_status,
        },
    ))
}

/// All-or-nothing status change over an explicit id list.
pub async fn bulk_update_status(
    state: &AppState,
    user: &AuthUser,
    payload: BulkUpdateRequest,
) -> AppResult<ApiResponse<BulkUpdateResult>> {
    ensure_admin(user)?;
    if payload.order_ids.is_empty() {
        return Err(AppError::BadRequest("Order IDs are required".into()));
    }
    let requested = parse_status(&payload.new_status)?;
    let ids: BTreeSet<Uuid> = payload.order_ids.into_iter().collect();

    let txn = state.orm.begin().await?;
    let orders = Orders::find()
        .filter(OrderCol::Id.is_in(ids.iter().copied()))
        .lock(LockType::Update)
        .all(&txn)
        .await?;
    if orders.len() != ids.len() {
        return Err(AppError::NotFound);
    }

    let updated_count = apply_transition(&txn, &orders, requested).await?;
    txn.commit().await?;

    tracing::info!(count = updated_count, status = %requested, "bulk order status update");
    record_admin_action(
        &state.pool,
        Some(user),
        "order_bulk_status_update",
        "orders",
        serde_json::json!({ "order_ids": ids, "status": requested }),
    )
    .await;

    Ok(ApiResponse::ok(
        format!("Successfully updated {updated_count} orders to {requested}"),
        BulkUpdateResult {
            updated_count,
            status: requested.as_str().to_string(),
            order_ids: ids.into_iter().collect(),
        },
    ))
}

/// Payment-callback transition of every line item of one submission.
pub async fn update_status_by_order_number(
    state: &AppState,
    payload: UpdateStatusByNumberRequest,
) -> AppResult<ApiResponse<BulkUpdateResult>> {
    let order_number = payload.order_number.trim();
    if order_number.is_empty() {
        return Err(AppError::BadRequest("orderNumber is required".into()));
    }
    let requested = parse_status(&payload.status)?;

    let txn = state.orm.begin().await?;
    let orders = Orders::find()
        .filter(OrderCol::TrackingNumber.like(tracking_prefix_pattern(order_number)))
        .lock(LockType::Update)
        .all(&txn)
        .await?;
    if orders.is_empty() {
        return Err(AppError::NotFound);
    }

    let updated_count = apply_transition(&txn, &orders, requested).await?;
    txn.commit().await?;

    tracing::info!(
        order_number,
        count = updated_count,
        status = %requested,
        payment_reference = payload.payment_reference.as_deref().unwrap_or("-"),
        "order status updated from payment callback"
    );

    Ok(ApiResponse::ok(
        "Order status updated successfully",
        BulkUpdateResult {
            updated_count,
            status: requested.as_str().to_string(),
            order_ids: orders.iter().map(|o| o.id).collect(),
        },
    ))
}

// Validate every row before writing any, then update them in one statement.
async fn apply_transition(
    txn: &DatabaseTransaction,
    orders: &[OrderModel],
    requested: OrderStatus,
) -> AppResult<u64> {
    for order in orders {
        current_status(order)?.transition_to(requested)?;
    }

    let result = Orders::update_many()
        .col_expr(OrderCol::Status, Expr::value(requested.as_str()))
        .col_expr(OrderCol::UpdatedAt, Expr::value(Utc::now()))
        .filter(OrderCol::Id.is_in(orders.iter().map(|o| o.id)))
        .exec(txn)
        .await?;
    Ok(result.rows_affected)
}

fn parse_status(raw: &str) -> AppResult<OrderStatus> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::BadRequest("Status is required".into()));
    }
    Ok(raw.parse::<OrderStatus>()?)
}

fn current_status(order: &OrderModel) -> AppResult<OrderStatus> {
    order.status.parse::<OrderStatus>().map_err(|_| {
        AppError::Internal(anyhow::anyhow!(
            "order {} has unknown stored status '{}'",
            order.id,
            order.status
        ))
    })
}

pub fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        customer_id: model.customer_id,
        customer_name: model.customer_name,
        customer_email: model.customer_email,
        customer_phone: model.customer_phone,
        product_id: model.product_id,
        quantity: model.quantity,
        total_amount_cents: model.total_amount_cents,
        status: model.status,
        tracking_number: model.tracking_number,
        shipping_address: model.shipping_address,
        payment_method: model.payment_method,
        payment_reference: model.payment_reference,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
