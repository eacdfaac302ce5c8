use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::record_admin_action,
    domain::ReturnStatus,
    dto::returns::{CreateReturnRequest, ReturnList, UpdateReturnRequest},
    entity::{
        orders::Entity as Orders,
        returns::{ActiveModel as ReturnActive, Entity as Returns, Model as ReturnModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{ReturnListing, ReturnRequest},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_returns(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<ReturnList>> {
    ensure_admin(user)?;
    let items = sqlx::query_as::<_, ReturnListing>(
        r#"
        SELECT r.*, o.customer_name, o.customer_email, p.name AS product_name
        FROM returns r
        LEFT JOIN orders o ON o.id = r.order_id
        LEFT JOIN products p ON p.id = o.product_id
        ORDER BY r.created_at DESC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let meta = Meta::counted(items.len());
    Ok(ApiResponse::success("Returns", ReturnList { items }, Some(meta)))
}

pub async fn create_return(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReturnRequest,
) -> AppResult<ApiResponse<ReturnRequest>> {
    ensure_admin(user)?;
    let reason = payload.reason.trim();
    if reason.is_empty() {
        return Err(AppError::BadRequest("reason is required".into()));
    }

    let order = Orders::find_by_id(payload.order_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(refund) = payload.refund_amount_cents {
        if refund < 0 || refund > order.total_amount_cents {
            return Err(AppError::BadRequest(format!(
                "refund_amount_cents must be between 0 and {}",
                order.total_amount_cents
            )));
        }
    }

    let created = ReturnActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order.id),
        reason: Set(reason.to_string()),
        status: Set(ReturnStatus::Pending.as_str().to_string()),
        refund_amount_cents: Set(payload.refund_amount_cents),
        notes: Set(payload.notes),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(return_id = %created.id, order_id = %order.id, "return created");
    record_admin_action(
        &state.pool,
        Some(user),
        "return_create",
        "returns",
        serde_json::json!({ "return_id": created.id, "order_id": order.id }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Return processed successfully",
        return_from_entity(created),
    ))
}

pub async fn update_return(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateReturnRequest,
) -> AppResult<ApiResponse<ReturnRequest>> {
    ensure_admin(user)?;
    let status = payload
        .status
        .trim()
        .parse::<ReturnStatus>()
        .map_err(AppError::BadRequest)?;

    let existing = Returns::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ReturnActive = existing.into();
    active.status = Set(status.as_str().to_string());
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes));
    }
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&state.orm).await?;

    record_admin_action(
        &state.pool,
        Some(user),
        "return_status_update",
        "returns",
        serde_json::json!({ "return_id": updated.id, "status": status }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Return status updated successfully",
        return_from_entity(updated),
    ))
}

fn return_from_entity(model: ReturnModel) -> ReturnRequest {
    ReturnRequest {
        id: model.id,
        order_id: model.order_id,
        reason: model.reason,
        status: model.status,
        refund_amount_cents: model.refund_amount_cents,
        notes: model.notes,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
