use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, Set, SqlErr,
    TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use uuid::Uuid;

use crate::{
    domain::{
        OrderStatus, allocate_shipping,
        checkout::{is_sell_inquiry, parse_product_id},
        generate_order_number, line_tracking_number,
    },
    dto::checkout::{CheckoutKind, CheckoutReceipt, CheckoutRequest, ContactInfo},
    entity::{
        customers::{ActiveModel as CustomerActive, Column as CustomerCol, Entity as Customers},
        orders::ActiveModel as OrderActive,
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    response::ApiResponse,
    state::AppState,
};

/// One validated cart line, ready to become an order row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub shipping_cents: i64,
    pub total_amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutPlan {
    pub lines: Vec<PlannedLine>,
    pub total_amount_cents: i64,
}

/// Validate a purchase payload and price every line. No I/O.
pub fn plan_checkout(payload: &CheckoutRequest) -> AppResult<CheckoutPlan> {
    validate_contact(&payload.contact)?;

    if payload.cart_items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }
    if payload.shipping < 0 {
        return Err(AppError::BadRequest("shipping must not be negative".into()));
    }

    let shares = allocate_shipping(payload.shipping, payload.cart_items.len());
    let mut lines = Vec::with_capacity(payload.cart_items.len());
    for (item, shipping_cents) in payload.cart_items.iter().zip(shares) {
        if item.quantity <= 0 {
            return Err(AppError::BadRequest(format!(
                "Invalid quantity for item {}",
                item.id
            )));
        }
        if item.price < 0 {
            return Err(AppError::BadRequest(format!(
                "Invalid price for item {}",
                item.id
            )));
        }
        let product_id = parse_product_id(&item.id)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid product id '{}'", item.id)))?;
        let line_total = item
            .price
            .checked_mul(i64::from(item.quantity))
            .and_then(|subtotal| subtotal.checked_add(shipping_cents))
            .ok_or_else(|| AppError::BadRequest("Order amount is too large".into()))?;

        lines.push(PlannedLine {
            product_id,
            quantity: item.quantity,
            unit_price_cents: item.price,
            shipping_cents,
            total_amount_cents: line_total,
        });
    }

    let total_amount_cents = lines
        .iter()
        .try_fold(0_i64, |acc, line| acc.checked_add(line.total_amount_cents))
        .ok_or_else(|| AppError::BadRequest("Order amount is too large".into()))?;

    Ok(CheckoutPlan {
        lines,
        total_amount_cents,
    })
}

fn validate_contact(contact: &ContactInfo) -> AppResult<()> {
    if contact.name.trim().is_empty() {
        return Err(AppError::BadRequest("Customer name is required".into()));
    }
    let email = contact.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::BadRequest("A valid email is required".into()));
    }
    Ok(())
}

/// Turn a checkout submission into persisted orders.
///
/// Customer resolution, the per-line inserts and the aggregate increment run
/// in one transaction; any failure leaves nothing behind.
pub async fn checkout(
    state: &AppState,
    mut payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutReceipt>> {
    payload.contact = payload.contact.normalized();
    let order_number = generate_order_number(Utc::now(), Uuid::new_v4());

    if payload.cart_items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    if payload
        .cart_items
        .iter()
        .any(|item| is_sell_inquiry(item.kind.as_deref()))
    {
        tracing::info!(order_number = %order_number, items = payload.cart_items.len(), "sell inquiry received");
        return Ok(ApiResponse::ok(
            "Inquiry submitted successfully",
            CheckoutReceipt {
                success: true,
                order_number,
                kind: CheckoutKind::SellInquiry,
                order_ids: Vec::new(),
                total_amount_cents: 0,
                payment_required: false,
            },
        ));
    }

    let plan = plan_checkout(&payload)?;
    if let Some(client_total) = payload.total.filter(|t| *t != plan.total_amount_cents) {
        tracing::warn!(
            order_number = %order_number,
            client_total,
            computed_total = plan.total_amount_cents,
            "checkout total mismatch, using computed total"
        );
    }

    let status = OrderStatus::initial(
        payload.payment_method.as_deref(),
        payload.payment_status.as_deref(),
    );

    let txn = state.orm.begin().await?;

    ensure_products_available(&txn, &plan).await?;
    let customer_id = find_or_create_customer(&txn, &payload.contact).await?;

    let shipping_address = payload.contact.shipping_address();
    let mut order_ids = Vec::with_capacity(plan.lines.len());
    for (index, line) in plan.lines.iter().enumerate() {
        let order = OrderActive {
            id: Set(Uuid::new_v4()),
            customer_id: Set(Some(customer_id)),
            customer_name: Set(payload.contact.name.clone()),
            customer_email: Set(payload.contact.email.clone()),
            customer_phone: Set(payload.contact.phone.clone()),
            product_id: Set(Some(line.product_id)),
            quantity: Set(line.quantity),
            total_amount_cents: Set(line.total_amount_cents),
            status: Set(status.as_str().to_string()),
            tracking_number: Set(Some(line_tracking_number(&order_number, index))),
            shipping_address: Set(shipping_address.clone()),
            payment_method: Set(payload.payment_method.clone()),
            payment_reference: Set(payload.payment_reference.clone()),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&txn)
        .await?;
        order_ids.push(order.id);
    }

    let line_count = order_ids.len() as i64;
    Customers::update_many()
        .col_expr(
            CustomerCol::TotalOrders,
            Expr::col(CustomerCol::TotalOrders).add(line_count),
        )
        .col_expr(
            CustomerCol::TotalSpentCents,
            Expr::col(CustomerCol::TotalSpentCents).add(plan.total_amount_cents),
        )
        .col_expr(CustomerCol::UpdatedAt, Expr::value(Utc::now()))
        .filter(CustomerCol::Id.eq(customer_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(
        order_number = %order_number,
        customer_id = %customer_id,
        lines = line_count,
        total = plan.total_amount_cents,
        status = %status,
        "order created"
    );

    Ok(ApiResponse::ok(
        "Order created successfully",
        CheckoutReceipt {
            success: true,
            order_number,
            kind: CheckoutKind::Purchase,
            order_ids,
            total_amount_cents: plan.total_amount_cents,
            payment_required: status == OrderStatus::PendingPayment,
        },
    ))
}

async fn ensure_products_available(txn: &DatabaseTransaction, plan: &CheckoutPlan) -> AppResult<()> {
    let wanted: HashSet<Uuid> = plan.lines.iter().map(|line| line.product_id).collect();
    let found: HashSet<Uuid> = Products::find()
        .filter(ProdCol::Id.is_in(wanted.iter().copied()))
        .filter(ProdCol::IsActive.eq(true))
        .all(txn)
        .await?
        .into_iter()
        .map(|product| product.id)
        .collect();

    if let Some(missing) = wanted.difference(&found).next() {
        tracing::debug!(product_id = %missing, "checkout references unknown product");
        return Err(AppError::NotFound);
    }
    Ok(())
}

/// Existing customers keep their identity fields; new ones start with zeroed
/// counters that the caller increments once the rows are in.
async fn find_or_create_customer(txn: &DatabaseTransaction, contact: &ContactInfo) -> AppResult<Uuid> {
    if let Some(existing) = find_customer_by_email(txn, &contact.email).await? {
        return Ok(existing);
    }

    // Savepoint so a lost insert race doesn't poison the outer transaction.
    let savepoint = txn.begin().await?;
    let inserted = CustomerActive {
        id: Set(Uuid::new_v4()),
        name: Set(contact.name.clone()),
        email: Set(contact.email.clone()),
        phone: Set(contact.phone.clone()),
        address: Set(contact.address.clone()),
        city: Set(contact.city.clone()),
        state: Set(contact.state.clone()),
        country: match &contact.country {
            Some(country) => Set(Some(country.clone())),
            None => NotSet,
        },
        total_orders: Set(0),
        total_spent_cents: Set(0),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&savepoint)
    .await;

    match inserted {
        Ok(customer) => {
            savepoint.commit().await?;
            tracing::info!(customer_id = %customer.id, "new customer created");
            Ok(customer.id)
        }
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            savepoint.rollback().await?;
            tracing::debug!("customer created concurrently, re-reading");
            find_customer_by_email(txn, &contact.email)
                .await?
                .ok_or_else(|| {
                    AppError::Internal(anyhow::anyhow!(
                        "customer missing after unique violation"
                    ))
                })
        }
        Err(err) => Err(err.into()),
    }
}

async fn find_customer_by_email(txn: &DatabaseTransaction, email: &str) -> AppResult<Option<Uuid>> {
    let customer = Customers::find()
        .filter(CustomerCol::Email.eq(email))
        .one(txn)
        .await?;
    Ok(customer.map(|c| c.id))
}
