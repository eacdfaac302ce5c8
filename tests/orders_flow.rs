mod common;

use std::sync::Arc;

use serde_json::json;
use storefront_api::{
    dto::{
        checkout::{CheckoutReceipt, CheckoutRequest, UpdateStatusByNumberRequest},
        orders::{BulkUpdateRequest, UpdateOrderStatusRequest},
        products::CreateProductRequest,
        returns::{CreateReturnRequest, UpdateReturnRequest},
    },
    domain::ProductCategory,
    error::AppError,
    middleware::auth::AuthUser,
    models::{Customer, Order},
    payment::DisabledGateway,
    routes::params::Pagination,
    services::{
        analytics_service, catalog_service::{self, MineralListing}, checkout_service,
        customer_service, order_service, return_service,
    },
    state::AppState,
};
use uuid::Uuid;

fn admin() -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        username: "admin".into(),
        role: "admin".into(),
    }
}

async fn create_product(
    state: &AppState,
    name: &str,
    price_cents: i64,
    category: ProductCategory,
    specs: &[&str],
) -> anyhow::Result<Uuid> {
    let resp = catalog_service::create_product(
        state,
        &admin(),
        CreateProductRequest {
            name: name.into(),
            description: None,
            price_cents,
            category,
            specs: specs.iter().map(|s| s.to_string()).collect(),
            images: Vec::new(),
            stock_quantity: 10,
        },
    )
    .await?;
    Ok(resp.data.expect("product").id)
}

async fn checkout(state: &AppState, body: serde_json::Value) -> Result<CheckoutReceipt, AppError> {
    let payload: CheckoutRequest = serde_json::from_value(body).expect("checkout payload");
    let resp = checkout_service::checkout(state, payload).await?;
    Ok(resp.data.expect("receipt"))
}

async fn customer_by_email(state: &AppState, email: &str) -> anyhow::Result<Option<Customer>> {
    Ok(
        sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE email = $1")
            .bind(email)
            .fetch_optional(&state.pool)
            .await?,
    )
}

async fn orders_with_ids(state: &AppState, ids: &[Uuid]) -> anyhow::Result<Vec<Order>> {
    Ok(sqlx::query_as::<_, Order>(
        "SELECT * FROM orders WHERE id = ANY($1) ORDER BY tracking_number",
    )
    .bind(ids)
    .fetch_all(&state.pool)
    .await?)
}

// Checkout -> ledger counters -> admin status changes -> analytics -> returns.
#[tokio::test]
async fn checkout_status_and_analytics_flow() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests.");
        return Ok(());
    };
    let state = common::database_state(&database_url, Arc::new(DisabledGateway)).await?;
    let admin = admin();

    let generator = create_product(
        &state,
        "Flow Generator",
        5000,
        ProductCategory::Generator,
        &["Power: 5kVA"],
    )
    .await?;
    let cable = create_product(&state, "Flow Cable", 1000, ProductCategory::Generator, &[]).await?;

    let email = format!("flow+{}@example.com", Uuid::new_v4().simple());
    let contact = json!({ "name": "Ada Obi", "email": email, "state": "Lagos", "city": "Ikeja" });
    let before = analytics_service::compute_summary(&state.pool).await?;

    // Single line: 5000 x 2 + 200 shipping.
    let first = checkout(
        &state,
        json!({
            "formData": contact.clone(),
            "cartItems": [{ "id": format!("gen_{generator}"), "price": 5000, "quantity": 2 }],
            "shipping": 200,
            "total": 10_200,
            "paymentMethod": "bank_transfer",
        }),
    )
    .await?;
    assert_eq!(first.total_amount_cents, 10_200);
    assert_eq!(first.order_ids.len(), 1);
    assert!(!first.payment_required);

    let customer = customer_by_email(&state, &email).await?.expect("customer created");
    assert_eq!(customer.total_orders, 1);
    assert_eq!(customer.total_spent_cents, 10_200);

    // Two lines for the same customer; shipping 300 is split 150/150.
    let second = checkout(
        &state,
        json!({
            "contact": contact,
            "cartItems": [
                { "id": generator.to_string(), "price": 5000, "quantity": 1 },
                { "id": cable.to_string(), "price": 1000, "quantity": 1 },
            ],
            "shipping": 300,
            "paymentMethod": "paystack",
        }),
    )
    .await?;
    assert_eq!(second.order_ids.len(), 2);
    assert!(second.payment_required);
    assert_eq!(second.total_amount_cents, 5150 + 1150);

    let customer = customer_by_email(&state, &email).await?.expect("customer");
    assert_eq!(customer.total_orders, 3);
    assert_eq!(customer.total_spent_cents, 10_200 + 6300);
    assert_eq!(customer.state.as_deref(), Some("Lagos"));

    let (ledger,): (i64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(total_amount_cents), 0)::BIGINT FROM orders WHERE customer_id = $1 AND status <> 'cancelled'",
    )
    .bind(customer.id)
    .fetch_one(&state.pool)
    .await?;
    assert_eq!(ledger, customer.total_spent_cents);

    let second_rows = orders_with_ids(&state, &second.order_ids).await?;
    let tracking: Vec<String> = second_rows
        .iter()
        .filter_map(|o| o.tracking_number.clone())
        .collect();
    assert_eq!(
        tracking,
        vec![format!("{}-1", second.order_number), format!("{}-2", second.order_number)]
    );
    assert!(second_rows.iter().all(|o| o.status == "pending_payment"));
    assert!(second_rows.iter().all(|o| o.customer_id == Some(customer.id)));

    let after = analytics_service::compute_summary(&state.pool).await?;
    assert_eq!(after.total_orders - before.total_orders, 3);
    assert_eq!(after.total_revenue - before.total_revenue, 16_500);

    // Payment callback moves every line of the second submission, and only those.
    let updated = order_service::update_status_by_order_number(
        &state,
        UpdateStatusByNumberRequest {
            order_number: second.order_number.clone(),
            status: "confirmed".into(),
            payment_reference: Some("ref-flow".into()),
        },
    )
    .await?;
    assert_eq!(updated.data.expect("result").updated_count, 2);
    let first_rows = orders_with_ids(&state, &first.order_ids).await?;
    assert_eq!(first_rows[0].status, "pending");

    let missing = order_service::update_status_by_order_number(
        &state,
        UpdateStatusByNumberRequest {
            order_number: "FS-0-deadbeef".into(),
            status: "confirmed".into(),
            payment_reference: None,
        },
    )
    .await;
    assert!(matches!(missing, Err(AppError::NotFound)));

    // Unknown status leaves the stored one alone.
    let first_id = first.order_ids[0];
    let unknown = order_service::update_order_status(
        &state,
        &admin,
        first_id,
        UpdateOrderStatusRequest {
            status: "teleported".into(),
            tracking_number: None,
        },
    )
    .await;
    assert!(matches!(unknown, Err(AppError::BadRequest(_))));
    assert_eq!(orders_with_ids(&state, &[first_id]).await?[0].status, "pending");

    // Bulk update touches exactly the listed ids.
    let bulk = order_service::bulk_update_status(
        &state,
        &admin,
        BulkUpdateRequest {
            order_ids: vec![second.order_ids[0]],
            new_status: "shipped".into(),
        },
    )
    .await?;
    assert_eq!(bulk.data.expect("result").updated_count, 1);
    let second_rows = orders_with_ids(&state, &second.order_ids).await?;
    let statuses: Vec<&str> = second_rows.iter().map(|o| o.status.as_str()).collect();
    assert_eq!(statuses, vec!["shipped", "confirmed"]);

    let missing_id = order_service::bulk_update_status(
        &state,
        &admin,
        BulkUpdateRequest {
            order_ids: vec![second.order_ids[1], Uuid::new_v4()],
            new_status: "processing".into(),
        },
    )
    .await;
    assert!(matches!(missing_id, Err(AppError::NotFound)));
    assert_eq!(orders_with_ids(&state, &[second.order_ids[1]]).await?[0].status, "confirmed");

    // Cancelled orders drop out of the analytics and cannot be reopened.
    let cancelled = order_service::update_order_status(
        &state,
        &admin,
        first_id,
        UpdateOrderStatusRequest {
            status: "cancelled".into(),
            tracking_number: None,
        },
    )
    .await?;
    assert_eq!(cancelled.data.expect("order").previous_status, "pending");

    let reopened = order_service::update_order_status(
        &state,
        &admin,
        first_id,
        UpdateOrderStatusRequest {
            status: "confirmed".into(),
            tracking_number: None,
        },
    )
    .await;
    assert!(matches!(reopened, Err(AppError::Conflict(_))));

    let after_cancel = analytics_service::compute_summary(&state.pool).await?;
    assert_eq!(after_cancel.total_orders - before.total_orders, 2);
    assert_eq!(after_cancel.total_revenue - before.total_revenue, 6300);

    // Returns are validated against the order total.
    let too_much = return_service::create_return(
        &state,
        &admin,
        CreateReturnRequest {
            order_id: second.order_ids[0],
            reason: "Damaged in transit".into(),
            refund_amount_cents: Some(1_000_000),
            notes: None,
        },
    )
    .await;
    assert!(matches!(too_much, Err(AppError::BadRequest(_))));

    let created = return_service::create_return(
        &state,
        &admin,
        CreateReturnRequest {
            order_id: second.order_ids[0],
            reason: "Damaged in transit".into(),
            refund_amount_cents: Some(5150),
            notes: None,
        },
    )
    .await?
    .data
    .expect("return");
    assert_eq!(created.status, "pending");

    let approved = return_service::update_return(
        &state,
        &admin,
        created.id,
        UpdateReturnRequest {
            status: "approved".into(),
            notes: Some("Refund issued".into()),
        },
    )
    .await?
    .data
    .expect("return");
    assert_eq!(approved.status, "approved");

    Ok(())
}

#[tokio::test]
async fn checkout_with_unknown_product_writes_nothing() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests.");
        return Ok(());
    };
    let state = common::database_state(&database_url, Arc::new(DisabledGateway)).await?;

    let email = format!("ghost+{}@example.com", Uuid::new_v4().simple());
    let result = checkout(
        &state,
        json!({
            "contact": { "name": "Ghost", "email": email },
            "cartItems": [{ "id": Uuid::new_v4().to_string(), "price": 100, "quantity": 1 }],
        }),
    )
    .await;

    assert!(matches!(result, Err(AppError::NotFound)));
    assert!(customer_by_email(&state, &email).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn mineral_listings_follow_placement_and_soft_delete() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests.");
        return Ok(());
    };
    let state = common::database_state(&database_url, Arc::new(DisabledGateway)).await?;
    let admin = admin();

    let showcase = create_product(
        &state,
        "Flow Showcase Tin",
        900,
        ProductCategory::Mineral,
        &["Type: Tin", "DisplayType: showcase"],
    )
    .await?;
    let for_sale = create_product(
        &state,
        "Flow Sale Copper",
        700,
        ProductCategory::Mineral,
        &["Type: Copper", "DisplayType: for-sale", "Unit: ton"],
    )
    .await?;

    let ids_in = |listing: MineralListing| {
        let state = state.clone();
        async move {
            let resp = catalog_service::list_minerals(&state, listing).await?;
            let ids: Vec<Uuid> = resp
                .data
                .expect("minerals")
                .minerals
                .into_iter()
                .map(|card| card.id)
                .collect();
            Ok::<_, AppError>(ids)
        }
    };

    let showcase_ids = ids_in(MineralListing::Showcase).await?;
    assert!(showcase_ids.contains(&showcase));
    assert!(!showcase_ids.contains(&for_sale));

    let buy_ids = ids_in(MineralListing::ForSale).await?;
    assert!(buy_ids.contains(&for_sale));
    assert!(!buy_ids.contains(&showcase));

    catalog_service::deactivate_product(&state, &admin, for_sale).await?;
    assert!(!ids_in(MineralListing::All).await?.contains(&for_sale));

    let active = catalog_service::list_active_products(&state).await?;
    assert!(
        active
            .data
            .expect("products")
            .items
            .iter()
            .all(|p| p.id != for_sale)
    );

    // Still reachable for admins.
    let product = catalog_service::admin_get_product(&state, &admin, for_sale).await?;
    assert!(!product.data.expect("product").is_active);
    Ok(())
}

async fn isolated() -> anyhow::Result<Option<common::IsolatedDb>> {
    let Some(database_url) = common::database_url() else {
        eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests.");
        return Ok(None);
    };
    Ok(Some(
        common::IsolatedDb::create(&database_url, Arc::new(DisabledGateway)).await?,
    ))
}

/// One-line checkout of `price` cents for the customer behind `email`.
async fn buy(
    state: &AppState,
    product: Uuid,
    name: &str,
    email: &str,
    region: Option<&str>,
    price: i64,
) -> anyhow::Result<CheckoutReceipt> {
    let mut contact = json!({ "name": name, "email": email });
    if let Some(region) = region {
        contact["state"] = json!(region);
    }
    let receipt = checkout(
        state,
        json!({
            "contact": contact,
            "cartItems": [{ "id": product.to_string(), "price": price, "quantity": 1 }],
        }),
    )
    .await?;
    Ok(receipt)
}

async fn cancel(state: &AppState, receipt: &CheckoutReceipt) -> anyhow::Result<()> {
    sqlx::query("UPDATE orders SET status = 'cancelled' WHERE id = ANY($1)")
        .bind(&receipt.order_ids)
        .execute(&state.pool)
        .await?;
    Ok(())
}

async fn count(state: &AppState, table: &str) -> anyhow::Result<i64> {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(&state.pool)
        .await?;
    Ok(n)
}

#[tokio::test]
async fn geographic_sales_ranks_live_states() -> anyhow::Result<()> {
    let Some(db) = isolated().await? else {
        return Ok(());
    };
    let state = &db.state;
    let product = create_product(state, "Geo Generator", 1000, ProductCategory::Generator, &[]).await?;

    // Two states tie at the top; ten more trail at 10000, 9000, ... 1000.
    buy(state, product, "Ogun Buyer", "ogun@example.com", Some("Ogun"), 20_000).await?;
    buy(state, product, "Edo Buyer", "edo@example.com", Some("Edo"), 20_000).await?;
    for rank in 3..=12_i64 {
        let region = format!("State {rank:02}");
        let email = format!("state{rank}@example.com");
        buy(state, product, "Buyer", &email, Some(&region), (13 - rank) * 1000).await?;
    }

    let cancelled = buy(state, product, "Edo Buyer", "edo@example.com", Some("Edo"), 50_000).await?;
    cancel(state, &cancelled).await?;
    let cancelled = buy(state, product, "Z", "zamfara@example.com", Some("Zamfara"), 999_000).await?;
    cancel(state, &cancelled).await?;
    buy(state, product, "Nowhere", "nowhere@example.com", None, 500_000).await?;
    buy(state, product, "Blank", "blank@example.com", Some(""), 400_000).await?;

    let geographic = analytics_service::geographic_sales(&state.pool, &admin())
        .await?
        .data
        .expect("geographic")
        .geographic;

    assert_eq!(geographic.len(), 10);
    let states: Vec<&str> = geographic.iter().map(|row| row.state.as_str()).collect();
    assert_eq!(&states[..3], ["Edo", "Ogun", "State 03"]);
    assert_eq!(states[9], "State 10");
    assert!(!states.contains(&"Zamfara"));
    assert!(!states.contains(&""));

    let edo = &geographic[0];
    assert_eq!((edo.orders, edo.revenue), (1, 20_000));
    assert_eq!(geographic[9].revenue, 3000);

    db.drop_schema().await
}

#[tokio::test]
async fn top_customers_skip_cancelled_spend() -> anyhow::Result<()> {
    let Some(db) = isolated().await? else {
        return Ok(());
    };
    let state = &db.state;
    let product = create_product(state, "Top Generator", 1000, ProductCategory::Generator, &[]).await?;

    buy(state, product, "Bola", "bola@example.com", None, 4500).await?;
    buy(state, product, "Bola", "bola@example.com", None, 4500).await?;
    buy(state, product, "Ayo", "ayo@example.com", None, 9000).await?;
    let refunded = buy(state, product, "Ayo", "ayo@example.com", None, 50_000).await?;
    cancel(state, &refunded).await?;
    let refunded = buy(state, product, "Zed", "zed@example.com", None, 100_000).await?;
    cancel(state, &refunded).await?;
    for rank in 3..=11_i64 {
        let name = format!("Cust {rank:02}");
        let email = format!("cust{rank}@example.com");
        buy(state, product, &name, &email, None, (11 - rank) * 1000 + 1000).await?;
    }

    let top = analytics_service::customer_analytics(&state.pool, &admin())
        .await?
        .data
        .expect("customers")
        .top_customers;

    assert_eq!(top.len(), 10);
    let names: Vec<&str> = top.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(&names[..3], ["Ayo", "Bola", "Cust 03"]);
    assert_eq!(names[9], "Cust 10");
    assert!(!names.contains(&"Zed"));

    assert_eq!((top[0].total_orders, top[0].total_spent_cents), (1, 9000));
    assert_eq!((top[1].total_orders, top[1].total_spent_cents), (2, 9000));

    db.drop_schema().await
}

#[tokio::test]
async fn trends_window_and_summary_ignore_cancelled() -> anyhow::Result<()> {
    let Some(db) = isolated().await? else {
        return Ok(());
    };
    let state = &db.state;
    let product = create_product(state, "Trend Generator", 1000, ProductCategory::Generator, &[]).await?;

    buy(state, product, "Recent", "recent@example.com", Some("Lagos"), 1000).await?;
    let cancelled = buy(state, product, "Recent", "recent@example.com", Some("Lagos"), 2000).await?;
    cancel(state, &cancelled).await?;

    let summary = analytics_service::compute_summary(&state.pool).await?;
    assert_eq!(summary.total_orders, 1);
    assert_eq!(summary.total_revenue, 1000);
    assert_eq!(summary.avg_order_value, 1000);
    assert_eq!(summary.total_customers, 1);

    let old = buy(state, product, "Old", "old@example.com", None, 1500).await?;
    sqlx::query("UPDATE orders SET created_at = NOW() - INTERVAL '40 days' WHERE id = ANY($1)")
        .bind(&old.order_ids)
        .execute(&state.pool)
        .await?;

    let month = analytics_service::sales_trends(&state.pool, &admin(), Some(30))
        .await?
        .data
        .expect("trends");
    assert_eq!(month.period_days, 30);
    assert_eq!(month.trends.len(), 1);
    assert_eq!((month.trends[0].orders, month.trends[0].revenue), (1, 1000));

    let two_months = analytics_service::sales_trends(&state.pool, &admin(), Some(60))
        .await?
        .data
        .expect("trends");
    assert_eq!(two_months.trends.len(), 2);
    assert!(two_months.trends[0].date > two_months.trends[1].date);
    assert_eq!(two_months.trends[1].revenue, 1500);

    db.drop_schema().await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_checkouts_share_one_customer() -> anyhow::Result<()> {
    let Some(db) = isolated().await? else {
        return Ok(());
    };
    let product = create_product(&db.state, "Race Generator", 1000, ProductCategory::Generator, &[]).await?;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let state = db.state.clone();
            tokio::spawn(async move {
                buy(&state, product, "Racer", "racer@example.com", Some("Lagos"), 1000).await
            })
        })
        .collect();
    for handle in handles {
        handle.await??;
    }

    assert_eq!(count(&db.state, "customers").await?, 1);
    assert_eq!(count(&db.state, "orders").await?, 8);
    let customer = customer_by_email(&db.state, "racer@example.com")
        .await?
        .expect("customer");
    assert_eq!(customer.total_orders, 8);
    assert_eq!(customer.total_spent_cents, 8000);

    db.drop_schema().await
}

#[tokio::test]
async fn failed_order_insert_rolls_back_new_customer() -> anyhow::Result<()> {
    let Some(db) = isolated().await? else {
        return Ok(());
    };
    let state = &db.state;
    let product = create_product(state, "Doomed Generator", 1000, ProductCategory::Generator, &[]).await?;
    sqlx::query("ALTER TABLE orders ADD CONSTRAINT reject_marked_name CHECK (customer_name <> 'Fail Me')")
        .execute(&state.pool)
        .await?;

    let result = checkout(
        state,
        json!({
            "contact": { "name": "Fail Me", "email": "doomed@example.com", "state": "Kano" },
            "cartItems": [{ "id": product.to_string(), "price": 1000, "quantity": 1 }],
        }),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(count(state, "customers").await?, 0);
    assert_eq!(count(state, "orders").await?, 0);

    db.drop_schema().await
}

#[tokio::test]
async fn padded_email_resolves_to_the_same_customer() -> anyhow::Result<()> {
    let Some(db) = isolated().await? else {
        return Ok(());
    };
    let state = &db.state;
    let product = create_product(state, "Trim Generator", 1000, ProductCategory::Generator, &[]).await?;

    buy(state, product, "  Ada  ", " ada@example.com ", None, 1000).await?;
    buy(state, product, "Ada", "ada@example.com", None, 2000).await?;

    assert_eq!(count(state, "customers").await?, 1);
    let customer = customer_by_email(state, "ada@example.com").await?.expect("customer");
    assert_eq!(customer.name, "Ada");
    assert_eq!(customer.total_orders, 2);
    assert_eq!(customer.total_spent_cents, 3000);

    let (padded,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM orders WHERE customer_email <> 'ada@example.com'")
            .fetch_one(&state.pool)
            .await?;
    assert_eq!(padded, 0);

    // Far-off pages come back empty instead of overflowing the offset.
    let far = customer_service::list_customers(
        state,
        &admin(),
        Pagination {
            page: Some(i64::MAX),
            per_page: Some(100),
        },
    )
    .await?;
    assert!(far.data.expect("customers").items.is_empty());

    db.drop_schema().await
}
