use chrono::{TimeZone, Utc};
use serde_json::json;
use storefront_api::{
    domain::{
        allocate_shipping,
        checkout::{is_sell_inquiry, parse_product_id, tracking_prefix_pattern},
        generate_order_number, line_tracking_number,
    },
    dto::checkout::{CheckoutRequest, ContactInfo},
    error::AppError,
    services::checkout_service::plan_checkout,
};
use uuid::Uuid;

fn request(body: serde_json::Value) -> CheckoutRequest {
    serde_json::from_value(body).expect("checkout payload")
}

fn contact() -> serde_json::Value {
    json!({ "name": "Ada Obi", "email": "ada@example.com", "state": "Lagos" })
}

#[test]
fn shipping_is_split_evenly() {
    assert_eq!(allocate_shipping(300, 2), vec![150, 150]);
    assert_eq!(allocate_shipping(0, 3), vec![0, 0, 0]);
    assert!(allocate_shipping(500, 0).is_empty());
}

#[test]
fn shipping_remainder_lands_on_last_line() {
    let parts = allocate_shipping(100, 3);
    assert_eq!(parts, vec![33, 33, 34]);
    assert_eq!(parts.iter().sum::<i64>(), 100);

    for (shipping, lines) in [(1_i64, 4_usize), (999, 7), (10_001, 2)] {
        let parts = allocate_shipping(shipping, lines);
        assert_eq!(parts.len(), lines);
        assert_eq!(parts.iter().sum::<i64>(), shipping);
    }
}

#[test]
fn plan_prices_each_line_with_its_shipping_share() {
    let product = Uuid::new_v4();
    let plan = plan_checkout(&request(json!({
        "contact": contact(),
        "cartItems": [{ "id": format!("gen_{product}"), "price": 5000, "quantity": 2 }],
        "shipping": 200,
    })))
    .expect("plan");

    assert_eq!(plan.total_amount_cents, 10_200);
    assert_eq!(plan.lines.len(), 1);
    assert_eq!(plan.lines[0].product_id, product);
    assert_eq!(plan.lines[0].shipping_cents, 200);
}

#[test]
fn plan_total_is_sum_of_lines() {
    let plan = plan_checkout(&request(json!({
        "formData": { "fullName": "Ada Obi", "email": "ada@example.com" },
        "cartItems": [
            { "id": Uuid::new_v4().to_string(), "price": 1000, "quantity": 1 },
            { "id": Uuid::new_v4().to_string(), "price": 2500, "quantity": 3 },
        ],
        "shipping": 301,
    })))
    .expect("plan");

    let totals: Vec<i64> = plan.lines.iter().map(|l| l.total_amount_cents).collect();
    assert_eq!(totals, vec![1000 + 150, 7500 + 151]);
    assert_eq!(plan.total_amount_cents, totals.iter().sum::<i64>());
}

#[test]
fn plan_rejects_bad_input() {
    let id = Uuid::new_v4().to_string();
    let cases = [
        json!({ "contact": contact(), "cartItems": [] }),
        json!({ "contact": contact(), "cartItems": [{ "id": id, "price": 100, "quantity": 0 }] }),
        json!({ "contact": contact(), "cartItems": [{ "id": id, "price": -1, "quantity": 1 }] }),
        json!({ "contact": contact(), "cartItems": [{ "id": "not-a-uuid", "price": 1, "quantity": 1 }] }),
        json!({ "contact": contact(), "cartItems": [{ "id": id, "price": 1, "quantity": 1 }], "shipping": -5 }),
        json!({ "contact": { "name": " ", "email": "a@b.c" }, "cartItems": [{ "id": id, "price": 1, "quantity": 1 }] }),
        json!({ "contact": { "name": "Ada", "email": "nope" }, "cartItems": [{ "id": id, "price": 1, "quantity": 1 }] }),
        json!({ "contact": contact(), "cartItems": [{ "id": id, "price": i64::MAX, "quantity": 2 }] }),
    ];

    for body in cases {
        let err = plan_checkout(&request(body.clone())).expect_err("invalid payload");
        assert!(
            matches!(err, AppError::BadRequest(_)),
            "expected bad request for {body}, got {err:?}"
        );
    }
}

#[test]
fn order_numbers_share_a_prefix_with_their_lines() {
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let salt = Uuid::parse_str("a1b2c3d4-0000-4000-8000-000000000000").unwrap();
    let number = generate_order_number(now, salt);

    assert_eq!(number, format!("FS-{}-a1b2c3d4", now.timestamp_millis()));
    assert_eq!(line_tracking_number(&number, 0), format!("{number}-1"));
    assert_eq!(line_tracking_number(&number, 2), format!("{number}-3"));
    assert_eq!(tracking_prefix_pattern(&number), format!("{number}-%"));
}

#[test]
fn different_salts_give_different_numbers() {
    let now = Utc::now();
    assert_ne!(
        generate_order_number(now, Uuid::new_v4()),
        generate_order_number(now, Uuid::new_v4())
    );
}

#[test]
fn prefix_pattern_escapes_like_wildcards() {
    assert_eq!(tracking_prefix_pattern("FS_1%"), "FS\\_1\\%-%");
    assert_eq!(tracking_prefix_pattern("a\\b"), "a\\\\b-%");
}

#[test]
fn product_ids_accept_storefront_prefix() {
    let id = Uuid::new_v4();
    assert_eq!(parse_product_id(&id.to_string()), Some(id));
    assert_eq!(parse_product_id(&format!("gen_{id}")), Some(id));
    assert_eq!(parse_product_id(" 42 "), None);
}

#[test]
fn sell_inquiry_is_detected_by_item_type() {
    assert!(is_sell_inquiry(Some("sell_inquiry")));
    assert!(!is_sell_inquiry(Some("purchase")));
    assert!(!is_sell_inquiry(None));
}

#[test]
fn shipping_address_joins_non_empty_parts() {
    let contact: ContactInfo = serde_json::from_value(json!({
        "name": "Ada",
        "email": "ada@example.com",
        "street": "12 Marina",
        "city": " ",
        "state": "Lagos",
        "country": "Nigeria",
    }))
    .unwrap();
    assert_eq!(
        contact.shipping_address().as_deref(),
        Some("12 Marina, Lagos, Nigeria")
    );
}

#[test]
fn normalized_contact_trims_name_and_email() {
    let contact: ContactInfo = serde_json::from_value(json!({
        "name": "  Ada Obi ",
        "email": " ada@example.com\t",
        "phone": " 0801 ",
    }))
    .unwrap();
    let normalized = contact.normalized();
    assert_eq!(normalized.name, "Ada Obi");
    assert_eq!(normalized.email, "ada@example.com");
    assert_eq!(normalized.phone.as_deref(), Some(" 0801 "));
}

#[test]
fn missing_quantity_defaults_to_one() {
    let product = Uuid::new_v4();
    let req = request(json!({
        "contact": contact(),
        "cartItems": [{ "id": product.to_string(), "price": 700 }],
    }));
    assert_eq!(req.cart_items[0].quantity, 1);

    let plan = plan_checkout(&req).expect("plan");
    assert_eq!(plan.total_amount_cents, 700);

    let explicit_zero = request(json!({
        "contact": contact(),
        "cartItems": [{ "id": product.to_string(), "price": 700, "quantity": 0 }],
    }));
    assert!(matches!(
        plan_checkout(&explicit_zero),
        Err(AppError::BadRequest(_))
    ));
}
