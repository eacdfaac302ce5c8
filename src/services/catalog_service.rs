use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use sea_orm::ActiveValue::NotSet;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    audit::record_admin_action,
    domain::{
        DisplayPlacement, ProductCategory, ProductSpecs,
        product_specs::{MineralSpecs, primary_image_url},
    },
    dto::products::{
        AdminProductQuery, CreateProductRequest, MineralCard, MineralList, ProductList,
        UpdateProductRequest,
    },
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Product,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Which storefront listing a mineral query feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MineralListing {
    All,
    Showcase,
    ForSale,
}

impl MineralListing {
    pub fn includes(&self, placement: DisplayPlacement) -> bool {
        match self {
            MineralListing::All => true,
            MineralListing::Showcase => placement.in_showcase(),
            MineralListing::ForSale => placement.for_sale(),
        }
    }
}

pub async fn list_active_products(state: &AppState) -> AppResult<ApiResponse<ProductList>> {
    let items: Vec<Product> = Products::find()
        .filter(Column::IsActive.eq(true))
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    let meta = Meta::counted(items.len());
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn list_minerals(
    state: &AppState,
    listing: MineralListing,
) -> AppResult<ApiResponse<MineralList>> {
    let rows = Products::find()
        .filter(
            Condition::all()
                .add(Column::Category.eq(ProductCategory::Mineral.as_str()))
                .add(Column::IsActive.eq(true)),
        )
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?;
    let found = rows.len();

    let minerals: Vec<MineralCard> = rows
        .into_iter()
        .map(mineral_card)
        .filter(|card| listing.includes(card.attributes.display_placement))
        .collect();

    tracing::debug!(?listing, found, returned = minerals.len(), "minerals listed");
    let meta = Meta::counted(minerals.len());
    Ok(ApiResponse::success("Minerals", MineralList { minerals }, Some(meta)))
}

pub fn mineral_card(model: ProductModel) -> MineralCard {
    let specs = json_strings(&model.specs);
    let images = json_strings(&model.images);
    MineralCard {
        id: model.id,
        name: model.name,
        description: model.description,
        image: primary_image_url(&images),
        attributes: MineralSpecs::derive(&specs),
        price_cents: model.price_cents,
        specs,
    }
}

pub async fn admin_list_products(
    state: &AppState,
    user: &AuthUser,
    query: AdminProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    ensure_admin(user)?;
    let mut finder = Products::find();
    if let Some(category) = query.category {
        finder = finder.filter(Column::Category.eq(category.as_str()));
    }

    let items: Vec<Product> = finder
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    let meta = Meta::counted(items.len());
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn admin_get_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(product_from_entity)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::ok("Product", product))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    validate_product_fields(
        Some(&payload.name),
        Some(payload.price_cents),
        Some(payload.stock_quantity),
    )?;

    let product = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        price_cents: Set(payload.price_cents),
        category: Set(payload.category.as_str().to_string()),
        specs: Set(strings_json(payload.specs)),
        images: Set(strings_json(payload.images)),
        stock_quantity: Set(payload.stock_quantity),
        is_active: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    record_admin_action(
        &state.pool,
        Some(user),
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Product created successfully",
        product_from_entity(product),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    validate_product_fields(
        payload.name.as_deref(),
        payload.price_cents,
        payload.stock_quantity,
    )?;

    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price_cents {
        active.price_cents = Set(price);
    }
    if let Some(category) = payload.category {
        active.category = Set(category.as_str().to_string());
    }
    if let Some(specs) = payload.specs {
        active.specs = Set(strings_json(specs));
    }
    if let Some(images) = payload.images {
        active.images = Set(strings_json(images));
    }
    if let Some(stock) = payload.stock_quantity {
        active.stock_quantity = Set(stock);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    record_admin_action(
        &state.pool,
        Some(user),
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Product updated successfully",
        product_from_entity(product),
    ))
}

/// Products are never removed: orders keep referencing them.
pub async fn deactivate_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.is_active = Set(false);
    active.updated_at = Set(Utc::now().into());
    let product = active.update(&state.orm).await?;

    record_admin_action(
        &state.pool,
        Some(user),
        "product_deactivate",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Product deleted successfully",
        product_from_entity(product),
    ))
}

fn validate_product_fields(
    name: Option<&str>,
    price_cents: Option<i64>,
    stock: Option<i32>,
) -> AppResult<()> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::BadRequest("name must not be empty".into()));
    }
    if price_cents.is_some_and(|p| p < 0) {
        return Err(AppError::BadRequest("price_cents must not be negative".into()));
    }
    if stock.is_some_and(|s| s < 0) {
        return Err(AppError::BadRequest("stock_quantity must not be negative".into()));
    }
    Ok(())
}

/// Strings of a JSON array column; anything else reads as empty.
pub fn json_strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn strings_json(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}

pub fn product_from_entity(model: ProductModel) -> Product {
    let specs = json_strings(&model.specs);
    let details = model
        .category
        .parse::<ProductCategory>()
        .ok()
        .map(|category| ProductSpecs::derive(category, &specs));
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price_cents: model.price_cents,
        category: model.category,
        images: json_strings(&model.images),
        specs,
        details,
        stock_quantity: model.stock_quantity,
        is_active: model.is_active,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
