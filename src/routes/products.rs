use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::products::{
        AdminProductQuery, CreateProductRequest, MineralList, ProductList, UpdateProductRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Product,
    response::ApiResponse,
    services::catalog_service::{self, MineralListing},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/minerals", get(list_minerals))
        .route("/minerals/showcase", get(list_showcase_minerals))
        .route("/minerals/buy", get(list_buyable_minerals))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Active products", body = ApiResponse<ProductList>)
    ),
    security(()),
    tag = "Catalog"
)]
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = catalog_service::list_active_products(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/minerals",
    responses(
        (status = 200, description = "All active minerals", body = ApiResponse<MineralList>)
    ),
    security(()),
    tag = "Catalog"
)]
pub async fn list_minerals(State(state): State<AppState>) -> AppResult<Json<ApiResponse<MineralList>>> {
    let resp = catalog_service::list_minerals(&state, MineralListing::All).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/minerals/showcase",
    responses(
        (status = 200, description = "Minerals placed in the showcase", body = ApiResponse<MineralList>)
    ),
    security(()),
    tag = "Catalog"
)]
pub async fn list_showcase_minerals(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<MineralList>>> {
    let resp = catalog_service::list_minerals(&state, MineralListing::Showcase).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/minerals/buy",
    responses(
        (status = 200, description = "Minerals offered for sale", body = ApiResponse<MineralList>)
    ),
    security(()),
    tag = "Catalog"
)]
pub async fn list_buyable_minerals(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<MineralList>>> {
    let resp = catalog_service::list_minerals(&state, MineralListing::ForSale).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/products",
    params(AdminProductQuery),
    responses(
        (status = 200, description = "All products including inactive", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn admin_list_products(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<AdminProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = catalog_service::admin_list_products(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product created", body = ApiResponse<Product>),
        (status = 400, description = "Invalid product fields")
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = catalog_service::create_product(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product", body = ApiResponse<Product>),
        (status = 404, description = "Not found")
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = catalog_service::admin_get_product(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<Product>),
        (status = 404, description = "Not found")
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = catalog_service::update_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deactivated", body = ApiResponse<Product>),
        (status = 404, description = "Not found")
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = catalog_service::deactivate_product(&state, &user, id).await?;
    Ok(Json(resp))
}
