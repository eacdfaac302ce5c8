use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod checkout;
pub mod doc;
pub mod health;
pub mod params;
pub mod products;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    let admin = Router::new()
        .merge(auth::router())
        .merge(admin::router())
        .merge(analytics::router())
        .nest("/products", products::admin_router());

    Router::new()
        .merge(checkout::router())
        .merge(products::router())
        .nest("/admin", admin)
}
