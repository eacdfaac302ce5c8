use axum::{Json, Router, extract::State, routing::post};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    dto::auth::{LoginRequest, LoginResponse, LogoutResponse},
    error::AppResult,
    middleware::auth::{removal_cookie, session_cookie},
    response::ApiResponse,
    services::auth_service::{TOKEN_TTL_HOURS, login_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login admin, also sets the token cookie", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<ApiResponse<LoginResponse>>)> {
    let resp = login_user(&state, payload).await?;
    let jar = match &resp.data {
        Some(login) => jar.add(session_cookie(login.token.clone(), TOKEN_TTL_HOURS)),
        None => jar,
    };
    Ok((jar, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses(
        (status = 200, description = "Clear the token cookie", body = ApiResponse<LogoutResponse>)
    ),
    tag = "Auth"
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<LogoutResponse>>) {
    (
        jar.add(removal_cookie()),
        Json(ApiResponse::ok(
            "Logged out successfully",
            LogoutResponse { logged_out: true },
        )),
    )
}
