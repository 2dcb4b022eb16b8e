//! Authentication endpoints

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{Principal, Role},
    AppState,
};

use super::{session_token, CurrentUser};

/// Login form (`application/x-www-form-urlencoded`)
#[derive(Deserialize, ToSchema)]
pub struct LoginForm {
    /// Login email
    pub email: String,
    /// Password
    pub pass: String,
}

/// Login response
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login successful, session cookie set", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 503, description = "Session store unavailable")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let issued = state.services.auth.authenticate(&form.email, &form.pass).await?;

    let cookie = Cookie::build((state.config.session.cookie_name.clone(), issued.token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            user_id: issued.session.user_id,
            email: issued.session.email,
            role: issued.session.role,
        }),
    ))
}

/// Log out and drop the session
#[utoipa::path(
    post,
    path = "/logout",
    tag = "auth",
    security(("session_cookie" = [])),
    responses(
        (status = 204, description = "Session closed"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    headers: HeaderMap,
    jar: CookieJar,
) -> AppResult<(CookieJar, StatusCode)> {
    let cookie_name = state.config.session.cookie_name.clone();

    if let Some(token) = session_token(&headers, &cookie_name) {
        state.services.auth.logout(&token).await?;
    }
    tracing::info!(user_id = principal.user_id, "Session closed");

    Ok((
        jar.remove(Cookie::build((cookie_name, "")).path("/")),
        StatusCode::NO_CONTENT,
    ))
}

/// Get the current principal
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Current user", body = Principal),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(CurrentUser(principal): CurrentUser) -> Json<Principal> {
    Json(principal)
}
