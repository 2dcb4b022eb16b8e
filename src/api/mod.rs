//! API handlers and router for Book Manager
//!
//! Each route group carries its [`ResourceClass`]. The guard layer asks the
//! gate for a decision and hands the resolved principal to handlers through
//! request extensions; handlers read it back with [`CurrentUser`].

pub mod admin;
pub mod auth;
pub mod books;
pub mod health;
pub mod openapi;
pub mod rentals;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Router,
};
use axum_extra::extract::CookieJar;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    error::{AppError, Rejection},
    models::Principal,
    services::policy::ResourceClass,
    AppState,
};

/// Header accepted when the client cannot send cookies
pub const SESSION_HEADER: &str = "X-Auth-Token";

/// Principal resolved by the guard layer
pub struct CurrentUser(pub Principal);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::Rejected(Rejection::Unauthenticated))
    }
}

/// Read the session token from the session cookie, falling back to the header
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            headers
                .get(SESSION_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        })
        .filter(|token| !token.is_empty())
}

#[derive(Clone)]
struct Guard {
    state: AppState,
    class: ResourceClass,
}

async fn guard(State(guard): State<Guard>, mut request: Request, next: Next) -> Result<Response, AppError> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let token = session_token(request.headers(), &guard.state.config.session.cookie_name);

    let principal = guard
        .state
        .services
        .gate
        .authorize(token.as_deref(), guard.class)
        .await?;

    let user_id = principal.as_ref().map(|p| p.user_id);
    if let Some(principal) = principal {
        request.extensions_mut().insert(principal);
    }

    tracing::info!(%method, %path, ?user_id, "Start");
    let response = next.run(request).await;
    tracing::info!(%method, %path, ?user_id, status = response.status().as_u16(), "End");

    Ok(response)
}

fn protect(routes: Router<AppState>, state: &AppState, class: ResourceClass) -> Router<AppState> {
    routes.route_layer(middleware::from_fn_with_state(
        Guard {
            state: state.clone(),
            class,
        },
        guard,
    ))
}

fn cors(state: &AppState) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
        .allow_credentials(true);

    match state.config.cors.allowed_origin.parse::<HeaderValue>() {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!("Invalid CORS origin {:?}, cross-origin requests disabled", state.config.cors.allowed_origin);
            layer
        }
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/login", post(auth::login));

    let authenticated = Router::new()
        .route("/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/book/list", get(books::list_books))
        .route("/book/detail/:book_id", get(books::get_book_detail))
        .route("/rental/start", post(rentals::start_rental))
        .route("/rental/end/:book_id", delete(rentals::end_rental));

    let admin = Router::new().route("/admin/book/register", post(admin::register_book));

    let app = Router::new()
        .merge(protect(public, &state, ResourceClass::Public))
        .merge(protect(authenticated, &state, ResourceClass::AuthenticatedOnly))
        .merge(protect(admin, &state, ResourceClass::AdminOnly))
        .with_state(state.clone());

    app.merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors(&state))
}
