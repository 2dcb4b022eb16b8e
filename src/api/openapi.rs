//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, auth, books, health, rentals};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Book Manager API",
        version = "0.1.0",
        description = "Book catalog and rental REST API"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::logout,
        auth::me,
        // Books
        books::list_books,
        books::get_book_detail,
        // Rental
        rentals::start_rental,
        rentals::end_rental,
        // Admin
        admin::register_book,
    ),
    components(
        schemas(
            auth::LoginForm,
            auth::LoginResponse,
            crate::models::Principal,
            crate::models::Role,
            books::BookInfo,
            books::GetBookListResponse,
            books::RentalInfo,
            books::GetBookDetailResponse,
            rentals::RentalStartRequest,
            rentals::RentalResponse,
            rentals::ReturnResponse,
            crate::models::RegisterBook,
            admin::RegisterBookResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SessionCookie),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Login and session endpoints"),
        (name = "books", description = "Catalog browsing"),
        (name = "rental", description = "Rent and return books"),
        (name = "admin", description = "Catalog administration")
    )
)]
pub struct ApiDoc;

struct SessionCookie;

impl Modify for SessionCookie {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("SESSION"))),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
