//! Administrator endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{error::AppResult, models::RegisterBook, AppState};

use super::CurrentUser;

#[derive(Serialize, ToSchema)]
pub struct RegisterBookResponse {
    pub id: i64,
    pub message: String,
}

/// Register a new book (admin only)
#[utoipa::path(
    post,
    path = "/admin/book/register",
    tag = "admin",
    security(("session_cookie" = [])),
    request_body = RegisterBook,
    responses(
        (status = 201, description = "Book registered", body = RegisterBookResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Administrator role required"),
        (status = 409, description = "A book with this id already exists")
    )
)]
pub async fn register_book(
    State(state): State<AppState>,
    CurrentUser(admin): CurrentUser,
    Json(request): Json<RegisterBook>,
) -> AppResult<(StatusCode, Json<RegisterBookResponse>)> {
    request.validate()?;

    let id = request.id;
    state.services.catalog.register(request.into()).await?;
    tracing::info!(book_id = id, admin_id = admin.user_id, "Registration accepted");

    Ok((
        StatusCode::CREATED,
        Json(RegisterBookResponse {
            id,
            message: "Book registered".to_string(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::{
        api::{router, test_support},
        models::Role,
        repository::MockCredentialStore,
        services::testing::MemoryBookStore,
    };

    fn register(cookie: &str, body: serde_json::Value) -> Request<Body> {
        Request::post("/admin/book/register")
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn book(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "title": "Programming Rust",
            "author": "Jim Blandy",
            "release_date": "2021-07-06"
        })
    }

    #[tokio::test]
    async fn test_member_is_forbidden() {
        let app = test_support::app(MockCredentialStore::new(), MemoryBookStore::default());
        let cookie = app.cookie(&app.login_as(2, Role::Member).await);

        let response = router(app.state.clone()).oneshot(register(&cookie, book(1))).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(app.books.book_count(), 0);
    }

    #[tokio::test]
    async fn test_admin_registers_once() {
        let app = test_support::app(MockCredentialStore::new(), MemoryBookStore::default());
        let cookie = app.cookie(&app.login_as(1, Role::Admin).await);
        let router = router(app.state.clone());

        let first = router.clone().oneshot(register(&cookie, book(1))).await.unwrap();
        let second = router.oneshot(register(&cookie, book(1))).await.unwrap();

        assert_eq!(first.status(), StatusCode::CREATED);
        assert_eq!(second.status(), StatusCode::CONFLICT);
        assert_eq!(app.books.book_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_book_is_rejected() {
        let app = test_support::app(MockCredentialStore::new(), MemoryBookStore::default());
        let cookie = app.cookie(&app.login_as(1, Role::Admin).await);

        let mut body = book(1);
        body["title"] = json!("");
        let response = router(app.state.clone()).oneshot(register(&cookie, body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_anonymous_is_unauthenticated() {
        let app = test_support::app(MockCredentialStore::new(), MemoryBookStore::default());

        let response = router(app.state.clone())
            .oneshot(
                Request::post("/admin/book/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(book(1).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
