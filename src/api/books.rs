//! Catalog read endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::BookWithRental, AppState};

use super::CurrentUser;

#[derive(Debug, Serialize, ToSchema)]
pub struct BookInfo {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub is_rental: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GetBookListResponse {
    pub book_list: Vec<BookInfo>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RentalInfo {
    pub user_id: i64,
    pub rental_datetime: DateTime<Utc>,
    pub return_deadline: DateTime<Utc>,
    /// Advisory flag, the rental stays open until returned
    pub is_overdue: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GetBookDetailResponse {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub release_date: NaiveDate,
    pub rental_info: Option<RentalInfo>,
}

impl From<&BookWithRental> for BookInfo {
    fn from(model: &BookWithRental) -> Self {
        BookInfo {
            id: model.book.id,
            title: model.book.title.clone(),
            author: model.book.author.clone(),
            is_rental: model.is_rental(),
        }
    }
}

impl GetBookDetailResponse {
    fn new(model: BookWithRental, now: DateTime<Utc>) -> Self {
        let rental_info = model.rental.as_ref().map(|rental| RentalInfo {
            user_id: rental.user_id,
            rental_datetime: rental.rental_datetime,
            return_deadline: rental.return_deadline,
            is_overdue: rental.is_overdue(now),
        });

        GetBookDetailResponse {
            id: model.book.id,
            title: model.book.title,
            author: model.book.author,
            release_date: model.book.release_date,
            rental_info,
        }
    }
}

/// List books with rental status
#[utoipa::path(
    get,
    path = "/book/list",
    tag = "books",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Book list", body = GetBookListResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    CurrentUser(_principal): CurrentUser,
) -> AppResult<Json<GetBookListResponse>> {
    let books = state.services.catalog.list().await?;

    Ok(Json(GetBookListResponse {
        book_list: books.iter().map(BookInfo::from).collect(),
    }))
}

/// Get book details
#[utoipa::path(
    get,
    path = "/book/detail/{book_id}",
    tag = "books",
    security(("session_cookie" = [])),
    params(
        ("book_id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = GetBookDetailResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book_detail(
    State(state): State<AppState>,
    CurrentUser(_principal): CurrentUser,
    Path(book_id): Path<i64>,
) -> AppResult<Json<GetBookDetailResponse>> {
    let book = state.services.catalog.detail(book_id).await?;
    Ok(Json(GetBookDetailResponse::new(book, Utc::now())))
}
