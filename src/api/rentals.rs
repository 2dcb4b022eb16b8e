//! Rental endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppResult, AppState};

use super::CurrentUser;

/// Start rental request
#[derive(Deserialize, ToSchema)]
pub struct RentalStartRequest {
    /// Book ID
    pub book_id: i64,
}

/// Rental response with the computed deadline
#[derive(Serialize, ToSchema)]
pub struct RentalResponse {
    pub book_id: i64,
    pub user_id: i64,
    pub rental_datetime: DateTime<Utc>,
    /// Due date (ISO 8601 format)
    pub return_deadline: DateTime<Utc>,
}

/// Return response
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub status: String,
    pub book_id: i64,
}

/// Rent a book
#[utoipa::path(
    post,
    path = "/rental/start",
    tag = "rental",
    security(("session_cookie" = [])),
    request_body = RentalStartRequest,
    responses(
        (status = 201, description = "Book rented", body = RentalResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book already rented"),
        (status = 503, description = "Persistence unavailable")
    )
)]
pub async fn start_rental(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Json(request): Json<RentalStartRequest>,
) -> AppResult<(StatusCode, Json<RentalResponse>)> {
    let rental = state.services.rentals.rent(&principal, request.book_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(RentalResponse {
            book_id: rental.book_id,
            user_id: rental.user_id,
            rental_datetime: rental.rental_datetime,
            return_deadline: rental.return_deadline,
        }),
    ))
}

/// Return a rented book
#[utoipa::path(
    delete,
    path = "/rental/end/{book_id}",
    tag = "rental",
    security(("session_cookie" = [])),
    params(
        ("book_id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book not rented, or rented by another user")
    )
)]
pub async fn end_rental(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(book_id): Path<i64>,
) -> AppResult<Json<ReturnResponse>> {
    state.services.rentals.return_book(&principal, book_id).await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        book_id,
    }))
}
