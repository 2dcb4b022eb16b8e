//! Book model and the book-with-rental read projection

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::rental::Rental;

/// Catalog entry. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub release_date: NaiveDate,
}

/// Register book request (admin only)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RegisterBook {
    #[validate(range(min = 1, message = "Book id must be positive"))]
    pub id: i64,
    #[validate(length(min = 1, max = 128, message = "Title must be 1-128 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 32, message = "Author must be 1-32 characters"))]
    pub author: String,
    pub release_date: NaiveDate,
}

impl From<RegisterBook> for Book {
    fn from(request: RegisterBook) -> Self {
        Book {
            id: request.id,
            title: request.title,
            author: request.author,
            release_date: request.release_date,
        }
    }
}

/// Book joined with its current rental, derived on read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookWithRental {
    pub book: Book,
    pub rental: Option<Rental>,
}

impl BookWithRental {
    pub fn new(book: Book, rental: Option<Rental>) -> Self {
        Self { book, rental }
    }

    pub fn is_rental(&self) -> bool {
        self.rental.is_some()
    }

    /// Advisory only; an overdue rental stays open until returned
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.rental.as_ref().map(|r| r.is_overdue(now)).unwrap_or(false)
    }
}

/// Row of `book LEFT JOIN rental`
#[derive(Debug, Clone, FromRow)]
pub struct BookWithRentalRow {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub release_date: NaiveDate,
    pub user_id: Option<i64>,
    pub rental_datetime: Option<DateTime<Utc>>,
    pub return_deadline: Option<DateTime<Utc>>,
}

impl From<BookWithRentalRow> for BookWithRental {
    fn from(row: BookWithRentalRow) -> Self {
        let rental = match (row.user_id, row.rental_datetime, row.return_deadline) {
            (Some(user_id), Some(rental_datetime), Some(return_deadline)) => Some(Rental {
                book_id: row.id,
                user_id,
                rental_datetime,
                return_deadline,
            }),
            _ => None,
        };

        BookWithRental {
            book: Book {
                id: row.id,
                title: row.title,
                author: row.author,
                release_date: row.release_date,
            },
            rental,
        }
    }
}
