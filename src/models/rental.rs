//! Rental model and the per-book rental state machine

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::RentalError;

/// Active rental row. At most one per book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rental {
    pub book_id: i64,
    pub user_id: i64,
    pub rental_datetime: DateTime<Utc>,
    pub return_deadline: DateTime<Utc>,
}

impl Rental {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        now > self.return_deadline
    }
}

/// Rental state of a single book id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RentalState {
    Available,
    Rented(Rental),
}

impl RentalState {
    /// `Available -> Rented`, with the deadline at `now + loan_period`
    pub fn rent(
        &self,
        book_id: i64,
        user_id: i64,
        now: DateTime<Utc>,
        loan_period: Duration,
    ) -> Result<Rental, RentalError> {
        match self {
            RentalState::Available => Ok(Rental {
                book_id,
                user_id,
                rental_datetime: now,
                return_deadline: now + loan_period,
            }),
            RentalState::Rented(_) => Err(RentalError::AlreadyRented),
        }
    }

    /// `Rented -> Available`, only for the renting user. Yields the closed rental.
    pub fn give_back(&self, user_id: i64) -> Result<Rental, RentalError> {
        match self {
            RentalState::Available => Err(RentalError::NotRented),
            RentalState::Rented(rental) if rental.user_id != user_id => Err(RentalError::NotOwner),
            RentalState::Rented(rental) => Ok(rental.clone()),
        }
    }

    pub fn rental(&self) -> Option<&Rental> {
        match self {
            RentalState::Available => None,
            RentalState::Rented(rental) => Some(rental),
        }
    }
}

impl From<Option<Rental>> for RentalState {
    fn from(rental: Option<Rental>) -> Self {
        rental.map(RentalState::Rented).unwrap_or(RentalState::Available)
    }
}
