//! Rental ledger: rent and return transitions, one transaction per book

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::{
    error::RentalError,
    models::{Principal, Rental, RentalState},
    repository::BookStore,
};

#[derive(Clone)]
pub struct RentalService {
    books: Arc<dyn BookStore>,
    loan_period: Duration,
}

impl RentalService {
    pub fn new(books: Arc<dyn BookStore>, loan_period: Duration) -> Self {
        Self { books, loan_period }
    }

    /// Rent a book for the calling user
    pub async fn rent(&self, principal: &Principal, book_id: i64) -> Result<Rental, RentalError> {
        self.rent_at(principal, book_id, Utc::now()).await
    }

    pub async fn rent_at(&self, principal: &Principal, book_id: i64, now: DateTime<Utc>) -> Result<Rental, RentalError> {
        let mut tx = self.books.begin(book_id).await?;

        if !tx.exists_book().await? {
            return Err(RentalError::BookNotFound);
        }

        let rental = tx
            .rental_state()
            .await?
            .rent(book_id, principal.user_id, now, self.loan_period)?;

        tx.set_rental_state(RentalState::Rented(rental.clone())).await?;
        tx.commit().await?;

        tracing::info!(
            book_id,
            user_id = principal.user_id,
            deadline = %rental.return_deadline,
            "Book rented"
        );

        Ok(rental)
    }

    /// Return a book the calling user has rented
    pub async fn return_book(&self, principal: &Principal, book_id: i64) -> Result<Rental, RentalError> {
        let mut tx = self.books.begin(book_id).await?;

        if !tx.exists_book().await? {
            return Err(RentalError::BookNotFound);
        }

        let closed = tx.rental_state().await?.give_back(principal.user_id)?;

        tx.set_rental_state(RentalState::Available).await?;
        tx.commit().await?;

        tracing::info!(book_id, user_id = principal.user_id, "Book returned");

        Ok(closed)
    }
}
