//! Books repository: catalog reads and per-book transactions

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};

use super::{bounded, BookStore, BookTransaction};
use crate::{
    error::StoreError,
    models::{
        book::BookWithRentalRow,
        Book, BookWithRental, Rental, RentalState,
    },
};

const SELECT_BOOK_WITH_RENTAL: &str = r#"
    SELECT b.id, b.title, b.author, b.release_date,
           r.user_id, r.rental_datetime, r.return_deadline
    FROM book b
    LEFT JOIN rental r ON b.id = r.book_id
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
    timeout: Duration,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl BookStore for BooksRepository {
    async fn begin(&self, book_id: i64) -> Result<Box<dyn BookTransaction>, StoreError> {
        let mut tx = bounded(self.timeout, self.pool.begin()).await?;

        // Released automatically on commit or rollback. Works for ids that have no row yet.
        bounded(
            self.timeout,
            sqlx::query("SELECT pg_advisory_xact_lock($1)")
                .bind(book_id)
                .execute(&mut *tx),
        )
        .await?;

        Ok(Box::new(PgBookTransaction {
            tx,
            book_id,
            timeout: self.timeout,
        }))
    }

    async fn list_with_rental(&self) -> Result<Vec<BookWithRental>, StoreError> {
        let query = format!("{} ORDER BY b.id", SELECT_BOOK_WITH_RENTAL);
        let rows = bounded(
            self.timeout,
            sqlx::query_as::<_, BookWithRentalRow>(&query).fetch_all(&self.pool),
        )
        .await?;

        Ok(rows.into_iter().map(BookWithRental::from).collect())
    }

    async fn find_with_rental(&self, book_id: i64) -> Result<Option<BookWithRental>, StoreError> {
        let query = format!("{} WHERE b.id = $1", SELECT_BOOK_WITH_RENTAL);
        let row = bounded(
            self.timeout,
            sqlx::query_as::<_, BookWithRentalRow>(&query)
                .bind(book_id)
                .fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.map(BookWithRental::from))
    }
}

/// Postgres transaction holding the advisory lock for one book id
pub struct PgBookTransaction {
    tx: Transaction<'static, Postgres>,
    book_id: i64,
    timeout: Duration,
}

#[async_trait]
impl BookTransaction for PgBookTransaction {
    async fn exists_book(&mut self) -> Result<bool, StoreError> {
        bounded(
            self.timeout,
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM book WHERE id = $1)")
                .bind(self.book_id)
                .fetch_one(&mut *self.tx),
        )
        .await
    }

    async fn insert_book(&mut self, book: &Book) -> Result<(), StoreError> {
        if book.id != self.book_id {
            return Err(StoreError::Backend(format!(
                "transaction for book {} cannot insert book {}",
                self.book_id, book.id
            )));
        }

        bounded(
            self.timeout,
            sqlx::query("INSERT INTO book (id, title, author, release_date) VALUES ($1, $2, $3, $4)")
                .bind(book.id)
                .bind(&book.title)
                .bind(&book.author)
                .bind(book.release_date)
                .execute(&mut *self.tx),
        )
        .await?;

        Ok(())
    }

    async fn rental_state(&mut self) -> Result<RentalState, StoreError> {
        let rental = bounded(
            self.timeout,
            sqlx::query_as::<_, Rental>(
                "SELECT book_id, user_id, rental_datetime, return_deadline FROM rental WHERE book_id = $1",
            )
            .bind(self.book_id)
            .fetch_optional(&mut *self.tx),
        )
        .await?;

        Ok(RentalState::from(rental))
    }

    async fn set_rental_state(&mut self, state: RentalState) -> Result<(), StoreError> {
        match state {
            RentalState::Available => {
                bounded(
                    self.timeout,
                    sqlx::query("DELETE FROM rental WHERE book_id = $1")
                        .bind(self.book_id)
                        .execute(&mut *self.tx),
                )
                .await?;
            }
            RentalState::Rented(rental) => {
                if rental.book_id != self.book_id {
                    return Err(StoreError::Backend(format!(
                        "transaction for book {} cannot write rental of book {}",
                        self.book_id, rental.book_id
                    )));
                }

                bounded(
                    self.timeout,
                    sqlx::query(
                        r#"
                        INSERT INTO rental (book_id, user_id, rental_datetime, return_deadline)
                        VALUES ($1, $2, $3, $4)
                        ON CONFLICT (book_id) DO UPDATE
                        SET user_id = EXCLUDED.user_id,
                            rental_datetime = EXCLUDED.rental_datetime,
                            return_deadline = EXCLUDED.return_deadline
                        "#,
                    )
                    .bind(rental.book_id)
                    .bind(rental.user_id)
                    .bind(rental.rental_datetime)
                    .bind(rental.return_deadline)
                    .execute(&mut *self.tx),
                )
                .await?;
            }
        }

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        bounded(self.timeout, self.tx.commit()).await
    }
}
