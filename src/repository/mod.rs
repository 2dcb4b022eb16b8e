//! Repository layer for database operations
//!
//! Domain services only see the [`CredentialStore`] and [`BookStore`] traits.
//! Every mutation of rental or catalog state happens inside a
//! [`BookTransaction`], which holds the per-book lock until it is committed
//! or dropped (dropping rolls back).

pub mod books;
pub mod users;

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::StoreError,
    models::{Book, BookWithRental, RentalState, User},
};

/// Lookup of users by login identifier (email)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_user_by_login_id(&self, login_id: &str) -> Result<Option<User>, StoreError>;
}

/// Catalog and rental persistence
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Open a transaction serialized against every other transaction on `book_id`
    async fn begin(&self, book_id: i64) -> Result<Box<dyn BookTransaction>, StoreError>;

    async fn list_with_rental(&self) -> Result<Vec<BookWithRental>, StoreError>;

    async fn find_with_rental(&self, book_id: i64) -> Result<Option<BookWithRental>, StoreError>;
}

/// Unit of work scoped to a single book id
#[async_trait]
pub trait BookTransaction: Send {
    async fn exists_book(&mut self) -> Result<bool, StoreError>;

    async fn insert_book(&mut self, book: &Book) -> Result<(), StoreError>;

    async fn rental_state(&mut self) -> Result<RentalState, StoreError>;

    async fn set_rental_state(&mut self, state: RentalState) -> Result<(), StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}

/// Run a store call with an upper time bound
pub(crate) async fn bounded<T, E, F>(limit: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, E>>,
    E: Into<StoreError>,
{
    tokio::time::timeout(limit, call).await?.map_err(Into::into)
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub books: books::BooksRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>, timeout: Duration) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone(), timeout),
            books: books::BooksRepository::new(pool.clone(), timeout),
            pool,
        }
    }

    /// Check database connectivity
    pub async fn ping(&self) -> Result<(), StoreError> {
        bounded(
            self.books.timeout(),
            sqlx::query("SELECT 1").execute(&self.pool),
        )
        .await
        .map(|_| ())
    }
}
