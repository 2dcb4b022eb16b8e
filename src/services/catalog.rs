//! Catalog service: admin registration and read passthrough

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult, RegistrationError},
    models::{Book, BookWithRental},
    repository::BookStore,
};

#[derive(Clone)]
pub struct CatalogService {
    books: Arc<dyn BookStore>,
}

impl CatalogService {
    pub fn new(books: Arc<dyn BookStore>) -> Self {
        Self { books }
    }

    /// List all books with their current rental
    pub async fn list(&self) -> AppResult<Vec<BookWithRental>> {
        Ok(self.books.list_with_rental().await?)
    }

    /// Get one book with its current rental
    pub async fn detail(&self, book_id: i64) -> AppResult<BookWithRental> {
        self.books
            .find_with_rental(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))
    }

    /// Register a new book. The existence check and insert share one transaction.
    pub async fn register(&self, book: Book) -> Result<(), RegistrationError> {
        let mut tx = self.books.begin(book.id).await?;

        if tx.exists_book().await? {
            return Err(RegistrationError::DuplicateBook);
        }

        tx.insert_book(&book).await?;
        tx.commit().await?;

        tracing::info!(book_id = book.id, title = %book.title, "Book registered");

        Ok(())
    }
}
