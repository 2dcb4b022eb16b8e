//! In-memory stores for unit tests

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::{Duration, Instant},
};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::OwnedMutexGuard;

use super::session::{generate_token, SessionStore};
use crate::{
    error::StoreError,
    models::{Book, BookWithRental, Rental, RentalState, Session},
    repository::{BookStore, BookTransaction},
};

pub fn sample_book(id: i64) -> Book {
    Book {
        id,
        title: format!("Book {}", id),
        author: "Author".to_string(),
        release_date: NaiveDate::from_ymd_opt(2020, 4, 1).unwrap(),
    }
}

fn outage(flag: &AtomicBool) -> Result<(), StoreError> {
    if flag.load(Ordering::SeqCst) {
        Err(StoreError::Backend("simulated outage".to_string()))
    } else {
        Ok(())
    }
}

struct Entry {
    session: Session,
    ttl: Duration,
    expires_at: Instant,
}

#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, Entry>>,
    unavailable: AtomicBool,
}

impl MemorySessionStore {
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session: &Session, ttl: Duration) -> Result<String, StoreError> {
        outage(&self.unavailable)?;
        let token = generate_token();
        self.entries.lock().unwrap().insert(
            token.clone(),
            Entry {
                session: session.clone(),
                ttl,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(token)
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, StoreError> {
        outage(&self.unavailable)?;
        let mut entries = self.entries.lock().unwrap();
        let expired = match entries.get(token) {
            Some(entry) if entry.expires_at > Instant::now() => return Ok(Some(entry.session.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(token);
        }
        Ok(None)
    }

    async fn touch(&self, token: &str) -> Result<bool, StoreError> {
        outage(&self.unavailable)?;
        let mut entries = self.entries.lock().unwrap();
        match entries.get_mut(token) {
            Some(entry) if entry.expires_at > Instant::now() => {
                entry.session.last_access_at = Utc::now();
                entry.expires_at = Instant::now() + entry.ttl;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, token: &str) -> Result<(), StoreError> {
        outage(&self.unavailable)?;
        self.entries.lock().unwrap().remove(token);
        Ok(())
    }
}

#[derive(Default)]
struct Catalog {
    books: HashMap<i64, Book>,
    rentals: HashMap<i64, Rental>,
}

/// Book store with one async lock per book id, mirroring the advisory lock
#[derive(Default)]
pub struct MemoryBookStore {
    catalog: Arc<Mutex<Catalog>>,
    locks: Mutex<HashMap<i64, Arc<tokio::sync::Mutex<()>>>>,
    unavailable: AtomicBool,
    failing_commits: Arc<AtomicBool>,
}

impl MemoryBookStore {
    pub fn with_books(books: impl IntoIterator<Item = Book>) -> Self {
        let store = Self::default();
        {
            let mut catalog = store.catalog.lock().unwrap();
            for book in books {
                catalog.books.insert(book.id, book);
            }
        }
        store
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn fail_commits(&self, fail: bool) {
        self.failing_commits.store(fail, Ordering::SeqCst);
    }

    pub fn rental(&self, book_id: i64) -> Option<Rental> {
        self.catalog.lock().unwrap().rentals.get(&book_id).cloned()
    }

    pub fn book_count(&self) -> usize {
        self.catalog.lock().unwrap().books.len()
    }

    fn lock_for(&self, book_id: i64) -> Arc<tokio::sync::Mutex<()>> {
        self.locks
            .lock()
            .unwrap()
            .entry(book_id)
            .or_default()
            .clone()
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn begin(&self, book_id: i64) -> Result<Box<dyn BookTransaction>, StoreError> {
        outage(&self.unavailable)?;
        let guard = self.lock_for(book_id).lock_owned().await;
        Ok(Box::new(MemoryBookTransaction {
            _guard: guard,
            book_id,
            catalog: self.catalog.clone(),
            failing_commits: self.failing_commits.clone(),
            new_book: None,
            new_state: None,
        }))
    }

    async fn list_with_rental(&self) -> Result<Vec<BookWithRental>, StoreError> {
        outage(&self.unavailable)?;
        let catalog = self.catalog.lock().unwrap();
        let mut books: Vec<BookWithRental> = catalog
            .books
            .values()
            .map(|b| BookWithRental::new(b.clone(), catalog.rentals.get(&b.id).cloned()))
            .collect();
        books.sort_by_key(|b| b.book.id);
        Ok(books)
    }

    async fn find_with_rental(&self, book_id: i64) -> Result<Option<BookWithRental>, StoreError> {
        outage(&self.unavailable)?;
        let catalog = self.catalog.lock().unwrap();
        Ok(catalog
            .books
            .get(&book_id)
            .map(|b| BookWithRental::new(b.clone(), catalog.rentals.get(&book_id).cloned())))
    }
}

/// Buffers writes until commit; dropping discards them
struct MemoryBookTransaction {
    _guard: OwnedMutexGuard<()>,
    book_id: i64,
    catalog: Arc<Mutex<Catalog>>,
    failing_commits: Arc<AtomicBool>,
    new_book: Option<Book>,
    new_state: Option<RentalState>,
}

#[async_trait]
impl BookTransaction for MemoryBookTransaction {
    async fn exists_book(&mut self) -> Result<bool, StoreError> {
        tokio::task::yield_now().await;
        Ok(self.new_book.is_some() || self.catalog.lock().unwrap().books.contains_key(&self.book_id))
    }

    async fn insert_book(&mut self, book: &Book) -> Result<(), StoreError> {
        tokio::task::yield_now().await;
        self.new_book = Some(book.clone());
        Ok(())
    }

    async fn rental_state(&mut self) -> Result<RentalState, StoreError> {
        tokio::task::yield_now().await;
        if let Some(state) = &self.new_state {
            return Ok(state.clone());
        }
        let rental = self.catalog.lock().unwrap().rentals.get(&self.book_id).cloned();
        Ok(RentalState::from(rental))
    }

    async fn set_rental_state(&mut self, state: RentalState) -> Result<(), StoreError> {
        tokio::task::yield_now().await;
        self.new_state = Some(state);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        outage(&self.failing_commits)?;
        let MemoryBookTransaction {
            _guard,
            book_id,
            catalog,
            new_book,
            new_state,
            ..
        } = *self;

        let mut catalog = catalog.lock().unwrap();
        if let Some(book) = new_book {
            catalog.books.insert(book.id, book);
        }
        match new_state {
            Some(RentalState::Rented(rental)) => {
                catalog.rentals.insert(book_id, rental);
            }
            Some(RentalState::Available) => {
                catalog.rentals.remove(&book_id);
            }
            None => {}
        }
        Ok(())
    }
}
