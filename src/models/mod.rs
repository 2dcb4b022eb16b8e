//! Data models for Book Manager

pub mod book;
pub mod rental;
pub mod session;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookWithRental, RegisterBook};
pub use rental::{Rental, RentalState};
pub use session::{IssuedSession, Session};
pub use user::{Principal, Role, User};
