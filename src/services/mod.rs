//! Business logic services

pub mod auth;
pub mod catalog;
pub mod gate;
pub mod policy;
pub mod redis;
pub mod rentals;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use crate::{
    config::{RentalConfig, SessionConfig},
    repository::{BookStore, CredentialStore},
};

use gate::{AuthGate, Authorize, Logged};
use session::SessionStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub gate: Arc<dyn Authorize>,
    pub catalog: catalog::CatalogService,
    pub rentals: rentals::RentalService,
}

impl Services {
    /// Wire the services on top of the three external stores
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        books: Arc<dyn BookStore>,
        sessions: Arc<dyn SessionStore>,
        session_config: &SessionConfig,
        rental_config: &RentalConfig,
    ) -> Self {
        Self {
            auth: auth::AuthService::new(credentials, sessions.clone(), session_config.ttl()),
            gate: Arc::new(Logged::new(AuthGate::new(sessions))),
            catalog: catalog::CatalogService::new(books.clone()),
            rentals: rentals::RentalService::new(books, rental_config.loan_period()),
        }
    }
}
