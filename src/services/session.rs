//! Session store contract and token helpers

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::{error::StoreError, models::Session};

/// Shared, process-external session storage with expiry
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `session` under a newly minted token and return the token
    async fn create(&self, session: &Session, ttl: Duration) -> Result<String, StoreError>;

    /// Resolve a token; `None` when unknown or expired
    async fn get(&self, token: &str) -> Result<Option<Session>, StoreError>;

    /// Refresh last-access time and re-arm the TTL. Returns false if the session is gone.
    async fn touch(&self, token: &str) -> Result<bool, StoreError>;

    async fn delete(&self, token: &str) -> Result<(), StoreError>;
}

/// 256 bits from the OS RNG, URL-safe base64
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Storage key for a token. Raw tokens are never written to the store.
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
