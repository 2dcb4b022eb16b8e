//! Authentication service: credential check and session lifecycle

use std::{sync::Arc, sync::OnceLock, time::Duration};

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use super::session::SessionStore;
use crate::{
    error::{AppError, AppResult, AuthFailure, StoreError},
    models::{user::principal_from_user, IssuedSession, Session, User},
    repository::CredentialStore,
};

#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    sessions: Arc<dyn SessionStore>,
    session_ttl: Duration,
}

impl AuthService {
    pub fn new(credentials: Arc<dyn CredentialStore>, sessions: Arc<dyn SessionStore>, session_ttl: Duration) -> Self {
        Self {
            credentials,
            sessions,
            session_ttl,
        }
    }

    /// Check credentials and mint a session
    pub async fn authenticate(&self, login_id: &str, password: &str) -> Result<IssuedSession, AuthFailure> {
        let user = self.credentials.find_user_by_login_id(login_id).await?;

        let user = match user {
            Some(user) if verify_password(&user, password) => user,
            Some(_) => return Err(AuthFailure::InvalidCredentials),
            None => {
                // Same hashing cost as a real miss so timing does not reveal unknown logins
                burn_verification(password);
                return Err(AuthFailure::InvalidCredentials);
            }
        };

        let session = Session::new(&principal_from_user(&user), Utc::now());
        let token = self.sessions.create(&session, self.session_ttl).await?;

        tracing::info!(user_id = user.id, role = %user.role, "Session created");

        Ok(IssuedSession { token, session })
    }

    /// Drop a session. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) -> Result<(), StoreError> {
        self.sessions.delete(token).await
    }
}

fn verify_password(user: &User, password: &str) -> bool {
    match PasswordHash::new(&user.password) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!(user_id = user.id, "Unreadable password hash: {}", e);
            false
        }
    }
}

fn burn_verification(password: &str) {
    static DUMMY: OnceLock<Option<String>> = OnceLock::new();
    if let Some(hash) = DUMMY.get_or_init(|| hash_password("book-manager-dummy").ok()) {
        if let Ok(parsed) = PasswordHash::new(hash) {
            let _ = Argon2::default().verify_password(password.as_bytes(), &parsed);
        }
    }
}

/// Hash a password using Argon2 with a random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}
