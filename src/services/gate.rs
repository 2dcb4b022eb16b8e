//! Authentication gate: session token -> principal -> policy decision
//!
//! [`AuthGate`] does the work; [`Logged`] wraps any [`Authorize`]
//! implementation with start/end logging. The router composes the two.

use std::sync::Arc;

use async_trait::async_trait;

use super::{
    policy::{decide, Decision, ResourceClass},
    session::SessionStore,
};
use crate::{error::Rejection, models::Principal};

#[async_trait]
pub trait Authorize: Send + Sync {
    /// `Ok(None)` means the resource is public and no session was consulted
    async fn authorize(&self, token: Option<&str>, class: ResourceClass) -> Result<Option<Principal>, Rejection>;
}

#[derive(Clone)]
pub struct AuthGate {
    sessions: Arc<dyn SessionStore>,
}

impl AuthGate {
    pub fn new(sessions: Arc<dyn SessionStore>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl Authorize for AuthGate {
    async fn authorize(&self, token: Option<&str>, class: ResourceClass) -> Result<Option<Principal>, Rejection> {
        if decide(None, class) == Decision::Allow {
            return Ok(None);
        }

        let token = token.ok_or(Rejection::Unauthenticated)?;
        let session = self
            .sessions
            .get(token)
            .await?
            .ok_or(Rejection::Unauthenticated)?;

        // Sliding expiry; the session may have lapsed between the two calls
        if !self.sessions.touch(token).await? {
            return Err(Rejection::Unauthenticated);
        }

        let principal = Principal::from(&session);
        match decide(Some(&principal), class) {
            Decision::Allow => Ok(Some(principal)),
            Decision::Deny => Err(Rejection::Forbidden),
        }
    }
}

/// Logging decorator for an [`Authorize`] implementation
pub struct Logged<A> {
    inner: A,
}

impl<A> Logged<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: Authorize> Authorize for Logged<A> {
    async fn authorize(&self, token: Option<&str>, class: ResourceClass) -> Result<Option<Principal>, Rejection> {
        tracing::debug!(?class, has_token = token.is_some(), "Start authorization");

        let result = self.inner.authorize(token, class).await;

        match &result {
            Ok(Some(principal)) => {
                tracing::info!(?class, user_id = principal.user_id, role = %principal.role, "Access granted")
            }
            Ok(None) => tracing::debug!(?class, "Public access"),
            Err(Rejection::StoreUnavailable) => tracing::error!(?class, "Authorization aborted: session store unavailable"),
            Err(rejection) => tracing::info!(?class, "Access refused: {}", rejection),
        }

        result
    }
}
