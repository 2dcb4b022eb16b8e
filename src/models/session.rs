//! Authenticated session state held in the shared session store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::Principal;

/// Session record. The role is fixed at mint time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: i64,
    pub email: String,
    pub role: super::user::Role,
    pub created_at: DateTime<Utc>,
    pub last_access_at: DateTime<Utc>,
}

impl Session {
    pub fn new(principal: &Principal, now: DateTime<Utc>) -> Self {
        Self {
            user_id: principal.user_id,
            email: principal.email.clone(),
            role: principal.role,
            created_at: now,
            last_access_at: now,
        }
    }
}

/// A freshly minted session together with its opaque token
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session: Session,
}
