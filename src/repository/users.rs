//! Users repository (credential lookups)

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{bounded, CredentialStore};
use crate::{error::StoreError, models::User};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
    timeout: Duration,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl CredentialStore for UsersRepository {
    /// Get user by login email
    async fn find_user_by_login_id(&self, login_id: &str) -> Result<Option<User>, StoreError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, User>(
                r#"SELECT id, email, password, name, role_type FROM "user" WHERE email = $1"#,
            )
            .bind(login_id)
            .fetch_optional(&self.pool),
        )
        .await
    }
}
