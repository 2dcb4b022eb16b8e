//! Redis-backed session store

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use serde::{Deserialize, Serialize};

use super::session::{generate_token, token_digest, SessionStore};
use crate::{
    error::{AppError, AppResult, StoreError},
    models::Session,
    repository::bounded,
};

const KEY_PREFIX: &str = "book-manager:session";

/// Stored value; the TTL is kept so that `touch` re-arms the same lifetime
#[derive(Serialize, Deserialize)]
struct StoredSession {
    session: Session,
    ttl_seconds: u64,
}

#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
    timeout: Duration,
}

impl RedisSessionStore {
    /// Connect to Redis and check the connection
    pub async fn new(url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        let mut conn = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;

        Ok(Self { conn, timeout })
    }

    fn key(token: &str) -> String {
        format!("{}:{}", KEY_PREFIX, token_digest(token))
    }

    async fn load(&self, key: &str) -> Result<Option<StoredSession>, StoreError> {
        let mut conn = self.conn.clone();
        let raw = bounded(self.timeout, conn.get::<_, Option<String>>(key)).await?;

        match raw {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StoreError::Backend(format!("Corrupt session record: {}", e))),
            None => Ok(None),
        }
    }

    async fn save(&self, key: &str, stored: &StoredSession) -> Result<(), StoreError> {
        let value = serde_json::to_string(stored)
            .map_err(|e| StoreError::Backend(format!("Failed to serialize session: {}", e)))?;

        let mut conn = self.conn.clone();
        bounded(
            self.timeout,
            conn.set_ex::<_, _, ()>(key, value, stored.ttl_seconds),
        )
        .await
    }

    /// Rewrite an existing record and re-arm its TTL. `SET .. XX` never
    /// recreates a key that was deleted after `load`.
    async fn refresh(&self, key: &str, stored: &StoredSession) -> Result<bool, StoreError> {
        let value = serde_json::to_string(stored)
            .map_err(|e| StoreError::Backend(format!("Failed to serialize session: {}", e)))?;

        let mut conn = self.conn.clone();
        let reply = bounded(
            self.timeout,
            refresh_cmd(key, &value, stored.ttl_seconds).query_async::<_, Option<String>>(&mut conn),
        )
        .await?;

        Ok(reply.is_some())
    }

    /// Check Redis connectivity
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        bounded(self.timeout, redis::cmd("PING").query_async::<_, String>(&mut conn))
            .await
            .map(|_| ())
    }
}

fn refresh_cmd(key: &str, value: &str, ttl_seconds: u64) -> redis::Cmd {
    let mut cmd = redis::cmd("SET");
    cmd.arg(key).arg(value).arg("XX").arg("EX").arg(ttl_seconds);
    cmd
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(&self, session: &Session, ttl: Duration) -> Result<String, StoreError> {
        let token = generate_token();
        let stored = StoredSession {
            session: session.clone(),
            ttl_seconds: ttl.as_secs().max(1),
        };
        self.save(&Self::key(&token), &stored).await?;
        Ok(token)
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, StoreError> {
        Ok(self.load(&Self::key(token)).await?.map(|stored| stored.session))
    }

    async fn touch(&self, token: &str) -> Result<bool, StoreError> {
        let key = Self::key(token);
        match self.load(&key).await? {
            Some(mut stored) => {
                stored.session.last_access_at = Utc::now();
                self.refresh(&key, &stored).await
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, token: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        bounded(self.timeout, conn.del::<_, ()>(Self::key(token))).await
    }
}
