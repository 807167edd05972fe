use super::{ChatSessionRecord, SessionStore, SessionStoreError};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::debug;

/// Redis-backed session storage using `SET EX`. The connection manager
/// is multiplexed; each call works on its own clone.
pub struct RedisSessionStore {
    manager: ConnectionManager,
    key_prefix: String,
}

impl RedisSessionStore {
    pub async fn connect(url: &str, key_prefix: &str) -> Result<Self, SessionStoreError> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;

        debug!("Connected to Redis at {}", url);

        Ok(Self {
            manager,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn make_key(&self, session_key: &str) -> String {
        format!("{}{}", self.key_prefix, session_key)
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn put(
        &self,
        session_key: &str,
        record: &ChatSessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let key = self.make_key(session_key);
        let value = serde_json::to_string(record)?;
        let ttl_seconds = ttl.as_secs().max(1);

        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(&key, value, ttl_seconds).await?;

        debug!("Stored session {} with TTL {} seconds", session_key, ttl_seconds);
        Ok(())
    }

    async fn get(&self, session_key: &str) -> Result<Option<ChatSessionRecord>, SessionStoreError> {
        let key = self.make_key(session_key);

        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(&key).await?;

        match value {
            Some(v) => Ok(Some(serde_json::from_str(&v)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, session_key: &str) -> Result<(), SessionStoreError> {
        let key = self.make_key(session_key);

        let mut conn = self.manager.clone();
        conn.del::<_, ()>(&key).await?;
        Ok(())
    }
}
