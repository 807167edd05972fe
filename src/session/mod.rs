pub mod memory;
pub mod redis;

pub use memory::MemorySessionStore;
pub use self::redis::RedisSessionStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// One conversation turn as clients send it. Roles are free-form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

impl HistoryEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: "assistant".to_string(), content: content.into() }
    }
}

/// Stored conversation state. Advisory only: concurrent writers to the
/// same key overwrite each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSessionRecord {
    pub history: Vec<HistoryEntry>,
    /// Unix milliseconds.
    pub last_updated: i64,
}

impl ChatSessionRecord {
    pub fn new(history: Vec<HistoryEntry>) -> Self {
        Self {
            history,
            last_updated: chrono::Utc::now().timestamp_millis(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("redis: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("session encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Key-value storage with per-key expiry for chat sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn put(
        &self,
        session_key: &str,
        record: &ChatSessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionStoreError>;

    async fn get(&self, session_key: &str) -> Result<Option<ChatSessionRecord>, SessionStoreError>;

    async fn delete(&self, session_key: &str) -> Result<(), SessionStoreError>;
}
