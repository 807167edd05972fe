use super::{ChatSessionRecord, SessionStore, SessionStoreError};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process session storage with lazy expiry. Values are kept
/// serialized so behaviour matches the remote store.
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, Entry>>,
    key_prefix: String,
}

impl MemorySessionStore {
    pub fn new(key_prefix: &str) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            key_prefix: key_prefix.to_string(),
        }
    }

    fn make_key(&self, session_key: &str) -> String {
        format!("{}{}", self.key_prefix, session_key)
    }

    /// Live (unexpired) keys, prefix included.
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .read()
            .iter()
            .filter(|(_, entry)| entry.expires_at > now)
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    fn purge_expired(entries: &mut HashMap<String, Entry>, now: Instant) {
        entries.retain(|_, entry| entry.expires_at > now);
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new("chat:")
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(
        &self,
        session_key: &str,
        record: &ChatSessionRecord,
        ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        let value = serde_json::to_string(record)?;
        let now = Instant::now();

        let mut entries = self.entries.write();
        Self::purge_expired(&mut entries, now);
        entries.insert(
            self.make_key(session_key),
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, session_key: &str) -> Result<Option<ChatSessionRecord>, SessionStoreError> {
        let key = self.make_key(session_key);
        let entries = self.entries.read();

        match entries.get(&key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                Ok(Some(serde_json::from_str(&entry.value)?))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, session_key: &str) -> Result<(), SessionStoreError> {
        self.entries.write().remove(&self.make_key(session_key));
        Ok(())
    }
}
