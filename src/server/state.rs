use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::ai::{InferenceClient, WorkersAiClient};
use crate::cloudflare::{CloudflareClient, FirewallRulesApi};
use crate::config::{Config, SessionBackend};
use crate::session::{MemorySessionStore, RedisSessionStore, SessionStore};

/// Tunables for the chat pipeline.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub temperature: f32,
    pub max_tokens: u32,
    pub history_window: usize,
    pub session_ttl: Duration,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 500,
            history_window: 10,
            session_ttl: Duration::from_secs(3600),
        }
    }
}

/// Shared, read-only handler state. Collaborators that are not configured
/// are `None` and the handlers that need them fail accordingly.
#[derive(Clone, Default)]
pub struct AppState {
    pub inference: Option<Arc<dyn InferenceClient>>,
    pub firewall: Option<Arc<dyn FirewallRulesApi>>,
    pub sessions: Option<Arc<dyn SessionStore>>,
    pub default_zone: Option<String>,
    pub chat: ChatSettings,
}

impl AppState {
    pub fn new(chat: ChatSettings) -> Self {
        Self {
            chat,
            ..Default::default()
        }
    }

    pub fn with_inference(mut self, client: Arc<dyn InferenceClient>) -> Self {
        self.inference = Some(client);
        self
    }

    pub fn with_firewall(mut self, api: Arc<dyn FirewallRulesApi>) -> Self {
        self.firewall = Some(api);
        self
    }

    pub fn with_sessions(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.sessions = Some(store);
        self
    }

    pub fn with_default_zone(mut self, zone_id: impl Into<String>) -> Self {
        self.default_zone = Some(zone_id.into());
        self
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        let chat = ChatSettings {
            temperature: config.ai.temperature,
            max_tokens: config.ai.max_tokens,
            history_window: config.ai.history_window,
            session_ttl: Duration::from_secs(config.session.ttl_seconds),
        };
        let mut state = Self::new(chat);
        state.default_zone = config.cloudflare.zone_id.clone().filter(|z| !z.is_empty());

        let account = config.ai.account_id.as_deref().filter(|a| !a.is_empty());
        match (account, config.ai.effective_token(&config.cloudflare)) {
            (Some(account), Some(token)) => {
                info!("Workers AI enabled with model {}", config.ai.model);
                let client: Arc<dyn InferenceClient> = Arc::new(WorkersAiClient::new(
                    &config.ai.base_url,
                    account,
                    token,
                    &config.ai.model,
                ));
                state.inference = Some(client);
            }
            _ => warn!("Workers AI not configured; /api/chat will return 500"),
        }

        match config.cloudflare.api_token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => {
                let api: Arc<dyn FirewallRulesApi> =
                    Arc::new(CloudflareClient::new(&config.cloudflare.base_url, token));
                state.firewall = Some(api);
            }
            None => warn!("Cloudflare API token not configured; rule endpoints will return 500"),
        }

        state.sessions = match config.session.backend {
            SessionBackend::None => None,
            SessionBackend::Memory => {
                info!("In-memory session storage enabled");
                let store: Arc<dyn SessionStore> =
                    Arc::new(MemorySessionStore::new(&config.session.key_prefix));
                Some(store)
            }
            SessionBackend::Redis => {
                let store = RedisSessionStore::connect(
                    &config.session.redis_url,
                    &config.session.key_prefix,
                )
                .await
                .context("Failed to initialize Redis session storage")?;
                info!("Redis session storage enabled");
                let store: Arc<dyn SessionStore> = Arc::new(store);
                Some(store)
            }
        };

        Ok(state)
    }
}
