pub mod client;

pub use client::CloudflareClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::rules::RuleAction;

/// One element of a firewall-rules creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirewallRulePayload {
    pub action: RuleAction,
    pub filter: FilterPayload,
    pub description: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPayload {
    pub expression: String,
}

pub const DEFAULT_DESCRIPTION: &str = "WAF rule";

impl FirewallRulePayload {
    /// Defaults: action `block`, description `WAF rule`, enabled.
    pub fn new(
        expression: String,
        action: Option<RuleAction>,
        description: Option<String>,
        enabled: Option<bool>,
    ) -> Self {
        Self {
            action: action.unwrap_or(RuleAction::Block),
            filter: FilterPayload { expression },
            description: description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            enabled: enabled.unwrap_or(true),
        }
    }
}

/// Status and JSON body of an upstream call, relayed to the caller as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Value,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum FirewallApiError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned a non-JSON body (HTTP {status})")]
    InvalidBody { status: u16 },

    #[error("cannot build Cloudflare API URL: {0}")]
    InvalidUrl(String),
}

/// Zone-scoped firewall rule management.
#[async_trait]
pub trait FirewallRulesApi: Send + Sync {
    async fn list_rules(&self, zone_id: &str) -> Result<UpstreamResponse, FirewallApiError>;

    async fn create_rules(
        &self,
        zone_id: &str,
        rules: &[FirewallRulePayload],
    ) -> Result<UpstreamResponse, FirewallApiError>;

    async fn delete_rule(
        &self,
        zone_id: &str,
        rule_id: &str,
    ) -> Result<UpstreamResponse, FirewallApiError>;
}
