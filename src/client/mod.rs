pub mod session;

pub use session::ChatSession;

use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::rules::{RuleAction, ValidationResult};
use crate::server::routes::ChatResponse;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to connect to {url}: {source}. Is the server running?")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid server URL {0}")]
    InvalidUrl(String),
}

/// Rule to deploy through a running server.
#[derive(Debug, Clone, Serialize)]
pub struct NewRule {
    pub zone_id: String,
    pub expression: String,
    pub action: RuleAction,
    pub description: String,
    pub enabled: bool,
}

/// HTTP client for a running rulesmith server.
pub struct RulesmithClient {
    http: reqwest::Client,
    base_url: String,
}

impl RulesmithClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Server URL with each of `segments` appended as one encoded path
    /// segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<Value>,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "Sending request");

        let mut request = self.http.request(method, url.clone()).query(query);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|source| ClientError::Connect {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        Ok(response.json().await?)
    }

    /// Send one chat turn. The session is updated only when the turn
    /// succeeds.
    pub async fn chat(
        &self,
        session: &mut ChatSession,
        message: &str,
    ) -> Result<ChatResponse, ClientError> {
        let body = json!({
            "message": message,
            "sessionId": session.session_id,
            "history": session.history,
        });

        let response: ChatResponse = self.send(Method::POST, &["api", "chat"], &[], Some(body)).await?;

        session.record_turn(
            response.session_id.clone(),
            message.to_string(),
            response.message.clone(),
            response.rule.clone(),
        );
        Ok(response)
    }

    pub async fn preview(&self, expression: &str) -> Result<ValidationResult, ClientError> {
        let body = json!({ "expression": expression });
        self.send(Method::POST, &["api", "rules", "preview"], &[], Some(body)).await
    }

    pub async fn create_rule(&self, rule: &NewRule) -> Result<Value, ClientError> {
        let body = serde_json::to_value(rule).unwrap_or(Value::Null);
        self.send(Method::POST, &["api", "rules"], &[], Some(body)).await
    }

    pub async fn list_rules(&self, zone_id: Option<&str>) -> Result<Value, ClientError> {
        let query: Vec<(&str, &str)> = zone_id.map(|z| ("zone_id", z)).into_iter().collect();
        self.send(Method::GET, &["api", "rules"], &query, None).await
    }

    pub async fn delete_rule(&self, rule_id: &str, zone_id: Option<&str>) -> Result<Value, ClientError> {
        let query: Vec<(&str, &str)> = zone_id.map(|z| ("zone_id", z)).into_iter().collect();
        self.send(Method::DELETE, &["api", "rules", rule_id], &query, None).await
    }
}

/// Best human-readable message from an error body: our own `error` field,
/// then the Cloudflare `errors[0].message`, then `message`.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let from_body = parsed.as_ref().and_then(|v| {
        v.get("error")
            .and_then(Value::as_str)
            .or_else(|| {
                v.get("errors")
                    .and_then(|e| e.get(0))
                    .and_then(|e| e.get("message"))
                    .and_then(Value::as_str)
            })
            .or_else(|| v.get("message").and_then(Value::as_str))
            .map(str::to_string)
    });

    from_body.unwrap_or_else(|| {
        let reason = status.canonical_reason().unwrap_or("error");
        if body.is_empty() {
            reason.to_string()
        } else {
            format!("{}: {}", reason, body)
        }
    })
}

/// Id of the first rule in a Cloudflare creation reply, if any.
pub fn created_rule_id(reply: &Value) -> Option<&str> {
    reply
        .get("result")
        .and_then(|r| r.get(0))
        .and_then(|r| r.get("id"))
        .and_then(Value::as_str)
}
