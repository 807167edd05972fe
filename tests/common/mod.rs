#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use waf_rulesmith::ai::{InferenceClient, InferenceError, InferenceRequest};
use waf_rulesmith::cloudflare::{
    FirewallApiError, FirewallRulePayload, FirewallRulesApi, UpstreamResponse,
};
use waf_rulesmith::config::ServerConfig;
use waf_rulesmith::server::{build_router, AppState};
use waf_rulesmith::session::{ChatSessionRecord, SessionStore, SessionStoreError};

/// Model stand-in returning a canned reply and recording requests.
pub struct ScriptedModel {
    reply: Result<String, String>,
    pub requests: Mutex<Vec<InferenceRequest>>,
}

impl ScriptedModel {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl InferenceClient for ScriptedModel {
    async fn run(&self, request: InferenceRequest) -> Result<String, InferenceError> {
        self.requests.lock().push(request);
        self.reply.clone().map_err(InferenceError::Rejected)
    }

    fn model(&self) -> &str {
        "@cf/test/scripted"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FirewallCall {
    List(String),
    Create(String, Vec<FirewallRulePayload>),
    Delete(String, String),
}

/// Firewall API stand-in answering every call with one fixed response.
pub struct FakeFirewall {
    status: u16,
    body: Value,
    pub calls: Mutex<Vec<FirewallCall>>,
}

impl FakeFirewall {
    pub fn answering(status: u16, body: Value) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn reply(&self, call: FirewallCall) -> Result<UpstreamResponse, FirewallApiError> {
        self.calls.lock().push(call);
        Ok(UpstreamResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

#[async_trait]
impl FirewallRulesApi for FakeFirewall {
    async fn list_rules(&self, zone_id: &str) -> Result<UpstreamResponse, FirewallApiError> {
        self.reply(FirewallCall::List(zone_id.to_string()))
    }

    async fn create_rules(
        &self,
        zone_id: &str,
        rules: &[FirewallRulePayload],
    ) -> Result<UpstreamResponse, FirewallApiError> {
        self.reply(FirewallCall::Create(zone_id.to_string(), rules.to_vec()))
    }

    async fn delete_rule(
        &self,
        zone_id: &str,
        rule_id: &str,
    ) -> Result<UpstreamResponse, FirewallApiError> {
        self.reply(FirewallCall::Delete(zone_id.to_string(), rule_id.to_string()))
    }
}

/// Session store whose writes always fail.
pub struct BrokenStore;

#[async_trait]
impl SessionStore for BrokenStore {
    async fn put(
        &self,
        _session_key: &str,
        _record: &ChatSessionRecord,
        _ttl: Duration,
    ) -> Result<(), SessionStoreError> {
        Err(serde_json::from_str::<u8>("not a number").unwrap_err().into())
    }

    async fn get(&self, _session_key: &str) -> Result<Option<ChatSessionRecord>, SessionStoreError> {
        Ok(None)
    }

    async fn delete(&self, _session_key: &str) -> Result<(), SessionStoreError> {
        Ok(())
    }
}

pub fn router(state: AppState) -> Router {
    build_router(state, &ServerConfig::default())
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_raw(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::from(body))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
