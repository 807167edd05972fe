use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use super::error::{ApiError, ApiResult};
use super::state::AppState;
use crate::ai::{build_user_prompt, ChatMessage, InferenceRequest, SYSTEM_PROMPT};
use crate::cloudflare::{FirewallRulePayload, FirewallRulesApi, UpstreamResponse};
use crate::rules::{normalize, validate, Rule, RuleAction, ValidationResult};
use crate::session::{ChatSessionRecord, HistoryEntry};
use crate::utils::{is_path_segment, non_empty, parse_json_body};

pub const AI_UNAVAILABLE: &str =
    "Workers AI is not available. Configure ai.account_id and an API token (ai.api_token or CLOUDFLARE_API_TOKEN).";
pub const TOKEN_NOT_CONFIGURED: &str = "Cloudflare API token not configured";
pub const INVALID_RULE_ID: &str = "rule_id must be a single path segment";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: Option<String>,
    pub session_id: Option<String>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub session_id: String,
    pub message: String,
    pub rule: Rule,
    pub timestamp: String,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub expression: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRuleRequest {
    pub zone_id: Option<String>,
    pub expression: Option<String>,
    pub action: Option<RuleAction>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ZoneQuery {
    pub zone_id: Option<String>,
}

pub async fn chat(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<ChatResponse>> {
    let request: ChatRequest = parse_json_body(&body)?;
    let message = non_empty(request.message)
        .ok_or_else(|| ApiError::invalid_input("Message is required"))?;

    let inference = state
        .inference
        .as_ref()
        .ok_or_else(|| ApiError::UpstreamUnavailable(AI_UNAVAILABLE.to_string()))?;

    let prompt = build_user_prompt(&request.history, &message, state.chat.history_window);
    info!(model = %inference.model(), history = request.history.len(), "Generating rule");

    let reply = inference
        .run(InferenceRequest {
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            temperature: state.chat.temperature,
            max_tokens: state.chat.max_tokens,
        })
        .await?;

    let rule = normalize(&reply);

    let session_id = non_empty(request.session_id)
        .unwrap_or_else(|| format!("session_{}", chrono::Utc::now().timestamp_millis()));

    if let Some(store) = &state.sessions {
        let mut history = request.history;
        history.push(HistoryEntry::user(message));
        let record = ChatSessionRecord::new(history);

        if let Err(e) = store.put(&session_id, &record, state.chat.session_ttl).await {
            warn!(session = %session_id, error = %e, "Failed to persist chat session");
        }
    }

    Ok(Json(ChatResponse {
        session_id,
        message: reply,
        rule,
        timestamp: super::timestamp(),
    }))
}

pub async fn preview_rule(body: Bytes) -> ApiResult<Json<ValidationResult>> {
    let request: PreviewRequest = parse_json_body(&body)?;
    let expression = non_empty(request.expression)
        .ok_or_else(|| ApiError::invalid_input("expression is required"))?;

    Ok(Json(validate(&expression)))
}

pub async fn list_rules(
    State(state): State<AppState>,
    Query(query): Query<ZoneQuery>,
) -> ApiResult<Response> {
    let zone_id = state
        .resolve_zone(query.zone_id)
        .ok_or_else(|| ApiError::invalid_input("zone_id is required"))?;
    let api = state.firewall_api()?;

    let upstream = api.list_rules(&zone_id).await?;
    relay(upstream)
}

pub async fn create_rule(State(state): State<AppState>, body: Bytes) -> ApiResult<Response> {
    let request: CreateRuleRequest = parse_json_body(&body)?;

    let zone_id = state.resolve_zone(request.zone_id);
    let expression = non_empty(request.expression);
    let (zone_id, expression) = match (zone_id, expression) {
        (Some(zone_id), Some(expression)) => (zone_id, expression),
        _ => return Err(ApiError::invalid_input("zone_id and expression are required")),
    };
    let api = state.firewall_api()?;

    let payload = FirewallRulePayload::new(
        expression,
        request.action,
        request.description,
        request.enabled,
    );
    info!(zone = %zone_id, action = %payload.action, "Creating firewall rule");

    let upstream = api.create_rules(&zone_id, std::slice::from_ref(&payload)).await?;
    relay(upstream)
}

/// Serves both `/api/rules/:id` and `/api/rules/`, so an empty id is a
/// 400 rather than a 404.
pub async fn delete_rule(
    State(state): State<AppState>,
    rule_id: Option<Path<String>>,
    Query(query): Query<ZoneQuery>,
) -> ApiResult<Response> {
    let rule_id = non_empty(rule_id.map(|Path(id)| id));
    let zone_id = state.resolve_zone(query.zone_id);
    let (rule_id, zone_id) = match (rule_id, zone_id) {
        (Some(rule_id), Some(zone_id)) => (rule_id, zone_id),
        _ => return Err(ApiError::invalid_input("rule_id and zone_id are required")),
    };
    if !is_path_segment(&rule_id) {
        return Err(ApiError::invalid_input(INVALID_RULE_ID));
    }
    let api = state.firewall_api()?;

    info!(zone = %zone_id, rule = %rule_id, "Deleting firewall rule");
    let upstream = api.delete_rule(&zone_id, &rule_id).await?;
    relay(upstream)
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}

fn relay(upstream: UpstreamResponse) -> ApiResult<Response> {
    if !upstream.is_success() {
        warn!(status = upstream.status, "Cloudflare API rejected the request");
        return Err(ApiError::UpstreamStatus {
            status: upstream.status,
            body: upstream.body,
        });
    }

    let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::OK);
    Ok((status, Json(upstream.body)).into_response())
}

impl AppState {
    /// Requested zone, else the configured default.
    fn resolve_zone(&self, requested: Option<String>) -> Option<String> {
        non_empty(requested).or_else(|| self.default_zone.clone())
    }

    fn firewall_api(&self) -> ApiResult<&Arc<dyn FirewallRulesApi>> {
        self.firewall
            .as_ref()
            .ok_or_else(|| ApiError::ConfigurationMissing(TOKEN_NOT_CONFIGURED.to_string()))
    }
}
