use super::{InferenceClient, InferenceError, InferenceRequest};
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

/// Workers AI over the Cloudflare REST API.
pub struct WorkersAiClient {
    http: reqwest::Client,
    base_url: String,
    account_id: String,
    api_token: String,
    model: String,
}

impl WorkersAiClient {
    pub fn new(base_url: &str, account_id: &str, api_token: &str, model: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            account_id: account_id.to_string(),
            api_token: api_token.to_string(),
            model: model.to_string(),
        }
    }

    fn run_url(&self) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url, self.account_id, self.model
        )
    }
}

#[async_trait]
impl InferenceClient for WorkersAiClient {
    async fn run(&self, request: InferenceRequest) -> Result<String, InferenceError> {
        debug!(model = %self.model, messages = request.messages.len(), "Calling Workers AI");

        let response = self
            .http
            .post(self.run_url())
            .bearer_auth(&self.api_token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await?;
        if payload.get("success") == Some(&Value::Bool(false)) {
            return Err(InferenceError::Rejected(envelope_errors(&payload)));
        }

        Ok(reply_text(&payload))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Flatten the reply shapes different models produce into plain text.
///
/// Handles the REST envelope (`result`), `response` and `text` fields,
/// arrays of those, and bare strings. Anything else becomes its JSON text.
pub fn reply_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => {
            if let Some(result) = map.get("result").filter(|r| !r.is_null()) {
                return reply_text(result);
            }
            if let Some(Value::String(s)) = map.get("response") {
                return s.clone();
            }
            if let Some(Value::String(s)) = map.get("text") {
                return s.clone();
            }
            value.to_string()
        }
        Value::Array(items) => match items.first() {
            Some(first) => reply_text(first),
            None => value.to_string(),
        },
        other => other.to_string(),
    }
}

fn envelope_errors(payload: &Value) -> String {
    let messages: Vec<String> = payload
        .get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if messages.is_empty() {
        "Workers AI reported failure".to_string()
    } else {
        messages.join("; ")
    }
}
