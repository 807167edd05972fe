use super::{FirewallApiError, FirewallRulePayload, FirewallRulesApi, UpstreamResponse};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Url};
use serde_json::Value;
use tracing::{debug, warn};

/// Cloudflare v4 `zones/{zone}/firewall/rules` client.
pub struct CloudflareClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl CloudflareClient {
    pub fn new(base_url: &str, api_token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
        }
    }

    /// `{base}/zones/{zone}/firewall/rules[/{rule}]`. Caller-supplied ids
    /// are encoded as single path segments, so `/` cannot leave the
    /// firewall rules collection.
    fn rules_url(&self, zone_id: &str, rule_id: Option<&str>) -> Result<Url, FirewallApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FirewallApiError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        for id in std::iter::once(zone_id).chain(rule_id) {
            if matches!(id, "" | "." | "..") {
                return Err(FirewallApiError::InvalidUrl(format!("invalid path segment {:?}", id)));
            }
        }

        url.path_segments_mut()
            .map_err(|_| FirewallApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["zones", zone_id, "firewall", "rules"])
            .extend(rule_id);

        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .bearer_auth(&self.api_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }

    async fn relay(&self, request: RequestBuilder) -> Result<UpstreamResponse, FirewallApiError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let body: Value = serde_json::from_str(&text).map_err(|_| {
            warn!(status, "Cloudflare API returned a non-JSON body");
            FirewallApiError::InvalidBody { status }
        })?;

        debug!(status, "Cloudflare API responded");
        Ok(UpstreamResponse { status, body })
    }
}

#[async_trait]
impl FirewallRulesApi for CloudflareClient {
    async fn list_rules(&self, zone_id: &str) -> Result<UpstreamResponse, FirewallApiError> {
        let request = self.request(Method::GET, self.rules_url(zone_id, None)?);
        self.relay(request).await
    }

    async fn create_rules(
        &self,
        zone_id: &str,
        rules: &[FirewallRulePayload],
    ) -> Result<UpstreamResponse, FirewallApiError> {
        let request = self
            .request(Method::POST, self.rules_url(zone_id, None)?)
            .json(rules);
        self.relay(request).await
    }

    async fn delete_rule(
        &self,
        zone_id: &str,
        rule_id: &str,
    ) -> Result<UpstreamResponse, FirewallApiError> {
        let url = self.rules_url(zone_id, Some(rule_id))?;
        let request = self.request(Method::DELETE, url);
        self.relay(request).await
    }
}
