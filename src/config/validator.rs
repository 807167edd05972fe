use super::{Config, SessionBackend};
use anyhow::Result;

pub fn validate_config(config: &Config) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if config.server.port < 1024 {
        warnings.push(format!(
            "[!] Port {} requires root privileges. Consider using a port >= 1024",
            config.server.port
        ));
    }

    if config.server.max_body_bytes == 0 {
        warnings.push("[X] server.max_body_bytes is 0. Every request body will be rejected".to_string());
    }

    if !["trace", "debug", "info", "warn", "error"].contains(&config.logging.level.as_str()) {
        warnings.push(format!(
            "[X] Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
            config.logging.level
        ));
    }

    if !["json", "pretty", "compact"].contains(&config.logging.format.as_str()) {
        warnings.push(format!(
            "[X] Invalid log format: {}. Must be 'json', 'pretty' or 'compact'",
            config.logging.format
        ));
    }

    if config.ai.account_id.as_deref().unwrap_or("").is_empty() {
        warnings.push(
            "[!] ai.account_id is not set (or CLOUDFLARE_ACCOUNT_ID). /api/chat will fail".to_string(),
        );
    }

    if config.ai.effective_token(&config.cloudflare).is_none() {
        warnings.push(
            "[!] No Workers AI token: set ai.api_token or cloudflare.api_token. /api/chat will fail".to_string(),
        );
    }

    if !(0.0..=5.0).contains(&config.ai.temperature) {
        warnings.push(format!(
            "[!] ai.temperature {} is outside 0.0-5.0",
            config.ai.temperature
        ));
    }

    if config.ai.history_window == 0 {
        warnings.push("[i] ai.history_window is 0. Conversation history will not reach the model".to_string());
    }

    if config.cloudflare.api_token.as_deref().unwrap_or("").is_empty() {
        warnings.push(
            "[!] cloudflare.api_token is not set (or CLOUDFLARE_API_TOKEN). Rule endpoints will return 500".to_string(),
        );
    }

    if config.cloudflare.zone_id.is_none() {
        warnings.push("[i] No default zone_id. Clients must pass zone_id on every rule request".to_string());
    }

    match config.session.backend {
        SessionBackend::Redis if config.session.redis_url.is_empty() => {
            warnings.push("[X] Session backend is 'redis' but session.redis_url is empty".to_string());
        }
        SessionBackend::None => {
            warnings.push("[i] Session persistence disabled".to_string());
        }
        _ => {}
    }

    if config.session.backend != SessionBackend::None && config.session.ttl_seconds == 0 {
        warnings.push("[X] session.ttl_seconds is 0. Sessions would expire immediately".to_string());
    }

    if config.logging.level == "debug" || config.logging.level == "trace" {
        warnings.push(
            "[*] Recommendation: Use 'info' or 'warn' log level in production".to_string()
        );
    }

    Ok(warnings)
}
