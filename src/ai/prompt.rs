use crate::session::HistoryEntry;

pub const SYSTEM_PROMPT: &str = r#"You are an expert Cloudflare WAF (Web Application Firewall) rule generator.
Your task is to translate natural language security requirements into Cloudflare WAF rule expressions.

Cloudflare WAF rules use the Expression Editor syntax. Key concepts:
- Use CF expression syntax like: (http.request.uri.path eq "/login")
- Common fields: http.request.uri.path, http.request.method, ip.geoip.country, http.request.headers, etc.
- Logical operators: and, or, not
- Comparison operators: eq, ne, contains, matches, startsWith, endsWith
- Examples:
  * Block SQL injection: (http.request.body.truncated eq false and http.request.body contains "' OR '1'='1")
  * Allow only from Canada: (ip.geoip.country ne "CA")
  * Block specific endpoint: (http.request.uri.path eq "/admin")
  * Rate limiting: (cf.threat_score gt 50)
  * Block specific user agents: (http.request.headers["user-agent"][*] contains "badbot")

When generating rules:
1. Parse the user's intent accurately
2. Generate valid CF expression syntax
3. Include a human-readable description
4. Suggest appropriate action (block, challenge, log, etc.)
5. If the request is unclear, ask clarifying questions

Respond in JSON format:
{
  "rule": "WAF expression here",
  "description": "Human readable description",
  "action": "block|challenge|log|allow",
  "confidence": "high|medium|low",
  "explanation": "Brief explanation of the rule logic"
}"#;

/// Render the trailing `window` history turns as `role: content` lines
/// followed by the new user turn and an open assistant turn.
pub fn build_user_prompt(history: &[HistoryEntry], message: &str, window: usize) -> String {
    let skip = history.len().saturating_sub(window);
    let transcript = history[skip..]
        .iter()
        .map(|entry| format!("{}: {}", entry.role, entry.content))
        .collect::<Vec<_>>()
        .join("\n");

    if transcript.is_empty() {
        format!("user: {}\nassistant:", message)
    } else {
        format!("{}\n\nuser: {}\nassistant:", transcript, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(role: &str, content: &str) -> HistoryEntry {
        HistoryEntry {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_prompt_without_history() {
        assert_eq!(
            build_user_prompt(&[], "block /admin", 10),
            "user: block /admin\nassistant:"
        );
    }

    #[test]
    fn test_prompt_with_history() {
        let history = vec![entry("user", "hi"), entry("assistant", "hello")];
        assert_eq!(
            build_user_prompt(&history, "block /admin", 10),
            "user: hi\nassistant: hello\n\nuser: block /admin\nassistant:"
        );
    }

    #[test]
    fn test_prompt_keeps_only_last_window() {
        let history: Vec<_> = (0..15).map(|i| entry("user", &i.to_string())).collect();
        let prompt = build_user_prompt(&history, "next", 10);

        assert!(prompt.starts_with("user: 5\n"));
        assert!(!prompt.contains("user: 4\n"));
        assert_eq!(prompt.matches("user: ").count(), 11);
    }

    #[test]
    fn test_zero_window_drops_history() {
        let history = vec![entry("user", "hi")];
        assert_eq!(build_user_prompt(&history, "x", 0), "user: x\nassistant:");
    }
}
