use crate::rules::Rule;
use crate::session::HistoryEntry;

/// Client-side state of one conversation. Owned by the caller and passed
/// to every request; nothing about it is global.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    pub session_id: Option<String>,
    pub history: Vec<HistoryEntry>,
    pub last_rule: Option<Rule>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue a conversation the server already knows by id.
    pub fn resume(session_id: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            ..Self::default()
        }
    }

    /// Record a completed turn.
    pub fn record_turn(&mut self, session_id: String, user: String, assistant: String, rule: Rule) {
        self.session_id = Some(session_id);
        self.history.push(HistoryEntry::user(user));
        self.history.push(HistoryEntry::assistant(assistant));
        self.last_rule = Some(rule);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::normalize;

    #[test]
    fn test_record_turn() {
        let mut session = ChatSession::new();
        assert!(session.session_id.is_none());

        let rule = normalize("block it (http.request.uri.path eq \"/admin\")");
        session.record_turn(
            "session_1".to_string(),
            "block admin".to_string(),
            "sure".to_string(),
            rule.clone(),
        );

        assert_eq!(session.session_id.as_deref(), Some("session_1"));
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[0], HistoryEntry::user("block admin"));
        assert_eq!(session.history[1], HistoryEntry::assistant("sure"));
        assert_eq!(session.last_rule, Some(rule));
    }

    #[test]
    fn test_resume() {
        let session = ChatSession::resume("abc");
        assert_eq!(session.session_id.as_deref(), Some("abc"));
        assert!(session.history.is_empty());
    }
}
