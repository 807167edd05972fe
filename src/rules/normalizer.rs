//! Turns free-form model output into a [`Rule`].
//!
//! The model is asked for a JSON object but frequently wraps it in prose or
//! markdown, or skips it altogether. [`normalize`] never fails: when no
//! object can be recovered it builds a degraded rule from heuristics.

use super::{Confidence, Rule, RuleAction};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

/// Length cap, in characters, for text-derived descriptions and expressions.
pub const SNIPPET_CHARS: usize = 200;

lazy_static! {
    static ref CODE_BLOCK: Regex = Regex::new(r"(?s)```.*?```").unwrap();
    // Stops at the first `)`. Nested groups are truncated; see DESIGN.md.
    static ref PAREN_GROUP: Regex = Regex::new(r"\([^)]+\)").unwrap();
}

pub fn normalize(text: &str) -> Rule {
    match parse_embedded_rule(text) {
        Some(rule) => rule,
        None => {
            debug!("Model reply has no parseable rule object, using fallback extraction");
            fallback_rule(text)
        }
    }
}

/// Greedy `{ ... }` span: first `{` through last `}`.
///
/// Returns `None` when there is no such span or it is not valid JSON for a
/// rule object. Field values are not checked against the known enums.
pub fn parse_embedded_rule(text: &str) -> Option<Rule> {
    let candidate = embedded_object(text)?;
    serde_json::from_str::<Rule>(candidate).ok()
}

fn embedded_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn fallback_rule(text: &str) -> Rule {
    Rule {
        expression: extract_expression(text),
        description: snippet(text),
        action: infer_action(text),
        confidence: Confidence::Medium,
        explanation: text.to_string(),
    }
}

/// Best guess at an expression inside prose.
///
/// Preference order: the first fenced code block (fence markers removed,
/// whitespace trimmed), then the first `(...)` group without an inner `)`,
/// then the first [`SNIPPET_CHARS`] characters of the text.
pub fn extract_expression(text: &str) -> String {
    if let Some(block) = CODE_BLOCK.find(text) {
        return block.as_str().replace("```", "").trim().to_string();
    }

    if let Some(group) = PAREN_GROUP.find(text) {
        return group.as_str().to_string();
    }

    snippet(text)
}

/// Keyword scan in priority order: block/deny, challenge, allow/permit,
/// otherwise log.
pub fn infer_action(text: &str) -> RuleAction {
    let lower = text.to_lowercase();
    if lower.contains("block") || lower.contains("deny") {
        RuleAction::Block
    } else if lower.contains("challenge") {
        RuleAction::Challenge
    } else if lower.contains("allow") || lower.contains("permit") {
        RuleAction::Allow
    } else {
        RuleAction::Log
    }
}

fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}
