pub mod normalizer;
pub mod validator;

pub use normalizer::{extract_expression, infer_action, normalize};
pub use validator::{validate, ValidationResult};

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A rule proposal derived from one model reply.
///
/// The wire name of the expression field is `rule`, matching what the
/// model is asked to emit and what clients consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRule")]
pub struct Rule {
    #[serde(rename = "rule")]
    pub expression: String,
    pub description: String,
    pub action: RuleAction,
    pub confidence: Confidence,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuleAction {
    Block,
    Challenge,
    Log,
    Allow,
    /// Anything else the model produced. Kept verbatim.
    Other(String),
}

impl RuleAction {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Block => "block",
            Self::Challenge => "challenge",
            Self::Log => "log",
            Self::Allow => "allow",
            Self::Other(s) => s,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// The action to deploy with: unrecognized values degrade to `log`.
    pub fn effective(&self) -> RuleAction {
        match self {
            Self::Other(_) => Self::Log,
            other => other.clone(),
        }
    }
}

impl From<String> for RuleAction {
    fn from(s: String) -> Self {
        match s.as_str() {
            "block" => Self::Block,
            "challenge" => Self::Challenge,
            "log" => Self::Log,
            "allow" => Self::Allow,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for RuleAction {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<RuleAction> for String {
    fn from(action: RuleAction) -> Self {
        match action {
            RuleAction::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Confidence {
    High,
    Medium,
    Low,
    Other(String),
}

impl From<String> for Confidence {
    fn from(s: String) -> Self {
        match s.as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Other(s),
        }
    }
}

impl From<Confidence> for String {
    fn from(confidence: Confidence) -> Self {
        match confidence {
            Confidence::High => "high".to_string(),
            Confidence::Medium => "medium".to_string(),
            Confidence::Low => "low".to_string(),
            Confidence::Other(s) => s,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from(self.clone()))
    }
}

/// Shape of a rule object as the model writes it. Field values are taken
/// as-is: strings verbatim, other JSON scalars as their JSON text, and
/// missing or null fields as empty strings.
#[derive(Debug, Default, Deserialize)]
struct RawRule {
    #[serde(default, deserialize_with = "lenient_string")]
    rule: String,
    #[serde(default, deserialize_with = "lenient_string")]
    description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    action: String,
    #[serde(default, deserialize_with = "lenient_string")]
    confidence: String,
    #[serde(default, deserialize_with = "lenient_string")]
    explanation: String,
}

impl From<RawRule> for Rule {
    fn from(raw: RawRule) -> Self {
        Self {
            expression: raw.rule,
            description: raw.description,
            action: RuleAction::from(raw.action),
            confidence: Confidence::from(raw.confidence),
            explanation: raw.explanation,
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}
