use serde::{Deserialize, Serialize};

/// Field tokens that most hand-written Cloudflare expressions reference.
/// Matching is plain substring containment.
const KNOWN_FIELDS: &[&str] = &[
    "http.request.uri.path",
    "http.request.method",
    "ip.geoip.country",
    "http.request.headers",
    "cf.threat_score",
];

pub const EMPTY_EXPRESSION: &str = "Expression cannot be empty";
pub const UNBALANCED_PARENTHESES: &str = "Unbalanced parentheses";
pub const NO_KNOWN_FIELDS: &str =
    "Expression doesn't contain common Cloudflare fields - verify syntax";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn error(&mut self, message: &str) {
        self.valid = false;
        self.errors.push(message.to_string());
    }

    fn warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

/// Structural sanity check of a candidate expression.
///
/// This is not a grammar check. Parentheses are only counted, so `") ("`
/// passes and `"(a eq 1) )"` fails; ordering is never inspected.
pub fn validate(expression: &str) -> ValidationResult {
    let mut result = ValidationResult::new();

    if expression.trim().is_empty() {
        result.error(EMPTY_EXPRESSION);
    }

    let open = expression.matches('(').count();
    let close = expression.matches(')').count();
    if open != close {
        result.error(UNBALANCED_PARENTHESES);
    }

    if !KNOWN_FIELDS.iter().any(|field| expression.contains(field)) {
        result.warning(NO_KNOWN_FIELDS);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_expression_is_invalid() {
        let result = validate("");
        assert!(!result.valid);
        assert!(result.errors.contains(&EMPTY_EXPRESSION.to_string()));

        let result = validate("   \n\t");
        assert!(!result.valid);
        assert!(result.errors.contains(&EMPTY_EXPRESSION.to_string()));
    }

    #[test]
    fn test_missing_close_paren() {
        let result = validate("(a eq 1");
        assert!(!result.valid);
        assert!(result.errors.contains(&UNBALANCED_PARENTHESES.to_string()));
    }

    #[test]
    fn test_paren_check_is_count_based() {
        let result = validate("(a eq 1) )");
        assert!(!result.valid);
        assert_eq!(result.errors, vec![UNBALANCED_PARENTHESES.to_string()]);

        // Wrong order, equal totals: accepted.
        let result = validate(")http.request.method eq \"GET\"(");
        assert!(result.valid);
    }

    #[test]
    fn test_known_field_has_no_warnings() {
        let result = validate(r#"(http.request.uri.path eq "/x")"#);
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_unknown_field_warns_but_stays_valid() {
        let result = validate(r#"(foo eq "bar")"#);
        assert!(result.valid);
        assert_eq!(result.warnings, vec![NO_KNOWN_FIELDS.to_string()]);
    }

    #[test]
    fn test_field_match_is_substring() {
        let result = validate(r#"(http.request.headers["user-agent"][*] contains "badbot")"#);
        assert!(result.warnings.is_empty());

        let result = validate("(xcf.threat_scorex gt 1)");
        assert!(result.warnings.is_empty());
    }
}
