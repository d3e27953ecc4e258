//! Weighted risk rules.

use regex::Regex;
use tracing::warn;

/// One weighted pattern rule.
///
/// Rules are non-exclusive: the scorer adds the weight of every rule
/// whose pattern matches the prompt.
#[derive(Debug, Clone)]
pub struct RiskRule {
    /// Stable rule name, used in logs and tests.
    pub name: &'static str,
    /// Case-insensitive pattern.
    pub pattern: Regex,
    /// Contribution to the risk score when the pattern matches.
    pub weight: f64,
}

impl RiskRule {
    /// Compiles a rule, dropping it with a warning if the pattern is
    /// invalid. A dropped rule contributes nothing to any score.
    fn compile(name: &'static str, pattern: &str, weight: f64) -> Option<Self> {
        match Regex::new(pattern) {
            Ok(pattern) => Some(Self {
                name,
                pattern,
                weight,
            }),
            Err(e) => {
                warn!(rule = name, error = %e, "Dropping risk rule with invalid pattern");
                None
            }
        }
    }

    /// Returns true if the rule fires for the prompt.
    pub fn matches(&self, prompt: &str) -> bool {
        self.pattern.is_match(prompt)
    }
}

/// The ordered built-in rule list.
///
/// Weights are calibrated so that a single family rarely crosses the
/// high-risk refusal threshold on its own; genuinely dangerous prompts
/// tend to fire several families at once.
pub fn risk_rules() -> Vec<RiskRule> {
    [
        (
            "instruction_override",
            r"(?i)(ignore|disregard|forget)\s+((all|your)\s+)?(previous|prior|earlier|above)\s+(instructions?|prompts?|rules?|guidelines?)",
            0.4,
        ),
        (
            "system_impersonation",
            r"(?i)((i\s+am|i'm)\s+(the|your)\s+(developer|admin|administrator|system|creator)|system\s+override|admin\s+access)",
            0.35,
        ),
        (
            "jailbreak_keywords",
            r"(?i)(jailbreak|jailbroken|dan\s+mode|developer\s+mode|do\s+anything\s+now|unrestricted\s+mode|no\s+filters?\b|prompt\s+injection)",
            0.45,
        ),
        (
            "harmful_keywords",
            r"(?i)((make|build|create)\s+(a\s+)?(bomb|weapon|explosive)|hurt\s+(someone|myself|others)|how\s+to\s+hack|illegal\s+drugs|launder\s+money)",
            0.5,
        ),
        (
            "manipulation_keywords",
            r"(?i)(manipulate|gaslight|coerce|blackmail|trick\s+(him|her|them|someone))",
            0.3,
        ),
        (
            "personal_data",
            r"(?i)(password|social\s+security\s+number|credit\s+card\s+number|bank\s+account|home\s+address)",
            0.25,
        ),
        (
            "bypass_phrases",
            r"(?i)(bypass\s+(the\s+)?(safety|security|filter|restrictions?)|override\s+(the\s+)?(safety|security|filter)|without\s+(any\s+)?restrictions?|turn\s+off\s+(the\s+)?(safety|filters?))",
            0.35,
        ),
    ]
    .into_iter()
    .filter_map(|(name, pattern, weight)| RiskRule::compile(name, pattern, weight))
    .collect()
}
