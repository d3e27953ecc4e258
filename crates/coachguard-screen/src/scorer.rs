//! Risk scorer with contextual adjustments.

use crate::rules::{risk_rules, RiskRule};

use coachguard_context::{EmotionalState, Provider, UserMemoryContext};
use regex::Regex;
use tracing::debug;

/// Pattern matched against the recent-interaction window to detect a
/// history of manipulation-style prompting.
const WINDOW_PATTERN: &str =
    r"(?i)(ignore\s+(all\s+)?(previous|prior)|jailbreak|pretend\s+to\s+be|manipulate|roleplay\s+as)";

/// Returns the provider escalation row: `(threshold, increment)`.
///
/// When the accumulated pattern score already exceeds the threshold, the
/// increment is added. Providers with weaker built-in safety get a lower
/// threshold and a larger increment; unknown providers use the openai
/// row.
pub fn provider_escalation(provider: &Provider) -> (f64, f64) {
    match provider {
        Provider::Grok | Provider::Local => (0.3, 0.2),
        Provider::OpenAi | Provider::Gemini | Provider::Other(_) => (0.4, 0.1),
        Provider::Claude => (0.5, 0.05),
    }
}

/// Contextual inputs to a single scoring call.
///
/// Everything is borrowed: the scorer never mutates state and takes no
/// ownership of the caller's memory or emotional snapshots.
#[derive(Debug, Clone, Copy)]
pub struct RiskContext<'a> {
    /// Target provider for this call.
    pub provider: &'a Provider,
    /// Application context tag (e.g. "coaching").
    pub context_tag: Option<&'a str>,
    /// User memory, when memory integration is enabled.
    pub memory: Option<&'a UserMemoryContext>,
    /// Current emotional state, when tracked.
    pub emotional: Option<&'a EmotionalState>,
}

/// Computes a risk score in `[0, 1]` for a raw prompt.
///
/// The algorithm, in order:
///
/// 1. Sum the weights of every matching [`RiskRule`] (non-exclusive).
/// 2. Provider escalation: add the provider increment when the sum
///    already exceeds the provider threshold.
/// 3. Coaching context: +0.1 when the context tag is `coaching` and the
///    score is already above 0.5.
/// 4. Memory adjustments: x0.8 when trust > 0.8; x1.3 when any recent
///    interaction contains manipulation-style keywords.
/// 5. Emotional adjustments: x1.2 when stability < 0.3; x0.9 when the
///    primary emotion is positive with intensity > 0.7.
/// 6. Clamp to `[0, 1]`.
#[derive(Debug)]
pub struct RiskScorer {
    rules: Vec<RiskRule>,
    window_pattern: Regex,
}

impl RiskScorer {
    /// Creates a scorer with the built-in rule list.
    pub fn new() -> Self {
        Self {
            rules: risk_rules(),
            // Static pattern, known good
            window_pattern: Regex::new(WINDOW_PATTERN).expect("window pattern compiles"),
        }
    }

    /// Creates a scorer with a custom rule list.
    pub fn with_rules(rules: Vec<RiskRule>) -> Self {
        Self {
            rules,
            window_pattern: Regex::new(WINDOW_PATTERN).expect("window pattern compiles"),
        }
    }

    /// Scores a prompt against the rule list and contextual adjustments.
    pub fn score(&self, prompt: &str, ctx: &RiskContext<'_>) -> f64 {
        let mut score = 0.0;
        for rule in &self.rules {
            if rule.matches(prompt) {
                debug!(rule = rule.name, weight = rule.weight, "Risk rule fired");
                score += rule.weight;
            }
        }

        let (threshold, increment) = provider_escalation(ctx.provider);
        if score > threshold {
            score += increment;
        }

        if ctx.context_tag == Some("coaching") && score > 0.5 {
            score += 0.1;
        }

        if let Some(memory) = ctx.memory {
            if memory.trust_level() > 0.8 {
                score *= 0.8;
            }
            let tainted_window = memory
                .recent_interactions
                .iter()
                .any(|record| self.window_pattern.is_match(&record.summary));
            if tainted_window {
                score *= 1.3;
            }
        }

        if let Some(state) = ctx.emotional {
            if state.stability() < 0.3 {
                score *= 1.2;
            }
            if state.primary_emotion.is_positive() && state.intensity() > 0.7 {
                score *= 0.9;
            }
        }

        score.clamp(0.0, 1.0)
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new()
    }
}
