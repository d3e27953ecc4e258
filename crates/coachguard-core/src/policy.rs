//! Refusal decision engine.
//!
//! An ordered list of named rules evaluated first-match-wins. Each rule
//! is a pure predicate over the screening evidence; the first rule whose
//! predicate holds produces the verdict, and when none matches the
//! prompt is allowed.

use crate::result::{EscalationLevel, RefusalReason, RefusalResult};

use tracing::debug;

/// Screening evidence fed to the decision engine.
#[derive(Debug, Clone, Copy)]
pub struct PolicyInput<'a> {
    /// Risk score from the scorer, in `[0, 1]`.
    pub risk_score: f64,
    /// Manipulation tripwire fired.
    pub manipulation: bool,
    /// Boundary tripwire fired.
    pub boundary_violation: bool,
    /// Current trust level of the user, in `[0, 1]`.
    pub trust_level: f64,
    /// The user's first stated goal, for redirection suggestions.
    pub coaching_goal: Option<&'a str>,
}

/// One named refusal rule.
///
/// `matches` decides whether the rule applies; `verdict` builds the
/// refusal. Built-in rules never set `user_can_override`; the field
/// exists so deployments adding their own rules can mark softer ones.
pub struct RefusalRule {
    pub name: &'static str,
    pub user_can_override: bool,
    matches: fn(&PolicyInput<'_>) -> bool,
    verdict: fn(&PolicyInput<'_>) -> RefusalResult,
}

impl RefusalRule {
    pub fn new(
        name: &'static str,
        user_can_override: bool,
        matches: fn(&PolicyInput<'_>) -> bool,
        verdict: fn(&PolicyInput<'_>) -> RefusalResult,
    ) -> Self {
        Self {
            name,
            user_can_override,
            matches,
            verdict,
        }
    }

    /// Evaluates the rule, returning a verdict when it applies.
    pub fn evaluate(&self, input: &PolicyInput<'_>) -> Option<RefusalResult> {
        if (self.matches)(input) {
            let mut verdict = (self.verdict)(input);
            verdict.user_can_override = self.user_can_override;
            Some(verdict)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for RefusalRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefusalRule")
            .field("name", &self.name)
            .field("user_can_override", &self.user_can_override)
            .finish_non_exhaustive()
    }
}

/// Built-in rule list, in evaluation order.
pub fn refusal_rules() -> Vec<RefusalRule> {
    vec![
        RefusalRule::new(
            "high_risk",
            false,
            |input| input.risk_score > 0.8,
            |_| {
                RefusalResult::refuse(
                    RefusalReason::Safety,
                    "I can't help with that request. It raises serious safety concerns.",
                    EscalationLevel::Admin,
                )
                .with_human_review()
            },
        ),
        RefusalRule::new(
            "manipulation_attempt",
            false,
            |input| input.manipulation,
            |input| {
                let verdict = RefusalResult::refuse(
                    RefusalReason::Manipulation,
                    "I noticed an attempt to change how I operate. I'll stay in my coaching role.",
                    EscalationLevel::User,
                );
                match input.coaching_goal {
                    Some(goal) => verdict.with_alternative(format!(
                        "Let's refocus on your goal: {}",
                        goal
                    )),
                    None => verdict
                        .with_alternative("Let's refocus on what you'd like to work on."),
                }
            },
        ),
        RefusalRule::new(
            "boundary_violation",
            false,
            |input| input.boundary_violation,
            |_| {
                RefusalResult::refuse(
                    RefusalReason::Boundaries,
                    "That falls outside what a coach can responsibly help with.",
                    EscalationLevel::User,
                )
                .with_alternative(
                    "I can help you think through how you relate to this situation instead.",
                )
            },
        ),
        RefusalRule::new(
            "low_trust_elevated_risk",
            false,
            |input| input.trust_level < 0.3 && input.risk_score > 0.5,
            |_| {
                RefusalResult::refuse(
                    RefusalReason::Safety,
                    "Given our recent interactions, I'd rather not go there. \
                     Let's rebuild some common ground first.",
                    EscalationLevel::User,
                )
            },
        ),
    ]
}

/// First-match-wins refusal engine.
#[derive(Debug)]
pub struct DecisionEngine {
    rules: Vec<RefusalRule>,
}

impl DecisionEngine {
    /// Creates an engine with the built-in rule list.
    pub fn new() -> Self {
        Self {
            rules: refusal_rules(),
        }
    }

    /// Creates an engine with a custom rule list.
    pub fn with_rules(rules: Vec<RefusalRule>) -> Self {
        Self { rules }
    }

    /// Evaluates the rules in order and returns the first verdict, or an
    /// allow when no rule matches.
    pub fn decide(&self, input: &PolicyInput<'_>) -> RefusalResult {
        for rule in &self.rules {
            if let Some(verdict) = rule.evaluate(input) {
                debug!(rule = rule.name, "Refusal rule matched");
                return verdict;
            }
        }
        RefusalResult::allow()
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(risk: f64, manipulation: bool, boundary: bool, trust: f64) -> PolicyInput<'static> {
        PolicyInput {
            risk_score: risk,
            manipulation,
            boundary_violation: boundary,
            trust_level: trust,
            coaching_goal: None,
        }
    }

    #[test]
    fn test_clean_input_allowed() {
        let engine = DecisionEngine::new();
        let verdict = engine.decide(&input(0.1, false, false, 0.5));
        assert!(!verdict.should_refuse);
    }

    #[test]
    fn test_high_risk_refused_with_review() {
        let engine = DecisionEngine::new();
        let verdict = engine.decide(&input(0.85, false, false, 0.5));
        assert!(verdict.should_refuse);
        assert_eq!(verdict.reason, Some(RefusalReason::Safety));
        assert_eq!(verdict.escalation, EscalationLevel::Admin);
        assert!(verdict.human_review);
    }

    #[test]
    fn test_manipulation_refused_with_redirect() {
        let engine = DecisionEngine::new();
        let verdict = engine.decide(&PolicyInput {
            risk_score: 0.4,
            manipulation: true,
            boundary_violation: false,
            trust_level: 0.5,
            coaching_goal: Some("sleep better"),
        });
        assert_eq!(verdict.reason, Some(RefusalReason::Manipulation));
        assert_eq!(verdict.escalation, EscalationLevel::User);
        assert!(verdict
            .alternative_suggestion
            .as_deref()
            .unwrap()
            .contains("sleep better"));
    }

    #[test]
    fn test_boundary_refused() {
        let engine = DecisionEngine::new();
        let verdict = engine.decide(&input(0.2, false, true, 0.5));
        assert_eq!(verdict.reason, Some(RefusalReason::Boundaries));
        assert!(verdict.alternative_suggestion.is_some());
    }

    #[test]
    fn test_low_trust_elevated_risk_refused() {
        let engine = DecisionEngine::new();
        let verdict = engine.decide(&input(0.6, false, false, 0.2));
        assert!(verdict.should_refuse);
        assert_eq!(verdict.reason, Some(RefusalReason::Safety));
        assert_eq!(verdict.escalation, EscalationLevel::User);
    }

    #[test]
    fn test_low_trust_low_risk_allowed() {
        let engine = DecisionEngine::new();
        let verdict = engine.decide(&input(0.4, false, false, 0.2));
        assert!(!verdict.should_refuse);
    }

    #[test]
    fn test_normal_trust_elevated_risk_allowed() {
        let engine = DecisionEngine::new();
        let verdict = engine.decide(&input(0.6, false, false, 0.5));
        assert!(!verdict.should_refuse);
    }

    #[test]
    fn test_first_match_wins() {
        // High risk outranks manipulation even when both hold
        let engine = DecisionEngine::new();
        let verdict = engine.decide(&input(0.9, true, true, 0.1));
        assert_eq!(verdict.reason, Some(RefusalReason::Safety));
        assert_eq!(verdict.escalation, EscalationLevel::Admin);
    }

    #[test]
    fn test_builtin_rules_not_overridable() {
        for rule in refusal_rules() {
            assert!(!rule.user_can_override, "rule {} is overridable", rule.name);
        }
        let engine = DecisionEngine::new();
        let verdict = engine.decide(&input(0.9, false, false, 0.5));
        assert!(!verdict.user_can_override);
    }

    #[test]
    fn test_custom_rule_override_flag_propagates() {
        let engine = DecisionEngine::with_rules(vec![RefusalRule::new(
            "soft_rule",
            true,
            |input| input.risk_score > 0.1,
            |_| {
                RefusalResult::refuse(
                    RefusalReason::Inappropriate,
                    "Rather not.",
                    EscalationLevel::None,
                )
            },
        )]);
        let verdict = engine.decide(&input(0.2, false, false, 0.5));
        assert!(verdict.user_can_override);
    }
}
