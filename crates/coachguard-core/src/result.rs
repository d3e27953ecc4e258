//! Verdict and result types for the filtering pipeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why a prompt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefusalReason {
    Safety,
    Ethics,
    Boundaries,
    Manipulation,
    Harmful,
    Inappropriate,
}

impl std::fmt::Display for RefusalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            RefusalReason::Safety => "safety",
            RefusalReason::Ethics => "ethics",
            RefusalReason::Boundaries => "boundaries",
            RefusalReason::Manipulation => "manipulation",
            RefusalReason::Harmful => "harmful",
            RefusalReason::Inappropriate => "inappropriate",
        };
        write!(f, "{}", tag)
    }
}

/// Who must be notified or review a refusal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EscalationLevel {
    /// No escalation needed.
    #[default]
    None,
    /// The user is informed.
    User,
    /// An administrator reviews the case.
    Admin,
    /// Immediate human attention.
    Emergency,
}

impl std::fmt::Display for EscalationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            EscalationLevel::None => "none",
            EscalationLevel::User => "user",
            EscalationLevel::Admin => "admin",
            EscalationLevel::Emergency => "emergency",
        };
        write!(f, "{}", tag)
    }
}

/// The refusal engine's verdict for one prompt.
///
/// Invariant: `reason` is present iff `should_refuse` is true. Use the
/// constructors to keep the invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefusalResult {
    /// Whether the prompt is refused.
    pub should_refuse: bool,
    /// Refusal reason; present iff refused.
    pub reason: Option<RefusalReason>,
    /// User-facing explanation.
    pub message: String,
    /// Suggested redirection toward safer ground.
    pub alternative_suggestion: Option<String>,
    /// Severity tier of the refusal.
    pub escalation: EscalationLevel,
    /// Whether the UI may expose an override control.
    pub user_can_override: bool,
    /// Whether a human should review the case.
    pub human_review: bool,
}

impl RefusalResult {
    /// An allow verdict.
    pub fn allow() -> Self {
        Self {
            should_refuse: false,
            reason: None,
            message: String::new(),
            alternative_suggestion: None,
            escalation: EscalationLevel::None,
            user_can_override: false,
            human_review: false,
        }
    }

    /// A refusal with the given reason, message, and escalation.
    pub fn refuse(
        reason: RefusalReason,
        message: impl Into<String>,
        escalation: EscalationLevel,
    ) -> Self {
        Self {
            should_refuse: true,
            reason: Some(reason),
            message: message.into(),
            alternative_suggestion: None,
            escalation,
            user_can_override: false,
            human_review: false,
        }
    }

    /// Attaches an alternative suggestion.
    pub fn with_alternative(mut self, suggestion: impl Into<String>) -> Self {
        self.alternative_suggestion = Some(suggestion.into());
        self
    }

    /// Flags the case for human review.
    pub fn with_human_review(mut self) -> Self {
        self.human_review = true;
        self
    }
}

/// Fallback persona prompt used when the pipeline fails internally.
pub const FALLBACK_PROMPT: &str =
    "You are a careful personality coach. Offer brief, safe, supportive guidance only.";

/// Composite result of one `filter_prompt` call.
///
/// `fallback_used` is the sole discriminator between "refused by policy"
/// (a normal outcome, carried in `refusal`) and "failed internally".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteringResult {
    /// Whether the prompt may proceed to the provider.
    pub allowed: bool,
    /// Provider-facing prompt (sanitized and enhanced).
    pub filtered_prompt: String,
    /// Risk score assigned to the raw prompt, in `[0, 1]`.
    pub safety_score: f64,
    /// Advisory warnings from validation.
    pub warnings: Vec<String>,
    /// True only when the pipeline failed and the safe fallback was used.
    pub fallback_used: bool,
    /// The refusal engine's verdict.
    pub refusal: Option<RefusalResult>,
    /// Insights derived from user memory.
    pub memory_insights: Vec<String>,
    /// Guidance derived from emotional state.
    pub emotional_guidance: Vec<String>,
    /// Suggestions matched against goals and challenges.
    pub proactive_suggestions: Vec<String>,
    /// Trust adjustment computed for this interaction.
    pub trust_adjustment: f64,
    /// Id of the audit entry recorded for this call.
    pub audit_log_id: Option<Uuid>,
}

impl FilteringResult {
    /// The maximally-safe result used when the pipeline fails.
    pub fn fallback() -> Self {
        Self {
            allowed: false,
            filtered_prompt: FALLBACK_PROMPT.to_string(),
            safety_score: 1.0,
            warnings: vec!["Filtering failed, using fallback".to_string()],
            fallback_used: true,
            refusal: None,
            memory_insights: Vec::new(),
            emotional_guidance: Vec::new(),
            proactive_suggestions: Vec::new(),
            trust_adjustment: 0.0,
            audit_log_id: None,
        }
    }

    /// True if the prompt was refused by policy (not by failure).
    pub fn is_refused(&self) -> bool {
        self.refusal
            .as_ref()
            .map(|r| r.should_refuse)
            .unwrap_or(false)
    }
}
