//! Audit entry types.

use chrono::{DateTime, Utc};
use coachguard_context::{EmotionalState, Provider, SafetyLevel, UserMemoryContext};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum characters of prompt text preserved in an entry.
pub const PROMPT_LIMIT: usize = 500;

/// What the pipeline did with the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    /// Prompt passed through with only standard enhancement.
    Allowed,
    /// Prompt was rejected outright (internal failure path).
    Blocked,
    /// Prompt was allowed after sanitization changed its text.
    Modified,
    /// Prompt was refused by policy.
    Refused,
    /// Prompt was refused with admin-or-higher escalation.
    Escalated,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            AuditAction::Allowed => "allowed",
            AuditAction::Blocked => "blocked",
            AuditAction::Modified => "modified",
            AuditAction::Refused => "refused",
            AuditAction::Escalated => "escalated",
        };
        write!(f, "{}", tag)
    }
}

/// Compact view of user memory at filtering time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub trust_level: f64,
    pub interaction_count: usize,
    pub goals: Vec<String>,
}

impl From<&UserMemoryContext> for MemorySnapshot {
    fn from(memory: &UserMemoryContext) -> Self {
        Self {
            trust_level: memory.trust_level(),
            interaction_count: memory.recent_interactions.len(),
            goals: memory.goals.clone(),
        }
    }
}

/// Compact view of emotional state at filtering time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalSnapshot {
    pub primary_emotion: String,
    pub intensity: f64,
    pub stability: f64,
}

impl From<&EmotionalState> for EmotionalSnapshot {
    fn from(state: &EmotionalState) -> Self {
        Self {
            primary_emotion: state.primary_emotion.to_string(),
            intensity: state.intensity(),
            stability: state.stability(),
        }
    }
}

/// One immutable record of a filtering decision.
///
/// Constructed once per pipeline call and never mutated after insertion
/// into the [`crate::AuditLog`]. The prompt text is truncated to
/// [`PROMPT_LIMIT`] characters on a character boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Unique entry id.
    pub id: Uuid,
    /// When the decision was made.
    pub timestamp: DateTime<Utc>,
    /// User the decision applies to.
    pub user_id: String,
    /// Session the prompt belonged to, if known.
    pub session_id: Option<String>,
    /// Truncated prompt text.
    pub prompt: String,
    /// Risk score assigned by the scorer.
    pub risk_score: f64,
    /// Action the pipeline took.
    pub action: AuditAction,
    /// Human-readable summary of the decision.
    pub reasoning: String,
    /// Refusal reason tag, when the prompt was refused.
    pub refusal_reason: Option<String>,
    /// Escalation level tag, when the prompt was refused.
    pub escalation: Option<String>,
    /// Memory state at decision time.
    pub memory: Option<MemorySnapshot>,
    /// Emotional state at decision time.
    pub emotional: Option<EmotionalSnapshot>,
    /// Target provider.
    pub provider: Provider,
    /// Safety level the call ran at.
    pub safety_level: SafetyLevel,
}

impl AuditLogEntry {
    /// Creates an entry with a fresh id and timestamp, truncating the
    /// prompt.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: impl Into<String>,
        session_id: Option<String>,
        prompt: &str,
        risk_score: f64,
        action: AuditAction,
        reasoning: impl Into<String>,
        provider: Provider,
        safety_level: SafetyLevel,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user_id: user_id.into(),
            session_id,
            prompt: prompt.chars().take(PROMPT_LIMIT).collect(),
            risk_score,
            action,
            reasoning: reasoning.into(),
            refusal_reason: None,
            escalation: None,
            memory: None,
            emotional: None,
            provider,
            safety_level,
        }
    }

    /// Attaches refusal details.
    pub fn with_refusal(mut self, reason: impl Into<String>, escalation: impl Into<String>) -> Self {
        self.refusal_reason = Some(reason.into());
        self.escalation = Some(escalation.into());
        self
    }

    /// Attaches a memory snapshot.
    pub fn with_memory(mut self, memory: &UserMemoryContext) -> Self {
        self.memory = Some(MemorySnapshot::from(memory));
        self
    }

    /// Attaches an emotional snapshot.
    pub fn with_emotional(mut self, state: &EmotionalState) -> Self {
        self.emotional = Some(EmotionalSnapshot::from(state));
        self
    }
}
