//! User memory, conversation, and emotional state models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Maximum number of interaction records kept per user.
pub const MAX_RECENT_INTERACTIONS: usize = 10;

/// One recorded interaction in a user's recent window.
///
/// The summary is a truncated copy of the raw prompt; the risk score and
/// refusal flag let the risk scorer inspect recent behavior without
/// re-scoring old prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Truncated prompt text (at most 200 characters).
    pub summary: String,
    /// Risk score the interaction was assigned.
    pub risk_score: f64,
    /// Whether the interaction was refused.
    pub refused: bool,
    /// When the interaction happened.
    pub timestamp: DateTime<Utc>,
}

impl InteractionRecord {
    /// Maximum characters kept in the summary.
    const SUMMARY_LIMIT: usize = 200;

    /// Creates a record from a raw prompt, truncating the summary.
    pub fn new(prompt: &str, risk_score: f64, refused: bool) -> Self {
        Self {
            summary: prompt.chars().take(Self::SUMMARY_LIMIT).collect(),
            risk_score,
            refused,
            timestamp: Utc::now(),
        }
    }
}

/// Per-user mutable state: trust level, recent interactions, and coaching
/// context.
///
/// # Invariants
///
/// - `trust_level` is always within `[0, 1]`
/// - `recent_interactions` holds at most [`MAX_RECENT_INTERACTIONS`]
///   records; the oldest is dropped on overflow
///
/// Both invariants are enforced by the mutators, not by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMemoryContext {
    /// Stable user identifier.
    pub user_id: String,
    /// Personality-type tag from the coaching application, if known.
    pub personality_type: Option<String>,
    /// Bounded window of recent interactions, oldest first.
    pub recent_interactions: VecDeque<InteractionRecord>,
    /// Current emotional-state tag, if tracked.
    pub emotional_state: Option<String>,
    /// The user's stated coaching goals.
    pub goals: Vec<String>,
    /// Challenges the user is actively working on.
    pub active_challenges: Vec<String>,
    /// Free-form preference map (tone, format, pacing).
    pub preferences: HashMap<String, String>,
    /// Accumulated trust in `[0, 1]`.
    trust_level: f64,
    /// Timestamp of the most recent interaction.
    pub last_interaction: DateTime<Utc>,
}

impl UserMemoryContext {
    /// Default trust assigned to a user with no history.
    pub const DEFAULT_TRUST: f64 = 0.5;

    /// Creates a fresh memory context with neutral trust.
    pub fn new(user_id: impl Into<String>, personality_type: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            personality_type,
            recent_interactions: VecDeque::new(),
            emotional_state: None,
            goals: Vec::new(),
            active_challenges: Vec::new(),
            preferences: HashMap::new(),
            trust_level: Self::DEFAULT_TRUST,
            last_interaction: Utc::now(),
        }
    }

    /// Returns the current trust level.
    pub fn trust_level(&self) -> f64 {
        self.trust_level
    }

    /// Sets the trust level directly, clamping into `[0, 1]`.
    ///
    /// Prefer [`UserMemoryContext::apply_trust_adjustment`] for the
    /// per-interaction path; this setter exists for loading persisted
    /// state and for tests.
    pub fn set_trust_level(&mut self, value: f64) {
        self.trust_level = value.clamp(0.0, 1.0);
    }

    /// Applies an additive trust adjustment and clamps the result.
    ///
    /// The adjustment itself should already be bounded (see
    /// [`crate::trust_adjustment`]); the clamp here guards the `[0, 1]`
    /// invariant at the edges of the scale.
    pub fn apply_trust_adjustment(&mut self, delta: f64) {
        self.trust_level = (self.trust_level + delta).clamp(0.0, 1.0);
        self.last_interaction = Utc::now();
    }

    /// Pushes an interaction record, evicting the oldest on overflow.
    pub fn record_interaction(&mut self, record: InteractionRecord) {
        if self.recent_interactions.len() >= MAX_RECENT_INTERACTIONS {
            self.recent_interactions.pop_front();
        }
        self.recent_interactions.push_back(record);
    }
}

/// Role of a message within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// A single message in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Optional tone tag attached by the caller (e.g. "supportive").
    pub tone: Option<String>,
}

/// State of the current coaching conversation.
///
/// # Invariants
///
/// - `engagement_score` is always within `[0, 1]`
/// - `depth` never decreases within a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// Session identifier.
    pub session_id: String,
    /// Message history, oldest first.
    pub messages: Vec<ConversationMessage>,
    /// Topic currently under discussion.
    pub current_topic: Option<String>,
    /// Monotonically non-decreasing depth counter.
    depth: u32,
    /// Engagement estimate in `[0, 1]`.
    engagement_score: f64,
}

impl ConversationContext {
    /// Creates an empty conversation for a session.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            messages: Vec::new(),
            current_topic: None,
            depth: 0,
            engagement_score: 0.0,
        }
    }

    /// Returns the current depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Increments the depth counter. Depth never decreases.
    pub fn deepen(&mut self) {
        self.depth += 1;
    }

    /// Returns the engagement score.
    pub fn engagement_score(&self) -> f64 {
        self.engagement_score
    }

    /// Sets the engagement score, clamping into `[0, 1]`.
    pub fn set_engagement_score(&mut self, value: f64) {
        self.engagement_score = value.clamp(0.0, 1.0);
    }
}

/// Primary emotion tags tracked by the coaching application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Excited,
    Calm,
    Neutral,
    Anxious,
    Sad,
    Angry,
    Frustrated,
}

impl Emotion {
    /// Returns true for emotions that lower the risk profile when felt
    /// intensely (the user is engaged, not distressed).
    pub fn is_positive(&self) -> bool {
        matches!(self, Emotion::Happy | Emotion::Excited | Emotion::Calm)
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Emotion::Happy => "happy",
            Emotion::Excited => "excited",
            Emotion::Calm => "calm",
            Emotion::Neutral => "neutral",
            Emotion::Anxious => "anxious",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Frustrated => "frustrated",
        };
        write!(f, "{}", tag)
    }
}

/// Snapshot of the user's emotional state at filtering time.
///
/// # Invariants
///
/// `intensity` and `stability` are always within `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalState {
    /// Dominant emotion right now.
    pub primary_emotion: Emotion,
    /// How strongly the emotion is felt, in `[0, 1]`.
    intensity: f64,
    /// How stable the emotional state is, in `[0, 1]`.
    stability: f64,
    /// Known triggers for this user.
    pub triggers: Vec<String>,
    /// Coping strategies that have worked before.
    pub coping_strategies: Vec<String>,
}

impl EmotionalState {
    /// Creates a state with clamped intensity and stability.
    pub fn new(primary_emotion: Emotion, intensity: f64, stability: f64) -> Self {
        Self {
            primary_emotion,
            intensity: intensity.clamp(0.0, 1.0),
            stability: stability.clamp(0.0, 1.0),
            triggers: Vec::new(),
            coping_strategies: Vec::new(),
        }
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn stability(&self) -> f64 {
        self.stability
    }
}
