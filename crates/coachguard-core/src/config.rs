//! Per-call filtering configuration.

use coachguard_context::{ConversationContext, EmotionalState, Provider, SafetyLevel, UserMemoryContext};
use serde::{Deserialize, Serialize};

/// Configuration for one `filter_prompt` call.
///
/// The config is immutable for the duration of the call. Inline
/// `user_memory` seeds the trust store on first sight of the user; once
/// the user is cached, the cached state is authoritative and the inline
/// snapshot is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilteringConfig {
    /// How strictly the enhanced prompt is constrained.
    pub safety_level: SafetyLevel,
    /// Downstream provider for this call.
    pub provider: Provider,
    /// Personality-type tag to weave into the prompt.
    pub personality_type: Option<String>,
    /// Application context tag (e.g. "coaching").
    pub context: Option<String>,
    /// Allow speculative or fictional framing.
    pub allow_creative: bool,
    /// Allow controversial topics.
    pub allow_controversial: bool,
    /// Advisory cap on the provider's response length.
    pub max_response_length: Option<usize>,
    /// Inline user memory; seeds the store for new users.
    pub user_memory: Option<UserMemoryContext>,
    /// Current conversation state; its session id is carried into the
    /// audit trail.
    pub conversation: Option<ConversationContext>,
    /// Current emotional state.
    pub emotional_state: Option<EmotionalState>,
    /// When false, the refusal engine is skipped and every prompt is
    /// allowed (scoring and auditing still run).
    pub enable_refusal_logic: bool,
    /// When false, user memory is neither consulted nor updated.
    pub enable_memory_integration: bool,
    /// When false, proactive suggestions are not generated.
    pub enable_proactive_coaching: bool,
}

impl Default for FilteringConfig {
    fn default() -> Self {
        Self {
            safety_level: SafetyLevel::default(),
            provider: Provider::default(),
            personality_type: None,
            context: None,
            allow_creative: false,
            allow_controversial: false,
            max_response_length: None,
            user_memory: None,
            conversation: None,
            emotional_state: None,
            enable_refusal_logic: true,
            enable_memory_integration: true,
            enable_proactive_coaching: true,
        }
    }
}

impl FilteringConfig {
    /// Config for a provider at a safety level, everything else default.
    pub fn for_provider(provider: Provider, safety_level: SafetyLevel) -> Self {
        Self {
            provider,
            safety_level,
            ..Self::default()
        }
    }
}
