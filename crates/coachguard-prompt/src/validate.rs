//! Post-composition validation.

use crate::sanitize::FILLER_MARKER;

use coachguard_context::{EmotionalState, UserMemoryContext};

/// Composed prompts longer than this draw a warning.
pub const MAX_PROMPT_CHARS: usize = 4000;

/// Borrowed inputs to validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationContext<'a> {
    /// The personality type the composition was supposed to include.
    pub personality_type: Option<&'a str>,
    pub memory: Option<&'a UserMemoryContext>,
    pub emotional: Option<&'a EmotionalState>,
}

/// Checks a composed prompt and returns advisory warnings.
///
/// Warnings never block a call; the verdict was decided before the
/// transform ran. They surface conditions worth watching: oversized
/// prompts, leftover filler markers, a personality tag that failed to
/// make it into the composition, low trust, and low emotional stability.
pub fn validate(prompt: &str, ctx: &ValidationContext<'_>) -> Vec<String> {
    let mut warnings = Vec::new();

    let char_count = prompt.chars().count();
    if char_count > MAX_PROMPT_CHARS {
        warnings.push(format!(
            "Composed prompt is {} characters (limit {})",
            char_count, MAX_PROMPT_CHARS
        ));
    }

    if prompt.contains(FILLER_MARKER) {
        warnings.push("Prompt still contains filler markers after sanitization".to_string());
    }

    if let Some(personality_type) = ctx.personality_type {
        if !prompt.contains(personality_type) {
            warnings.push(format!(
                "Configured personality type '{}' is missing from the final prompt",
                personality_type
            ));
        }
    }

    if let Some(memory) = ctx.memory {
        if memory.trust_level() < 0.5 {
            warnings.push(format!(
                "User trust level is low ({:.2})",
                memory.trust_level()
            ));
        }
    }

    if let Some(state) = ctx.emotional {
        if state.stability() < 0.3 {
            warnings.push(format!(
                "User emotional stability is low ({:.2})",
                state.stability()
            ));
        }
    }

    warnings
}
