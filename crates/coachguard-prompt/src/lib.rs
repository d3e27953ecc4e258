//! # CoachGuard Prompt
//!
//! The transform stage of the pipeline: turn a raw, possibly hostile
//! user prompt into a provider-facing enhanced prompt.
//!
//! ## Three Passes
//!
//! 1. **Sanitize** ([`Sanitizer`]): neutralize instruction-override
//!    phrases with a filler marker, collapse pathological repetition,
//!    and strip references to prior refusals.
//! 2. **Enhance** ([`PromptComposer`]): wrap the sanitized request in
//!    persona, safety, memory, and emotional clauses.
//! 3. **Validate** ([`validate`]): emit warnings for oversized or
//!    suspicious compositions. Warnings never block; the refusal engine
//!    has already ruled by the time the transform runs.
//!
//! Sanitization is idempotent: running it twice yields the same text as
//! running it once.

mod enhance;
mod sanitize;
mod validate;

pub use enhance::{EnhanceContext, PromptComposer};
pub use sanitize::{Sanitizer, FILLER_MARKER};
pub use validate::{validate, ValidationContext, MAX_PROMPT_CHARS};
