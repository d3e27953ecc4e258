//! # CoachGuard Core
//!
//! Trust-adaptive prompt filtering for LLM-backed coaching applications.
//! The [`CoachGuard`] facade runs one pipeline pass per prompt:
//!
//! ```text
//!   prompt ──> screen ──> decide ──> transform ──> remember ──> audit
//!              (risk,     (refusal   (sanitize,    (trust,      (ring
//!               tripwires) rules)     enhance,      history)     buffer)
//!                                     validate)
//! ```
//!
//! ## Pipeline Stages
//!
//! | Stage | Component | Crate |
//! |-------|-----------|-------|
//! | Screen | [`RiskScorer`], [`ManipulationDetector`], [`BoundaryDetector`] | coachguard-screen |
//! | Decide | [`DecisionEngine`] | coachguard-core |
//! | Transform | [`Sanitizer`], [`PromptComposer`], validation | coachguard-prompt |
//! | Remember | [`TrustStore`] | coachguard-context |
//! | Audit | [`AuditLog`] | coachguard-audit |
//! | Advise | insight generators | coachguard-insight |
//!
//! ## Failure Model
//!
//! [`CoachGuard::filter_prompt`] never returns an error. A refusal is a
//! normal outcome carried in the result; an internal failure collapses to
//! [`FilteringResult::fallback`], which blocks the prompt and substitutes
//! a minimal safe persona. `fallback_used` distinguishes the two.
//!
//! ## Example
//!
//! ```no_run
//! use coachguard_core::{CoachGuard, FilteringConfig};
//! use coachguard_context::{Provider, SafetyLevel};
//!
//! # async fn demo() {
//! let guard = CoachGuard::in_memory();
//! let config = FilteringConfig::for_provider(Provider::Claude, SafetyLevel::Medium);
//! let result = guard.filter_prompt("What's a good morning routine?", &config).await;
//! assert!(result.allowed);
//! # }
//! ```

mod config;
mod error;
mod filter;
mod policy;
mod result;

pub use config::FilteringConfig;
pub use error::FilterError;
pub use filter::CoachGuard;
pub use policy::{refusal_rules, DecisionEngine, PolicyInput, RefusalRule};
pub use result::{
    EscalationLevel, FilteringResult, RefusalReason, RefusalResult, FALLBACK_PROMPT,
};

// Component types callers commonly need alongside the facade.
pub use coachguard_audit::{AuditAction, AuditLog, AuditLogEntry};
pub use coachguard_context::{
    ConversationContext, Emotion, EmotionalState, InMemoryRepository, MemoryRepository, Provider,
    SafetyLevel, TrustStore, UserMemoryContext,
};
pub use coachguard_prompt::{PromptComposer, Sanitizer};
pub use coachguard_screen::{BoundaryDetector, ManipulationDetector, RiskScorer};

/// Convenience alias for fallible core operations.
pub type Result<T> = std::result::Result<T, FilterError>;
