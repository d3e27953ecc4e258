//! # CoachGuard Context
//!
//! Shared domain types and the trust state store for the CoachGuard
//! prompt safety pipeline.
//!
//! This crate is the leaf of the workspace dependency graph: it defines
//! the vocabulary every other component speaks (safety levels, providers,
//! user memory, conversation state, emotional state) and owns the per-user
//! trust ledger.
//!
//! ## Trust Model
//!
//! Each user carries a trust level in `[0, 1]` that drifts with behavior:
//!
//! | Signal | Adjustment |
//! |--------|------------|
//! | Low-risk interaction (risk < 0.2) | +0.05 |
//! | Any non-refused interaction | +0.02 |
//! | Refused interaction | -0.10 |
//! | High-risk interaction (risk > 0.7) | -0.15 |
//!
//! The adjustments for a single interaction are summed and clamped to
//! `[-0.2, +0.2]` before being applied, so no single prompt can swing
//! trust by more than a fifth of the scale.
//!
//! ## Concurrency
//!
//! Concurrent filtering calls for the same user perform a
//! read-adjust-write on the trust level. [`TrustStore`] serializes that
//! critical section with a per-user `tokio::sync::Mutex`, so updates are
//! never lost under concurrent callers.

mod error;
mod models;
mod store;
mod types;

pub use error::StoreError;
pub use models::{
    ConversationContext, ConversationMessage, Emotion, EmotionalState, InteractionRecord,
    MessageRole, UserMemoryContext, MAX_RECENT_INTERACTIONS,
};
pub use store::{
    trust_adjustment, InMemoryRepository, MemoryRepository, TrustStore, MAX_TRUST_SWING,
};
pub use types::{Provider, SafetyLevel};

/// Context result type.
pub type Result<T> = std::result::Result<T, StoreError>;
