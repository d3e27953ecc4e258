//! # CoachGuard Audit
//!
//! Append-only, size-bounded record of every filtering decision.
//!
//! Every `filter_prompt` call produces exactly one [`AuditLogEntry`],
//! constructed after the refusal verdict is known. Entries are immutable
//! once appended. The in-memory log is a ring buffer capped at
//! [`AuditLog::DEFAULT_CAPACITY`] entries; the oldest entry is evicted
//! first when the cap is exceeded.
//!
//! ## Concurrency
//!
//! Appends are serialized by an interior mutex, so concurrent pipeline
//! calls never corrupt the buffer or drop entries.

mod entry;
mod log;

pub use entry::{AuditAction, AuditLogEntry, EmotionalSnapshot, MemorySnapshot, PROMPT_LIMIT};
pub use log::AuditLog;
