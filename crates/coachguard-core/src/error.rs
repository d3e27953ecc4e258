//! Core error types.

use coachguard_context::StoreError;
use thiserror::Error;

/// Errors the filtering pipeline can raise internally.
///
/// Callers of [`crate::CoachGuard::filter_prompt`] never see these: the
/// facade converts any pipeline error into the safe fallback result.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("trust store error: {0}")]
    Store(#[from] StoreError),

    #[error("internal filtering error: {0}")]
    Internal(String),
}
