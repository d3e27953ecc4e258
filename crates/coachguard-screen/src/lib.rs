//! # CoachGuard Screen
//!
//! First line of the filtering pipeline: numeric risk scoring and boolean
//! threat tripwires for inbound prompts.
//!
//! ## Two Kinds of Signal
//!
//! | Signal | Output | Affected by safety level |
//! |--------|--------|--------------------------|
//! | [`RiskScorer`] | score in `[0, 1]` | no (provider and context aware) |
//! | [`ManipulationDetector`] | bool | no |
//! | [`BoundaryDetector`] | bool | no |
//!
//! The scorer accumulates weighted pattern matches and then applies
//! contextual adjustments (provider escalation, coaching context, user
//! memory, emotional state). The detectors are independent tripwires:
//! they either fire or they do not, and the refusal engine treats them
//! as hard evidence regardless of the numeric score.
//!
//! Every rule is a named, independently testable predicate held in an
//! ordered list; rules are non-exclusive and multiple rules may fire for
//! one prompt.

mod detect;
mod rules;
mod scorer;

pub use detect::{BoundaryDetector, ManipulationDetector};
pub use rules::{risk_rules, RiskRule};
pub use scorer::{provider_escalation, RiskContext, RiskScorer};
