//! The filtering facade.

use crate::config::FilteringConfig;
use crate::error::FilterError;
use crate::policy::{DecisionEngine, PolicyInput};
use crate::result::{EscalationLevel, FilteringResult, RefusalResult};

use coachguard_audit::{AuditAction, AuditLog, AuditLogEntry};
use coachguard_context::{
    trust_adjustment, InMemoryRepository, InteractionRecord, MemoryRepository, TrustStore,
    UserMemoryContext,
};
use coachguard_prompt::{validate, EnhanceContext, PromptComposer, Sanitizer, ValidationContext};
use coachguard_screen::{BoundaryDetector, ManipulationDetector, RiskContext, RiskScorer};

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// User id used when no memory context names one.
const ANONYMOUS_USER: &str = "anonymous";

/// Trust-adaptive prompt filter.
///
/// Owns every pipeline component and orchestrates one pass per call:
/// screen, decide, transform, remember, audit, advise. The facade is the
/// only fallible seam; any internal error collapses to the safe fallback
/// result rather than surfacing to the caller.
pub struct CoachGuard {
    scorer: RiskScorer,
    manipulation: ManipulationDetector,
    boundary: BoundaryDetector,
    sanitizer: Sanitizer,
    composer: PromptComposer,
    engine: DecisionEngine,
    store: TrustStore,
    audit: AuditLog,
}

impl CoachGuard {
    /// Creates a filter backed by the given memory repository.
    pub fn new(repository: Arc<dyn MemoryRepository>) -> Self {
        Self {
            scorer: RiskScorer::new(),
            manipulation: ManipulationDetector::new(),
            boundary: BoundaryDetector::new(),
            sanitizer: Sanitizer::new(),
            composer: PromptComposer::new(),
            engine: DecisionEngine::new(),
            store: TrustStore::new(repository),
            audit: AuditLog::new(),
        }
    }

    /// Creates a filter with process-local memory, for tests and
    /// single-process deployments.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryRepository::new()))
    }

    /// Filters one prompt.
    ///
    /// Never fails: an internal error or panic in any pipeline stage is
    /// logged and the maximally-safe fallback result is returned instead.
    pub async fn filter_prompt(&self, prompt: &str, config: &FilteringConfig) -> FilteringResult {
        let outcome = AssertUnwindSafe(self.run_pipeline(prompt, config))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(FilterError::Internal(panic_message(panic))));
        match outcome {
            Ok(result) => result,
            Err(e) => {
                error!(error = %e, "Filtering pipeline failed, returning fallback");
                FilteringResult::fallback()
            }
        }
    }

    async fn run_pipeline(
        &self,
        prompt: &str,
        config: &FilteringConfig,
    ) -> Result<FilteringResult, FilterError> {
        let user_id = config
            .user_memory
            .as_ref()
            .map(|memory| memory.user_id.clone())
            .unwrap_or_else(|| ANONYMOUS_USER.to_string());

        // The handle's lock is held for the whole call so concurrent
        // calls for the same user serialize their trust updates.
        let handle = if config.enable_memory_integration {
            let handle = match &config.user_memory {
                Some(memory) => self.store.seed(memory.clone()).await,
                None => {
                    self.store
                        .acquire(&user_id, config.personality_type.as_deref())
                        .await
                }
            };
            Some(handle)
        } else {
            None
        };
        let mut guard = match &handle {
            Some(handle) => Some(handle.lock().await),
            None => None,
        };

        let risk_score = self.scorer.score(
            prompt,
            &RiskContext {
                provider: &config.provider,
                context_tag: config.context.as_deref(),
                memory: guard.as_deref(),
                emotional: config.emotional_state.as_ref(),
            },
        );
        let manipulation = self.manipulation.detect(prompt);
        let boundary_violation = self.boundary.detect(prompt);
        debug!(
            user_id = %user_id,
            risk_score, manipulation, boundary_violation, "Screening complete"
        );

        let trust_level = guard
            .as_deref()
            .map(UserMemoryContext::trust_level)
            .unwrap_or(UserMemoryContext::DEFAULT_TRUST);
        let verdict = if config.enable_refusal_logic {
            self.engine.decide(&PolicyInput {
                risk_score,
                manipulation,
                boundary_violation,
                trust_level,
                coaching_goal: guard
                    .as_deref()
                    .and_then(|memory| memory.goals.first())
                    .map(String::as_str),
            })
        } else {
            RefusalResult::allow()
        };
        let refused = verdict.should_refuse;

        let sanitized = self.sanitizer.sanitize(prompt, guard.is_some());
        let filtered_prompt = self.composer.compose(
            &sanitized,
            &EnhanceContext {
                provider: &config.provider,
                safety_level: config.safety_level,
                personality_type: config.personality_type.as_deref(),
                allow_controversial: config.allow_controversial,
                allow_creative: config.allow_creative,
                memory: guard.as_deref(),
                emotional: config.emotional_state.as_ref(),
            },
        );
        let warnings = validate(
            &filtered_prompt,
            &ValidationContext {
                personality_type: config.personality_type.as_deref(),
                memory: guard.as_deref(),
                emotional: config.emotional_state.as_ref(),
            },
        );

        // Commit section: the trust mutation, the interaction record, and
        // the audit append have no await point between them. An abandoned
        // call either commits all three or none of them.
        let delta = trust_adjustment(risk_score, refused);
        if let Some(memory) = guard.as_deref_mut() {
            memory.apply_trust_adjustment(delta);
            memory.record_interaction(InteractionRecord::new(prompt, risk_score, refused));
        }
        let audit_log_id = self.record_audit(
            prompt,
            config,
            &user_id,
            risk_score,
            &verdict,
            &sanitized,
            guard.as_deref(),
        );
        if let Some(memory) = guard.as_deref() {
            if let Err(e) = self.store.persist(memory).await {
                warn!(user_id = %user_id, error = %e, "Failed to persist user memory");
            }
        }

        let memory_insights = guard
            .as_deref()
            .map(coachguard_insight::memory_insights)
            .unwrap_or_default();
        let emotional_guidance = config
            .emotional_state
            .as_ref()
            .map(coachguard_insight::emotional_guidance)
            .unwrap_or_default();
        let proactive_suggestions = match (config.enable_proactive_coaching, guard.as_deref()) {
            (true, Some(memory)) => coachguard_insight::proactive_suggestions(
                &memory.goals,
                &memory.active_challenges,
            ),
            _ => Vec::new(),
        };

        info!(
            user_id = %user_id,
            risk_score,
            refused,
            trust_delta = delta,
            "Prompt filtered"
        );

        Ok(FilteringResult {
            allowed: !refused,
            filtered_prompt,
            safety_score: risk_score,
            warnings,
            fallback_used: false,
            refusal: Some(verdict),
            memory_insights,
            emotional_guidance,
            proactive_suggestions,
            trust_adjustment: delta,
            audit_log_id: Some(audit_log_id),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn record_audit(
        &self,
        prompt: &str,
        config: &FilteringConfig,
        user_id: &str,
        risk_score: f64,
        verdict: &RefusalResult,
        sanitized: &str,
        memory: Option<&UserMemoryContext>,
    ) -> Uuid {
        let action = if verdict.should_refuse {
            if verdict.escalation >= EscalationLevel::Admin {
                AuditAction::Escalated
            } else {
                AuditAction::Refused
            }
        } else if sanitized != prompt {
            AuditAction::Modified
        } else {
            AuditAction::Allowed
        };

        let reasoning = match (&verdict.reason, action) {
            (Some(reason), _) => format!("risk {:.2}, refused ({})", risk_score, reason),
            (None, AuditAction::Modified) => {
                format!("risk {:.2}, allowed after sanitization", risk_score)
            }
            (None, _) => format!("risk {:.2}, allowed", risk_score),
        };

        let session_id = config
            .conversation
            .as_ref()
            .map(|conversation| conversation.session_id.clone());
        let mut entry = AuditLogEntry::new(
            user_id,
            session_id,
            prompt,
            risk_score,
            action,
            reasoning,
            config.provider.clone(),
            config.safety_level,
        );
        if let Some(reason) = &verdict.reason {
            entry = entry.with_refusal(reason.to_string(), verdict.escalation.to_string());
        }
        if let Some(memory) = memory {
            entry = entry.with_memory(memory);
        }
        if let Some(state) = &config.emotional_state {
            entry = entry.with_emotional(state);
        }
        self.audit.append(entry)
    }

    /// Returns up to `limit` audit entries for a user, most recent first.
    pub fn audit_logs(&self, user_id: &str, limit: usize) -> Vec<AuditLogEntry> {
        self.audit.entries_for_user(user_id, limit)
    }

    /// Looks up a single audit entry by id.
    pub fn audit_entry(&self, id: Uuid) -> Option<AuditLogEntry> {
        self.audit.entry(id)
    }

    /// Point-in-time snapshot of a user's memory, if known.
    pub async fn user_memory(&self, user_id: &str) -> Option<UserMemoryContext> {
        self.store.snapshot(user_id).await
    }

    /// Inserts or replaces a user's memory record.
    pub async fn set_user_memory(&self, memory: UserMemoryContext) {
        self.store.insert(memory).await;
    }
}

/// Extracts a readable message from a caught panic payload.
fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "pipeline stage panicked".to_string()
    }
}

impl std::fmt::Debug for CoachGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoachGuard").finish_non_exhaustive()
    }
}
