//! # Trust State Store
//!
//! Process-local cache of [`UserMemoryContext`] records keyed by user id,
//! backed by an asynchronous [`MemoryRepository`].
//!
//! ## Concurrency Model
//!
//! Trust updates are a read-adjust-write on shared state. The store keeps
//! one `tokio::sync::Mutex` per user and hands callers the lock guard for
//! the whole critical section, so two concurrent filtering calls for the
//! same user cannot lose an update. Different users never contend.
//!
//! ## Persistence Contract
//!
//! The repository is a collaborator implemented elsewhere (database,
//! key-value store). Both `load` and `save` may fail; the store degrades
//! gracefully on load failure by substituting a default memory context,
//! and the facade logs save failures without aborting the pipeline. The
//! cached entry is the single source of truth until persisted.

use crate::error::StoreError;
use crate::models::UserMemoryContext;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// Largest trust swing a single interaction may produce.
pub const MAX_TRUST_SWING: f64 = 0.2;

/// Computes the trust adjustment for one completed interaction.
///
/// The individual contributions are summed and the sum is clamped to
/// `[-MAX_TRUST_SWING, +MAX_TRUST_SWING]`:
///
/// - +0.05 when the risk score is below 0.2
/// - +0.02 when the prompt was not refused
/// - -0.10 when the prompt was refused
/// - -0.15 when the risk score exceeds 0.7
pub fn trust_adjustment(risk_score: f64, refused: bool) -> f64 {
    let mut delta: f64 = 0.0;
    if risk_score < 0.2 {
        delta += 0.05;
    }
    if refused {
        delta -= 0.10;
    } else {
        delta += 0.02;
    }
    if risk_score > 0.7 {
        delta -= 0.15;
    }
    delta.clamp(-MAX_TRUST_SWING, MAX_TRUST_SWING)
}

/// Asynchronous persistence contract for user memory.
///
/// Implementations live outside this crate; [`InMemoryRepository`] covers
/// tests and single-process deployments.
#[async_trait]
pub trait MemoryRepository: Send + Sync {
    /// Loads the memory record for a user, if one exists.
    async fn load(
        &self,
        user_id: &str,
        personality_type: Option<&str>,
    ) -> Result<Option<UserMemoryContext>, StoreError>;

    /// Persists a memory record.
    async fn save(&self, memory: &UserMemoryContext) -> Result<(), StoreError>;
}

/// Repository keeping records in process memory.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    records: RwLock<HashMap<String, UserMemoryContext>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Returns true if no records are stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl MemoryRepository for InMemoryRepository {
    async fn load(
        &self,
        user_id: &str,
        _personality_type: Option<&str>,
    ) -> Result<Option<UserMemoryContext>, StoreError> {
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn save(&self, memory: &UserMemoryContext) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(memory.user_id.clone(), memory.clone());
        Ok(())
    }
}

/// Shared handle to one user's memory, locked for the critical section.
pub type UserMemoryHandle = Arc<Mutex<UserMemoryContext>>;

/// Process-local trust state store.
///
/// Holds the cache of per-user memory and the repository used to hydrate
/// and persist it. Cloning the store is cheap and shares state.
#[derive(Clone)]
pub struct TrustStore {
    cache: Arc<Mutex<HashMap<String, UserMemoryHandle>>>,
    repository: Arc<dyn MemoryRepository>,
}

impl TrustStore {
    /// Creates a store backed by the given repository.
    pub fn new(repository: Arc<dyn MemoryRepository>) -> Self {
        Self {
            cache: Arc::new(Mutex::new(HashMap::new())),
            repository,
        }
    }

    /// Returns the handle for a user, hydrating from the repository on
    /// first access.
    ///
    /// A failed load is not fatal: the user gets a default memory context
    /// and the failure is logged. The returned handle must be locked by
    /// the caller for the read-adjust-write section.
    pub async fn acquire(
        &self,
        user_id: &str,
        personality_type: Option<&str>,
    ) -> UserMemoryHandle {
        let mut cache = self.cache.lock().await;
        if let Some(handle) = cache.get(user_id) {
            return Arc::clone(handle);
        }

        let memory = match self.repository.load(user_id, personality_type).await {
            Ok(Some(memory)) => {
                debug!(user_id, "Loaded user memory from repository");
                memory
            }
            Ok(None) => {
                debug!(user_id, "No stored memory, starting fresh");
                UserMemoryContext::new(user_id, personality_type.map(str::to_string))
            }
            Err(e) => {
                warn!(user_id, error = %e, "Memory load failed, using default context");
                UserMemoryContext::new(user_id, personality_type.map(str::to_string))
            }
        };

        let handle = Arc::new(Mutex::new(memory));
        cache.insert(user_id.to_string(), Arc::clone(&handle));
        handle
    }

    /// Inserts or replaces a memory record in the cache.
    pub async fn insert(&self, memory: UserMemoryContext) {
        let mut cache = self.cache.lock().await;
        cache.insert(memory.user_id.clone(), Arc::new(Mutex::new(memory)));
    }

    /// Seeds the cache with a record only if the user is not cached yet.
    ///
    /// Used when a caller supplies memory inline: the cached entry stays
    /// authoritative once it exists, so repeated calls with the same
    /// inline snapshot do not reset accumulated trust.
    pub async fn seed(&self, memory: UserMemoryContext) -> UserMemoryHandle {
        let mut cache = self.cache.lock().await;
        if let Some(handle) = cache.get(&memory.user_id) {
            return Arc::clone(handle);
        }
        let user_id = memory.user_id.clone();
        let handle = Arc::new(Mutex::new(memory));
        cache.insert(user_id, Arc::clone(&handle));
        handle
    }

    /// Returns a point-in-time snapshot of a user's memory, if cached.
    pub async fn snapshot(&self, user_id: &str) -> Option<UserMemoryContext> {
        let cache = self.cache.lock().await;
        match cache.get(user_id) {
            Some(handle) => Some(handle.lock().await.clone()),
            None => None,
        }
    }

    /// Persists a snapshot through the repository.
    pub async fn persist(&self, memory: &UserMemoryContext) -> Result<(), StoreError> {
        self.repository.save(memory).await
    }
}

impl std::fmt::Debug for TrustStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjustment_low_risk_allowed() {
        // +0.05 (low risk) +0.02 (not refused)
        let delta = trust_adjustment(0.1, false);
        assert!((delta - 0.07).abs() < 1e-9);
    }

    #[test]
    fn test_adjustment_refused_high_risk() {
        // -0.10 (refused) -0.15 (high risk), clamped to -0.2
        let delta = trust_adjustment(0.9, true);
        assert!((delta - -0.2).abs() < 1e-9);
    }

    #[test]
    fn test_adjustment_moderate_risk_allowed() {
        // Only +0.02 (not refused)
        let delta = trust_adjustment(0.5, false);
        assert!((delta - 0.02).abs() < 1e-9);
    }

    #[test]
    fn test_adjustment_refused_moderate_risk() {
        let delta = trust_adjustment(0.5, true);
        assert!((delta - -0.10).abs() < 1e-9);
    }

    #[test]
    fn test_adjustment_within_bounds() {
        for risk in [0.0, 0.1, 0.2, 0.5, 0.7, 0.71, 1.0] {
            for refused in [false, true] {
                let delta = trust_adjustment(risk, refused);
                assert!((-MAX_TRUST_SWING..=MAX_TRUST_SWING).contains(&delta));
            }
        }
    }

    #[tokio::test]
    async fn test_acquire_defaults_when_unstored() {
        let store = TrustStore::new(Arc::new(InMemoryRepository::new()));
        let handle = store.acquire("new-user", Some("ENFP")).await;
        let memory = handle.lock().await;
        assert_eq!(memory.user_id, "new-user");
        assert_eq!(memory.personality_type.as_deref(), Some("ENFP"));
        assert!((memory.trust_level() - UserMemoryContext::DEFAULT_TRUST).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_acquire_hydrates_from_repository() {
        let repository = Arc::new(InMemoryRepository::new());
        let mut stored = UserMemoryContext::new("returning-user", None);
        stored.set_trust_level(0.9);
        repository.save(&stored).await.unwrap();

        let store = TrustStore::new(repository);
        let handle = store.acquire("returning-user", None).await;
        assert!((handle.lock().await.trust_level() - 0.9).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_seed_does_not_replace_cached_entry() {
        let store = TrustStore::new(Arc::new(InMemoryRepository::new()));

        let mut first = UserMemoryContext::new("user-1", None);
        first.set_trust_level(0.8);
        store.seed(first).await;

        let mut second = UserMemoryContext::new("user-1", None);
        second.set_trust_level(0.2);
        let handle = store.seed(second).await;

        assert!((handle.lock().await.trust_level() - 0.8).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_concurrent_adjustments_not_lost() {
        let store = TrustStore::new(Arc::new(InMemoryRepository::new()));
        store.seed(UserMemoryContext::new("user-1", None)).await;

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let handle = store.acquire("user-1", None).await;
                let mut memory = handle.lock().await;
                let trust = memory.trust_level();
                memory.set_trust_level(trust + 0.01);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let memory = store.snapshot("user-1").await.unwrap();
        assert!((memory.trust_level() - 0.7).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_snapshot_missing_user() {
        let store = TrustStore::new(Arc::new(InMemoryRepository::new()));
        assert!(store.snapshot("ghost").await.is_none());
    }
}
