//! Ring-buffered audit log.

use crate::entry::AuditLogEntry;

use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Append-only, size-bounded audit log.
///
/// Entries are kept in insertion order. When the buffer is full the
/// oldest entry is evicted. The interior mutex makes appends atomic under
/// concurrent writers; a poisoned lock is recovered rather than
/// propagated, since the log must keep accepting entries for the lifetime
/// of the process.
#[derive(Debug)]
pub struct AuditLog {
    entries: Mutex<VecDeque<AuditLogEntry>>,
    capacity: usize,
}

impl AuditLog {
    /// Default in-memory cap.
    pub const DEFAULT_CAPACITY: usize = 1000;

    /// Creates a log with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a log with a custom capacity. Zero is rounded up to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    /// Appends an entry, evicting the oldest when at capacity.
    ///
    /// Returns the id of the appended entry.
    pub fn append(&self, entry: AuditLogEntry) -> Uuid {
        let id = entry.id;
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        debug!(entry_id = %id, user_id = %entry.user_id, action = %entry.action, "Audit entry appended");
        entries.push_back(entry);
        id
    }

    /// Returns up to `limit` entries for a user, most recent first.
    pub fn entries_for_user(&self, user_id: &str, limit: usize) -> Vec<AuditLogEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .iter()
            .rev()
            .filter(|entry| entry.user_id == user_id)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Looks up a single entry by id.
    pub fn entry(&self, id: Uuid) -> Option<AuditLogEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.iter().find(|entry| entry.id == id).cloned()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Returns true if the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new()
    }
}
