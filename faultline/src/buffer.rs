//! Session-scoped overflow buffer.
//!
//! Records that could not reach the remote logging service queue here,
//! ordered by insertion, until a flush writes them out. The buffer lives
//! in a host-provided session store; [`InMemorySessionStore`] is the
//! built-in implementation for hosts without their own session layer.
//!
//! Buffers are shared as `Arc<Mutex<ErrorCache>>` because a detached
//! report's completion may mutate the same session's buffer concurrently
//! with a blocking caller. Locking is per session; no ordering is
//! guaranteed between two racing adds beyond neither record being lost.

use crate::record::ErrorRecord;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// A session's buffer, shared between the caller thread and any detached
/// completion tasks.
pub type SharedCache = Arc<Mutex<ErrorCache>>;

/// Insertion-ordered collection of buffered error records.
///
/// A record's ordinal is its position at insertion time; ordinals restart
/// from zero after [`clear`](Self::clear).
#[derive(Debug, Default)]
pub struct ErrorCache {
    records: Vec<ErrorRecord>,
}

impl ErrorCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record, returning its ordinal.
    pub fn push(&mut self, record: ErrorRecord) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    /// The buffered records in insertion order.
    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    /// Number of buffered records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops all buffered records. Ordinals restart from zero.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// Host-provided session-scoped storage holding each session's buffer.
///
/// Only the reporter writes to a session's buffer slot. `set` replaces any
/// existing buffer under the key; buffers are never merged.
pub trait SessionStore: Send + Sync {
    /// Returns the buffer stored under `key`, if any.
    fn get(&self, key: &str) -> Option<SharedCache>;

    /// Installs `cache` under `key`, replacing any existing buffer.
    fn set(&self, key: &str, cache: SharedCache);

    /// Returns the buffer under `key`, installing an empty one first if
    /// the session has none.
    ///
    /// The default implementation is a non-atomic get-then-set;
    /// implementations backed by concurrent storage should override it
    /// with an atomic variant so two racing installs cannot drop a buffer.
    fn get_or_install(&self, key: &str) -> SharedCache {
        match self.get(key) {
            Some(cache) => cache,
            None => {
                let cache: SharedCache = Arc::new(Mutex::new(ErrorCache::new()));
                self.set(key, Arc::clone(&cache));
                cache
            }
        }
    }
}

/// In-memory session store backed by a mutexed map.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    slots: Mutex<HashMap<String, SharedCache>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, SharedCache>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Option<SharedCache> {
        self.slots().get(key).map(Arc::clone)
    }

    fn set(&self, key: &str, cache: SharedCache) {
        self.slots().insert(key.to_string(), cache);
    }

    fn get_or_install(&self, key: &str) -> SharedCache {
        let mut slots = self.slots();
        let cache = slots
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(ErrorCache::new())));
        Arc::clone(cache)
    }
}
