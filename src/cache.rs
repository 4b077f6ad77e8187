//! In-memory process-lifetime caches.
//!
//! Two containers back the dashboard flows: a TTL cache-aside wrapper for
//! Gamma responses (tags and event pages) and the audit cache holding LLM
//! verdicts keyed by slug. Both are explicit state passed to their owners,
//! never ambient globals, and both are Mutex-guarded so adding concurrent
//! scans later is a policy question, not a data-race fix.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::market::models::AuditResult;

/// Time source, injectable so TTL expiry is testable without waiting.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct TtlEntry<V> {
    stored_at: DateTime<Utc>,
    value: V,
}

/// Cache-aside store with a fixed time-to-live per cache.
pub struct TtlCache<V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, TtlEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl_seconds: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl: Duration::seconds(ttl_seconds),
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fresh cached value for `key`, or `None` when absent or expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.lock().expect("ttl cache lock poisoned");
        let entry = entries.get(key)?;
        if self.clock.now() - entry.stored_at >= self.ttl {
            return None;
        }
        Some(entry.value.clone())
    }

    pub fn put(&self, key: &str, value: V) {
        let mut entries = self.entries.lock().expect("ttl cache lock poisoned");
        entries.insert(
            key.to_string(),
            TtlEntry {
                stored_at: self.clock.now(),
                value,
            },
        );
    }

    /// Return the cached value for `key` or run `fetch` and cache its
    /// result. A failed fetch caches nothing.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }
        let value = fetch().await?;
        self.put(key, value.clone());
        Ok(value)
    }
}

/// Audit results for the lifetime of the process, keyed by event slug.
/// At most one entry per slug: the first write wins and presence
/// short-circuits any further audit for that slug.
#[derive(Default)]
pub struct AuditCache {
    entries: Mutex<HashMap<String, AuditResult>>,
}

impl AuditCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slug: &str) -> Option<AuditResult> {
        self.entries
            .lock()
            .expect("audit cache lock poisoned")
            .get(slug)
            .cloned()
    }

    pub fn has(&self, slug: &str) -> bool {
        self.entries
            .lock()
            .expect("audit cache lock poisoned")
            .contains_key(slug)
    }

    pub fn put(&self, slug: &str, result: AuditResult) {
        self.entries
            .lock()
            .expect("audit cache lock poisoned")
            .entry(slug.to_string())
            .or_insert(result);
    }
}
