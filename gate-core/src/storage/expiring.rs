//! TTL cache layered over a [`StorageBackend`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use super::backend::StorageBackend;
use crate::utils::clock::unix_ms;

/// TTL applied by [`ExpiringStore::set`] when none is given explicitly.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Envelope written to the substrate for each cached value.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    value: serde_json::Value,
    written_at_ms: i64,
    ttl_ms: i64,
}

impl CacheEntry {
    fn expired(&self, now_ms: i64) -> bool {
        now_ms - self.written_at_ms > self.ttl_ms
    }
}

/// Key/value cache with per-entry TTL.
///
/// All operations absorb substrate faults: they log the error and return
/// `false` / `None` rather than propagating, so callers can treat the
/// cache as best-effort.
pub struct ExpiringStore<B: StorageBackend> {
    backend: B,
    default_ttl: Duration,
}

impl<B: StorageBackend> ExpiringStore<B> {
    pub fn new(backend: B) -> Self {
        Self::with_default_ttl(backend, DEFAULT_TTL)
    }

    pub fn with_default_ttl(backend: B, default_ttl: Duration) -> Self {
        Self {
            backend,
            default_ttl,
        }
    }

    /// Cache `value` under `key` with the store's default TTL.
    pub async fn set(&self, key: &str, value: serde_json::Value) -> bool {
        self.set_with_ttl(key, value, self.default_ttl).await
    }

    /// Cache `value` under `key`, expiring after `ttl`.
    pub async fn set_with_ttl(&self, key: &str, value: serde_json::Value, ttl: Duration) -> bool {
        let entry = CacheEntry {
            value,
            written_at_ms: unix_ms(),
            ttl_ms: ttl.as_millis().min(i64::MAX as u128) as i64,
        };
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                error!(key, error = %e, "failed to encode cache entry");
                return false;
            }
        };
        match self.backend.write(key, &raw).await {
            Ok(()) => true,
            Err(e) => {
                error!(key, error = %e, "cache write failed");
                false
            }
        }
    }

    /// Read `key`, treating expired entries as absent and evicting them.
    pub async fn get(&self, key: &str) -> Option<serde_json::Value> {
        let raw = match self.backend.read(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!(key, error = %e, "cache read failed");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                // A corrupt entry behaves like a missing one.
                warn!(key, error = %e, "evicting undecodable cache entry");
                self.evict(key).await;
                return None;
            }
        };

        if entry.expired(unix_ms()) {
            debug!(key, "evicting expired cache entry");
            self.evict(key).await;
            return None;
        }

        Some(entry.value)
    }

    /// Remove `key`. Returns `false` only on a substrate fault.
    pub async fn remove(&self, key: &str) -> bool {
        match self.backend.delete(key).await {
            Ok(()) => true,
            Err(e) => {
                error!(key, error = %e, "cache delete failed");
                false
            }
        }
    }

    /// Remove every entry. Returns `false` only on a substrate fault.
    pub async fn clear(&self) -> bool {
        match self.backend.clear().await {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "cache clear failed");
                false
            }
        }
    }

    async fn evict(&self, key: &str) {
        if let Err(e) = self.backend.delete(key).await {
            error!(key, error = %e, "failed to evict cache entry");
        }
    }
}
