//! Cache configuration.

use std::time::Duration;

/// Kind tag stored with every cache entry.
///
/// The kind selects the time-to-live that applies to the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// Daily almanac payloads, structured or text.
    Fortune,
}

/// Configuration for a cache instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_capacity: u64,

    /// Time-to-live for [`CacheKind::Fortune`] entries.
    pub fortune_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1_000,
            fortune_ttl: Duration::from_secs(12 * 60 * 60), // 12 hours
        }
    }
}

impl CacheConfig {
    /// Set the fortune time-to-live (builder pattern).
    #[must_use]
    pub fn fortune_ttl(mut self, duration: Duration) -> Self {
        self.fortune_ttl = duration;
        self
    }

    /// Time-to-live for entries of the given kind.
    pub fn ttl_for(&self, kind: CacheKind) -> Duration {
        match kind {
            CacheKind::Fortune => self.fortune_ttl,
        }
    }

    /// Longest TTL of any kind. Entries older than this are never valid.
    pub fn max_ttl(&self) -> Duration {
        [CacheKind::Fortune]
            .into_iter()
            .map(|kind| self.ttl_for(kind))
            .max()
            .unwrap_or_default()
    }
}
