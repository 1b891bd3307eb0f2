//! Typed cache wrapper around Moka.

use std::hash::Hash;
use std::sync::Arc;

use chrono::{DateTime, Local};
use moka::sync::Cache;
use tracing::debug;

use super::{CacheConfig, CacheKind};
use crate::utils::clock::Clock;

/// A stored value with the time it was written and its kind.
#[derive(Debug, Clone)]
struct Stamped<V> {
    value: V,
    created_at: DateTime<Local>,
    kind: CacheKind,
}

/// A typed cache wrapper that provides a clean API over Moka.
///
/// This cache is:
/// - Bounded by `max_capacity`, with Moka expiring anything past the longest TTL
/// - Expired by the per-kind TTL, checked against the injected clock on read
/// - Clone-friendly (cloning is cheap, shares the same underlying cache)
pub struct TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Cache<K, Stamped<V>>>,
    config: Arc<CacheConfig>,
    clock: Arc<dyn Clock>,
    name: Arc<str>,
}

// Manual Clone implementation that doesn't require K: Clone, V: Clone
impl<K, V> Clone for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: Arc::clone(&self.config),
            clock: Arc::clone(&self.clock),
            name: Arc::clone(&self.name),
        }
    }
}

impl<K, V> TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a new typed cache with the given name, config and clock.
    pub fn new(name: impl Into<Arc<str>>, config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        // Moka drops entries past the longest TTL; reads still decide
        // freshness per kind against the injected clock.
        let inner = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.max_ttl())
            .build();

        Self {
            inner: Arc::new(inner),
            config: Arc::new(config),
            clock,
            name: name.into(),
        }
    }

    /// Get the name of this cache.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store a value, replacing whatever was under the key.
    pub fn set(&self, key: K, value: V, kind: CacheKind) {
        self.inner.insert(
            key,
            Stamped {
                value,
                created_at: self.clock.now(),
                kind,
            },
        );
    }

    /// Get a value from the cache.
    ///
    /// Returns `Some(value)` only while `now - created_at < ttl(kind)`.
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.inner.get(key)?;

        // A clock that went backwards counts as zero elapsed time.
        let age = (self.clock.now() - entry.created_at)
            .to_std()
            .unwrap_or_default();
        let ttl = self.config.ttl_for(entry.kind);

        if age < ttl {
            Some(entry.value)
        } else {
            debug!("Cache '{}' entry expired after {:?}", self.name, age);
            None
        }
    }

    /// Get the number of entries in the cache, stale ones included.
    ///
    /// Note: This may lag behind recent inserts until Moka runs its
    /// pending maintenance.
    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }
}

impl<K, V> std::fmt::Debug for TypedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedCache")
            .field("name", &self.name)
            .field("entry_count", &self.inner.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::utils::clock::ManualClock;

    fn cache_with(clock: &ManualClock) -> TypedCache<&'static str, String> {
        let config = CacheConfig::default().fortune_ttl(Duration::from_secs(12 * 3600));
        TypedCache::new("test", config, Arc::new(clock.clone()))
    }

    #[test]
    fn missing_key_is_absent() {
        let clock = ManualClock::on(2024, 3, 5);
        let cache = cache_with(&clock);
        assert_eq!(cache.get(&"nope"), None);
    }

    #[test]
    fn value_is_returned_until_just_before_ttl() {
        let clock = ManualClock::on(2024, 3, 5);
        let cache = cache_with(&clock);
        cache.set("k", "v".to_string(), CacheKind::Fortune);

        assert_eq!(cache.get(&"k").as_deref(), Some("v"));

        clock.advance(chrono::Duration::hours(12) - chrono::Duration::milliseconds(1));
        assert_eq!(cache.get(&"k").as_deref(), Some("v"));
    }

    #[test]
    fn value_is_absent_at_ttl() {
        let clock = ManualClock::on(2024, 3, 5);
        let cache = cache_with(&clock);
        cache.set("k", "v".to_string(), CacheKind::Fortune);

        clock.advance(chrono::Duration::hours(12));
        assert_eq!(cache.get(&"k"), None);

        clock.advance(chrono::Duration::hours(30));
        assert_eq!(cache.get(&"k"), None);
    }

    #[test]
    fn set_overwrites_and_restamps_stale_entry() {
        let clock = ManualClock::on(2024, 3, 5);
        let cache = cache_with(&clock);
        cache.set("k", "old".to_string(), CacheKind::Fortune);

        clock.advance(chrono::Duration::hours(13));
        assert_eq!(cache.get(&"k"), None);

        cache.set("k", "new".to_string(), CacheKind::Fortune);
        assert_eq!(cache.get(&"k").as_deref(), Some("new"));
        assert_eq!(cache.entry_count(), 1);
    }

    #[test]
    fn moka_expires_entries_past_the_longest_ttl() {
        let clock = ManualClock::on(2024, 3, 5);
        let config = CacheConfig::default().fortune_ttl(Duration::from_millis(50));
        let cache: TypedCache<&'static str, String> =
            TypedCache::new("short", config, Arc::new(clock.clone()));
        cache.set("k", "v".to_string(), CacheKind::Fortune);
        assert_eq!(cache.name(), "short");

        // The injected clock has not moved, but real time has.
        std::thread::sleep(Duration::from_millis(120));
        assert_eq!(cache.get(&"k"), None);
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn clock_going_backwards_keeps_entry_fresh() {
        let clock = ManualClock::on(2024, 3, 5);
        let cache = cache_with(&clock);
        cache.set("k", "v".to_string(), CacheKind::Fortune);

        clock.advance(chrono::Duration::hours(-2));
        assert_eq!(cache.get(&"k").as_deref(), Some("v"));
    }
}
