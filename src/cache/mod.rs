//! Cache module - Date-keyed fortune cache on top of Moka.
//!
//! Every entry carries its creation time and a [`CacheKind`]. Reads
//! compare the entry age against the kind's TTL using an injected
//! [`Clock`](crate::utils::clock::Clock); stale entries read as absent
//! and are simply overwritten by the next `set`.
//!
//! ## Usage
//!
//! ```ignore
//! let cache = TypedCache::new("fortune", CacheConfig::default(), clock);
//!
//! cache.set(key, value, CacheKind::Fortune);
//! let value = cache.get(&key);
//! ```

mod config;
mod typed;

pub use config::{CacheConfig, CacheKind};
pub use typed::TypedCache;
