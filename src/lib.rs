//! Daily Fortune - almanac provider with caching, retry and offline fallback.
//!
//! Serves today's traditional almanac (老黄历), fetched from TianAPI when a
//! key is configured and generated locally otherwise.
//!
//! ## Architecture
//!
//! - `config` - Environment configuration
//! - `cache` - Date-keyed TTL cache on Moka
//! - `almanac` - Upstream client, retry policy, record model and fallback generator
//! - `fortune` - The provider that ties cache, upstream and fallback together
//! - `utils` - Clock abstraction

pub mod almanac;
pub mod cache;
pub mod config;
pub mod fortune;
pub mod utils;

pub use almanac::{FetchError, FortuneRecord};
pub use config::Config;
pub use fortune::{FortuneFormat, FortuneProvider};
