//! Almanac module - upstream client, retry policy and offline fallback.

mod client;
mod error;
pub mod fallback;
mod models;
mod retry;

pub use client::AlmanacClient;
pub use error::FetchError;
pub use models::{DateInfo, FestivalInfo, FortuneInfo, FortuneRecord, WuxingInfo};
pub use retry::{RetryPolicy, Transient, retry};
