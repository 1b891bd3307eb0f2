//! Fortune module - the provider callers talk to.

mod provider;
mod text;

pub use provider::{CacheKey, FortuneProvider, RecordSource};
pub use text::{FortuneFormat, has_summary, render_text};
