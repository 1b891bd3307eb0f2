//! Text rendering of a fortune record.

use clap::ValueEnum;

use crate::almanac::FortuneRecord;

/// Output shape selected by the `format` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum FortuneFormat {
    #[default]
    Structured,
    Text,
}

impl FortuneFormat {
    /// `structured` or no selector at all means structured; anything
    /// else means text.
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector.map(str::trim) {
            None | Some("structured") => Self::Structured,
            Some(_) => Self::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::Text => "text",
        }
    }
}

/// Render the three-line summary:
///
/// ```text
/// 📅 {lunar}
/// ✅ 宜：{fitness}
/// ❌ 忌：{taboo}
/// ```
///
/// Empty fields leave their slot empty.
pub fn render_text(record: &FortuneRecord) -> String {
    let lunar = &record.date_info.lunar_formatted;
    let fitness = &record.fortune_info.fitness;
    let taboo = &record.fortune_info.taboo;

    format!("📅 {lunar}\n✅ 宜：{fitness}\n❌ 忌：{taboo}")
}

/// Whether any of the three template slots has content.
pub fn has_summary(record: &FortuneRecord) -> bool {
    !(record.date_info.lunar_formatted.is_empty()
        && record.fortune_info.fitness.is_empty()
        && record.fortune_info.taboo.is_empty())
}
