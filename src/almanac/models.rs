//! Almanac record model.

use serde::{Deserialize, Serialize};

/// One day's almanac, grouped the way clients render it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FortuneRecord {
    pub date_info: DateInfo,
    pub fortune_info: FortuneInfo,
    /// Five-element summary; repeats some of `fortune_info`.
    pub wuxing_info: WuxingInfo,
    pub festival_info: FestivalInfo,
}

/// Calendar labels for the day.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateInfo {
    /// `YYYY-MM-DD`
    pub gregorian_date: String,
    pub lunar_date: String,
    pub lunar_day: String,
    /// Display form, e.g. `农历三月初五`.
    pub lunar_formatted: String,
    pub lunar_month_name: String,
    pub year_ganzhi: String,
    pub month_ganzhi: String,
    pub day_ganzhi: String,
    /// Zodiac animal (生肖)
    pub zodiac: String,
}

/// Guidance for the day.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FortuneInfo {
    /// Favored activities (宜)
    pub fitness: String,
    /// Avoided activities (忌)
    pub taboo: String,
    /// Auspicious direction (神位)
    pub shenwei: String,
    /// Fetal deity position (胎神)
    pub taishen: String,
    /// Clashing zodiac (冲煞)
    pub chongsha: String,
    pub suisha: String,
    pub wuxing: String,
    /// Pengzu taboo note (彭祖百忌)
    pub pengzu: String,
    /// Day officer (建除十二神)
    pub jianshen: String,
    pub tiangandizhiwuxing: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WuxingInfo {
    pub wuxing: String,
    /// Sound element (纳音)
    pub nayin: String,
    pub tiangandizhiwuxing: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FestivalInfo {
    pub festival: String,
    pub holiday: String,
}
