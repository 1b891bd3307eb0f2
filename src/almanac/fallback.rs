//! Offline almanac generator.
//!
//! [`generate`] builds a plausible record without the network. It is
//! deterministic per calendar date: the RNG is a local `StdRng` seeded
//! from the SHA-256 of the `YYYY-MM-DD` string, so the same day always
//! yields the same record and the thread RNG is left alone.
//!
//! [`canned_text`] is the last-resort text block and is not seeded.

use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use super::models::{DateInfo, FestivalInfo, FortuneInfo, FortuneRecord, WuxingInfo};

pub const FITNESS_OPTIONS: [&str; 12] = [
    "祈福、出行、会友",
    "学习、读书、思考",
    "整理、清洁、收纳",
    "运动、健身、散步",
    "烹饪、品茶、休息",
    "创作、写作、绘画",
    "沟通、交流、分享",
    "规划、总结、反思",
    "购物、理财、投资",
    "娱乐、游戏、放松",
    "种植、园艺、养护",
    "修缮、维护、保养",
];

pub const TABOO_OPTIONS: [&str; 12] = [
    "争吵、冲突、抱怨",
    "熬夜、过劳、透支",
    "冲动、急躁、鲁莽",
    "浪费、挥霍、奢侈",
    "拖延、懒散、消极",
    "八卦、传谣、议论",
    "贪心、嫉妒、比较",
    "焦虑、担忧、恐惧",
    "固执、偏见、排斥",
    "暴饮、暴食、贪杯",
    "孤立、封闭、逃避",
    "批评、指责、埋怨",
];

pub const ZODIAC_ANIMALS: [&str; 12] = [
    "鼠", "牛", "虎", "兔", "龙", "蛇", "马", "羊", "猴", "鸡", "狗", "猪",
];

pub const WUXING_ELEMENTS: [&str; 5] = ["金", "木", "水", "火", "土"];

pub const HEAVENLY_STEMS: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];

pub const EARTHLY_BRANCHES: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];

const DIRECTIONS: [&str; 8] = ["东", "南", "西", "北", "东南", "西南", "东北", "西北"];

const CARDINAL_POINTS: [&str; 4] = ["东", "南", "西", "北"];

const TAISHEN_POSITIONS: [&str; 5] = ["厨灶", "仓库", "房床", "门户", "厕所"];

const PENGZU_TABOOS: [&str; 5] = ["甲不开仓", "乙不栽植", "丙不修灶", "丁不剃头", "戊不受田"];

const DAY_OFFICERS: [&str; 12] = [
    "建", "除", "满", "平", "定", "执", "破", "危", "成", "收", "开", "闭",
];

const NAYIN: [&str; 10] = [
    "海中金", "炉中火", "大林木", "路旁土", "剑锋金", "山头火", "涧下水", "城头土", "白蜡金",
    "杨柳木",
];

/// Includes one empty entry, so a festival draw can still come up blank.
pub const FESTIVALS: [&str; 12] = [
    "", "春分", "清明", "立夏", "端午", "夏至", "立秋", "中秋", "寒露", "立冬", "冬至", "腊八",
];

const FESTIVAL_PROBABILITY: f64 = 0.3;

pub const CANNED_TEXTS: [&str; 5] = [
    "📅 农历信息获取中...\n✅ 宜：摸鱼、划水、发呆\n❌ 忌：加班、开会、写报告",
    "📅 今日黄历\n✅ 宜：午休、喝茶、聊天\n❌ 忌：认真工作、主动汇报",
    "📅 老黄历提醒\n✅ 宜：保持低调、适度摸鱼\n❌ 忌：表现积极、承担责任",
    "📅 运势播报\n✅ 宜：网上冲浪、刷手机\n❌ 忌：提升自己、努力奋斗",
    "📅 今日宜忌\n✅ 宜：装忙、假装思考\n❌ 忌：真的很忙、真的在想",
];

/// Seed derived from the first 8 bytes of SHA-256(`YYYY-MM-DD`).
fn date_seed(day: &str) -> u64 {
    let digest = Sha256::digest(day.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

fn pick<R: Rng>(rng: &mut R, options: &[&'static str]) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}

fn ganzhi<R: Rng>(rng: &mut R) -> String {
    format!("{}{}", pick(rng, &HEAVENLY_STEMS), pick(rng, &EARTHLY_BRANCHES))
}

/// Sexagenary label of a Gregorian year, e.g. 2023 → `癸卯年`.
///
/// The lunar new year boundary is ignored.
pub fn year_ganzhi(year: i32) -> String {
    let offset = (year - 4).rem_euclid(60) as usize;
    format!(
        "{}{}年",
        HEAVENLY_STEMS[offset % HEAVENLY_STEMS.len()],
        EARTHLY_BRANCHES[offset % EARTHLY_BRANCHES.len()]
    )
}

/// Generate the fallback record for `date`.
pub fn generate(date: NaiveDate) -> FortuneRecord {
    let day = date.format("%Y-%m-%d").to_string();
    let mut rng = StdRng::seed_from_u64(date_seed(&day));

    let date_info = DateInfo {
        lunar_date: format!("农历{}月{}日", rng.gen_range(1..=12), rng.gen_range(1..=30)),
        lunar_day: rng.gen_range(1..=30).to_string(),
        lunar_formatted: format!("农历{}月{}日", rng.gen_range(1..=12), rng.gen_range(1..=30)),
        lunar_month_name: format!("{}月", rng.gen_range(1..=12)),
        year_ganzhi: year_ganzhi(date.year()),
        month_ganzhi: format!("{}月", ganzhi(&mut rng)),
        day_ganzhi: format!("{}日", ganzhi(&mut rng)),
        zodiac: pick(&mut rng, &ZODIAC_ANIMALS).to_string(),
        gregorian_date: day,
    };

    let fortune_info = FortuneInfo {
        fitness: pick(&mut rng, &FITNESS_OPTIONS).to_string(),
        taboo: pick(&mut rng, &TABOO_OPTIONS).to_string(),
        shenwei: format!("{}方", pick(&mut rng, &DIRECTIONS)),
        taishen: pick(&mut rng, &TAISHEN_POSITIONS).to_string(),
        chongsha: format!(
            "冲{}({})",
            pick(&mut rng, &ZODIAC_ANIMALS),
            pick(&mut rng, &CARDINAL_POINTS)
        ),
        suisha: format!("{}方", pick(&mut rng, &CARDINAL_POINTS)),
        wuxing: pick(&mut rng, &WUXING_ELEMENTS).to_string(),
        pengzu: format!("彭祖百忌：{}", pick(&mut rng, &PENGZU_TABOOS)),
        jianshen: format!("{}日", pick(&mut rng, &DAY_OFFICERS)),
        tiangandizhiwuxing: pick(&mut rng, &WUXING_ELEMENTS).to_string(),
    };

    let wuxing_info = WuxingInfo {
        wuxing: pick(&mut rng, &WUXING_ELEMENTS).to_string(),
        nayin: pick(&mut rng, &NAYIN).to_string(),
        tiangandizhiwuxing: pick(&mut rng, &WUXING_ELEMENTS).to_string(),
    };

    let festival = if rng.gen_bool(FESTIVAL_PROBABILITY) {
        pick(&mut rng, &FESTIVALS).to_string()
    } else {
        String::new()
    };

    FortuneRecord {
        date_info,
        fortune_info,
        wuxing_info,
        festival_info: FestivalInfo {
            festival,
            holiday: String::new(),
        },
    }
}

/// One of [`CANNED_TEXTS`], chosen with the thread RNG.
pub fn canned_text() -> String {
    pick(&mut rand::thread_rng(), &CANNED_TEXTS).to_string()
}
