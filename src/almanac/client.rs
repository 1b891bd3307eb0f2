//! TianAPI almanac client.
//!
//! Issues `GET {base}/lunar/index?key=..&date=YYYY-MM-DD` through the
//! retry wrapper and maps the `result` object into a [`FortuneRecord`].

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::error::FetchError;
use super::models::{DateInfo, FestivalInfo, FortuneInfo, FortuneRecord, WuxingInfo};
use super::retry::{RetryPolicy, retry};
use crate::config::Config;

/// Response envelope shared by all TianAPI endpoints.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    result: Option<Value>,
}

/// HTTP client bound to one API key.
#[derive(Clone)]
pub struct AlmanacClient {
    http: Client,
    base_url: String,
    api_key: String,
    retry: RetryPolicy,
}

impl AlmanacClient {
    /// Build a client from configuration.
    ///
    /// Returns `Ok(None)` when no credential is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, FetchError> {
        let Some(api_key) = config.tianapi_key.clone() else {
            return Ok(None);
        };

        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("daily-fortune/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Some(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key,
            retry: config.retry_policy(),
        }))
    }

    /// Fetch and parse the almanac for `date`.
    pub async fn fetch_day(&self, date: NaiveDate) -> Result<FortuneRecord, FetchError> {
        let day = date.format("%Y-%m-%d").to_string();
        let url = format!("{}/lunar/index", self.base_url);

        let body = retry(&self.retry, || self.request(&url, &day)).await?;
        let envelope: ApiEnvelope = serde_json::from_str(&body)?;

        let record = parse_envelope(envelope, &day)?;
        info!("Fetched almanac for {} from upstream", day);
        Ok(record)
    }

    /// One attempt. A non-2xx status is an error, but not a retryable one.
    async fn request(&self, url: &str, day: &str) -> Result<String, FetchError> {
        debug!("GET {} date={}", url, day);

        let response = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str()), ("date", day)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}

impl std::fmt::Debug for AlmanacClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlmanacClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("retry", &self.retry)
            .finish()
    }
}

fn parse_envelope(envelope: ApiEnvelope, day: &str) -> Result<FortuneRecord, FetchError> {
    match envelope.result {
        Some(Value::Object(result)) if envelope.code == 200 => Ok(map_result(&result, day)),
        _ => Err(FetchError::Rejected {
            code: envelope.code,
            message: envelope
                .msg
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "missing result".to_string()),
        }),
    }
}

/// Lenient lookup: missing fields become empty strings.
struct Fields<'a>(&'a Map<String, Value>);

impl Fields<'_> {
    /// First non-empty value among `names`, else `""`.
    fn get(&self, names: &[&str]) -> String {
        names
            .iter()
            .find_map(|name| self.0.get(*name).and_then(as_text))
            .unwrap_or_default()
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn map_result(result: &Map<String, Value>, day: &str) -> FortuneRecord {
    let f = Fields(result);

    // The live schema splits the display form into month and day.
    let mut lunar_formatted = f.get(&["lunar_date_cn"]);
    if lunar_formatted.is_empty() {
        let (month, lunar_day) = (f.get(&["lubarmonth"]), f.get(&["lunarday"]));
        lunar_formatted = if !month.is_empty() && !lunar_day.is_empty() {
            format!("{month}{lunar_day}")
        } else {
            f.get(&["lunardate"])
        };
    }

    let wuxing = f.get(&["wuxing"]);
    let tiangandizhiwuxing = f.get(&["tiangandizhiwuxing"]);

    FortuneRecord {
        date_info: DateInfo {
            gregorian_date: day.to_string(),
            lunar_date: f.get(&["lunar_date", "lunardate"]),
            lunar_day: f.get(&["lunar_day", "lunarday"]),
            lunar_formatted,
            lunar_month_name: f.get(&["lunar_month_cn", "lubarmonth"]),
            year_ganzhi: f.get(&["year_ganzhi", "tiangandizhiyear"]),
            month_ganzhi: f.get(&["month_ganzhi", "tiangandizhimonth"]),
            day_ganzhi: f.get(&["day_ganzhi", "tiangandizhiday"]),
            zodiac: f.get(&["zodiac", "shengxiao"]),
        },
        fortune_info: FortuneInfo {
            fitness: f.get(&["fitness"]),
            taboo: f.get(&["taboo"]),
            shenwei: f.get(&["shenwei"]),
            taishen: f.get(&["taishen"]),
            chongsha: f.get(&["chongsha"]),
            suisha: f.get(&["suisha"]),
            wuxing: wuxing.clone(),
            pengzu: f.get(&["pengzu"]),
            jianshen: f.get(&["jianshen"]),
            tiangandizhiwuxing: tiangandizhiwuxing.clone(),
        },
        wuxing_info: WuxingInfo {
            wuxing,
            nayin: f.get(&["nayin"]),
            tiangandizhiwuxing,
        },
        festival_info: FestivalInfo {
            festival: f.get(&["festival", "lunar_festival"]),
            holiday: f.get(&["holiday"]),
        },
    }
}
