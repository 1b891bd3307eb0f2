//! Fortune provider - cache, upstream fetch and fallback in one place.
//!
//! The provider never fails: every upstream problem resolves to the
//! date-seeded fallback record. Text is always the template rendered
//! from that record; the canned blocks only stand in when the offline
//! generator itself comes back with nothing to show.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use super::text::{FortuneFormat, has_summary, render_text};
use crate::almanac::{AlmanacClient, FetchError, FortuneRecord, fallback};
use crate::cache::{CacheKind, TypedCache};
use crate::config::Config;
use crate::utils::clock::{Clock, SystemClock};

/// Cache key: one entry per output shape per calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub format: FortuneFormat,
    pub date: NaiveDate,
}

impl CacheKey {
    pub fn new(format: FortuneFormat, date: NaiveDate) -> Self {
        Self { format, date }
    }
}

/// Where a structured record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    Upstream,
    Generated,
}

#[derive(Debug, Clone)]
enum CachedFortune {
    Structured(FortuneRecord, RecordSource),
    Text(String),
}

/// Serves today's almanac, structured or as text.
#[derive(Debug)]
pub struct FortuneProvider {
    upstream: Option<AlmanacClient>,
    cache: TypedCache<CacheKey, CachedFortune>,
    clock: Arc<dyn Clock>,
}

impl FortuneProvider {
    /// Create a provider on the system clock.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a provider reading time from `clock`.
    ///
    /// Only building the HTTP client can fail; a missing credential just
    /// puts the provider in fallback mode for its whole lifetime.
    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> Result<Self, FetchError> {
        let upstream = AlmanacClient::from_config(config)?;
        if upstream.is_none() {
            warn!("TIANAPI_KEY not configured, using generated fortunes");
        }

        let cache = TypedCache::new("fortune", config.cache_config(), Arc::clone(&clock));
        info!("Cache '{}' initialized", cache.name());

        Ok(Self {
            upstream,
            cache,
            clock,
        })
    }

    /// Whether upstream calls are possible at all.
    pub fn has_credential(&self) -> bool {
        self.upstream.is_some()
    }

    /// Today's almanac as a structured record.
    pub async fn get_fortune_structured(&self) -> FortuneRecord {
        self.structured_with_source().await.0
    }

    async fn structured_with_source(&self) -> (FortuneRecord, RecordSource) {
        let today = self.clock.today();
        let key = CacheKey::new(FortuneFormat::Structured, today);

        if let Some(CachedFortune::Structured(record, source)) = self.cache.get(&key) {
            info!("Using cached structured fortune for {}", today);
            return (record, source);
        }

        let (record, source) = resolve(today, self.fetch(today).await);
        self.cache.set(
            key,
            CachedFortune::Structured(record.clone(), source),
            CacheKind::Fortune,
        );
        (record, source)
    }

    /// Today's almanac as the three-line text block.
    pub async fn get_fortune_text(&self) -> String {
        let today = self.clock.today();
        let key = CacheKey::new(FortuneFormat::Text, today);

        if let Some(CachedFortune::Text(text)) = self.cache.get(&key) {
            info!("Using cached fortune text for {}", today);
            return text;
        }

        let (record, source) = self.structured_with_source().await;
        let text = compose_text(&record, source);

        self.cache
            .set(key, CachedFortune::Text(text.clone()), CacheKind::Fortune);
        text
    }

    async fn fetch(&self, date: NaiveDate) -> Result<FortuneRecord, FetchError> {
        match &self.upstream {
            Some(client) => client.fetch_day(date).await,
            None => Err(FetchError::MissingCredential),
        }
    }
}

/// Map the upstream outcome to a record. Every error takes the fallback path.
fn resolve(
    date: NaiveDate,
    outcome: Result<FortuneRecord, FetchError>,
) -> (FortuneRecord, RecordSource) {
    match outcome {
        Ok(record) => return (record, RecordSource::Upstream),
        Err(FetchError::MissingCredential) => {}
        Err(FetchError::Rejected { code, message }) => {
            warn!("Almanac API returned error {}: {}", code, message);
        }
        Err(err) => {
            error!("Failed to fetch structured fortune: {}", err);
        }
    }
    (fallback::generate(date), RecordSource::Generated)
}

/// Text for a resolved record.
///
/// Upstream records always render, empty slots included. A generated
/// record with nothing to show means both sources failed.
fn compose_text(record: &FortuneRecord, source: RecordSource) -> String {
    if source == RecordSource::Generated && !has_summary(record) {
        error!("Fallback generator produced an empty record, using canned text");
        return fallback::canned_text();
    }
    render_text(record)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{Local, TimeZone};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::almanac::fallback::{CANNED_TEXTS, FITNESS_OPTIONS, TABOO_OPTIONS};
    use crate::utils::clock::ManualClock;

    fn config_for(base_url: Option<&str>) -> Config {
        Config {
            tianapi_key: base_url.map(|_| "test-key".to_string()),
            api_base_url: base_url.unwrap_or("http://127.0.0.1:1").to_string(),
            request_timeout: Duration::from_secs(2),
            retry_delay: Duration::from_millis(5),
            ..Config::default()
        }
    }

    fn provider(config: &Config, clock: &ManualClock) -> FortuneProvider {
        FortuneProvider::with_clock(config, Arc::new(clock.clone())).unwrap()
    }

    fn march_fifth() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    async fn mount_success(server: &MockServer, expected_calls: u64) {
        Mock::given(method("GET"))
            .and(path("/lunar/index"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "msg": "success",
                "result": {
                    "lunar_date_cn": "农历正月廿五",
                    "fitness": "X",
                    "taboo": "Y"
                }
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn without_credential_returns_generated_record() {
        let clock = ManualClock::on(2024, 3, 5);
        let provider = provider(&config_for(None), &clock);
        assert!(!provider.has_credential());

        let record = provider.get_fortune_structured().await;

        assert!(!record.fortune_info.fitness.is_empty());
        assert!(!record.fortune_info.taboo.is_empty());
        assert!(FITNESS_OPTIONS.contains(&record.fortune_info.fitness.as_str()));
        assert!(TABOO_OPTIONS.contains(&record.fortune_info.taboo.as_str()));
        assert_eq!(record, fallback::generate(march_fifth()));
    }

    #[tokio::test]
    async fn upstream_success_is_returned_and_cached() {
        let server = MockServer::start().await;
        mount_success(&server, 1).await;

        let clock = ManualClock::on(2024, 3, 5);
        let provider = provider(&config_for(Some(&server.uri())), &clock);

        let first = provider.get_fortune_structured().await;
        assert_eq!(first.fortune_info.fitness, "X");
        assert_eq!(first.fortune_info.taboo, "Y");
        assert_eq!(first.date_info.gregorian_date, "2024-03-05");

        clock.advance(chrono::Duration::hours(3));
        let second = provider.get_fortune_structured().await;
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn upstream_requested_for_todays_date() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lunar/index"))
            .and(query_param("date", "2024-03-05"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"code": 200, "result": {"fitness": "X"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let clock = ManualClock::on(2024, 3, 5);
        let record = provider(&config_for(Some(&server.uri())), &clock)
            .get_fortune_structured()
            .await;
        assert_eq!(record.fortune_info.fitness, "X");
    }

    #[tokio::test]
    async fn expired_entry_is_refetched() {
        let server = MockServer::start().await;
        mount_success(&server, 2).await;

        let start = Local
            .with_ymd_and_hms(2024, 3, 5, 0, 30, 0)
            .earliest()
            .unwrap();
        let clock = ManualClock::at(start);
        let provider = provider(&config_for(Some(&server.uri())), &clock);

        provider.get_fortune_structured().await;
        clock.advance(chrono::Duration::hours(12));
        provider.get_fortune_structured().await;
    }

    #[tokio::test]
    async fn upstream_failure_falls_back_to_generated_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lunar/index"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let clock = ManualClock::on(2024, 3, 5);
        let provider = provider(&config_for(Some(&server.uri())), &clock);

        let record = provider.get_fortune_structured().await;
        assert_eq!(record, fallback::generate(march_fifth()));

        // The fallback is cached too; no second upstream call.
        assert_eq!(provider.get_fortune_structured().await, record);
    }

    #[tokio::test]
    async fn api_rejection_falls_back_to_generated_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lunar/index"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"code": 150, "msg": "次数用完"})),
            )
            .mount(&server)
            .await;

        let clock = ManualClock::on(2024, 3, 5);
        let record = provider(&config_for(Some(&server.uri())), &clock)
            .get_fortune_structured()
            .await;
        assert_eq!(record, fallback::generate(march_fifth()));
    }

    #[tokio::test]
    async fn unreachable_upstream_falls_back_after_retries() {
        let clock = ManualClock::on(2024, 3, 5);
        let config = Config {
            tianapi_key: Some("test-key".to_string()),
            ..config_for(None)
        };
        let record = provider(&config, &clock).get_fortune_structured().await;
        assert_eq!(record, fallback::generate(march_fifth()));
    }

    #[tokio::test]
    async fn text_follows_template_for_upstream_record() {
        let server = MockServer::start().await;
        mount_success(&server, 1).await;

        let clock = ManualClock::on(2024, 3, 5);
        let provider = provider(&config_for(Some(&server.uri())), &clock);

        let text = provider.get_fortune_text().await;
        assert_eq!(text, "📅 农历正月廿五\n✅ 宜：X\n❌ 忌：Y");

        // Both the text and the record behind it are cached.
        assert_eq!(provider.get_fortune_text().await, text);
        assert_eq!(provider.get_fortune_structured().await.fortune_info.fitness, "X");
    }

    #[tokio::test]
    async fn text_follows_template_for_generated_record() {
        let clock = ManualClock::on(2024, 3, 5);
        let provider = provider(&config_for(None), &clock);

        let record = fallback::generate(march_fifth());
        let expected = format!(
            "📅 {}\n✅ 宜：{}\n❌ 忌：{}",
            record.date_info.lunar_formatted, record.fortune_info.fitness, record.fortune_info.taboo
        );
        assert_eq!(provider.get_fortune_text().await, expected);
    }

    #[tokio::test]
    async fn empty_upstream_record_still_uses_template() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lunar/index"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"code": 200, "result": {}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let clock = ManualClock::on(2024, 3, 5);
        let provider = provider(&config_for(Some(&server.uri())), &clock);

        // Partial data is kept as-is in the structured shape.
        let record = provider.get_fortune_structured().await;
        assert_eq!(record.fortune_info.fitness, "");
        assert_eq!(record.date_info.gregorian_date, "2024-03-05");

        let text = provider.get_fortune_text().await;
        assert_eq!(text, "📅 \n✅ 宜：\n❌ 忌：");
        assert!(!CANNED_TEXTS.contains(&text.as_str()));
        assert_eq!(provider.get_fortune_text().await, text);
    }

    #[test]
    fn upstream_record_never_becomes_canned_text() {
        let record = FortuneRecord::default();
        assert_eq!(
            compose_text(&record, RecordSource::Upstream),
            "📅 \n✅ 宜：\n❌ 忌："
        );
    }

    #[test]
    fn blank_generated_record_becomes_canned_text() {
        let text = compose_text(&FortuneRecord::default(), RecordSource::Generated);
        assert!(CANNED_TEXTS.contains(&text.as_str()));
    }

    #[test]
    fn generated_record_renders_template() {
        let record = fallback::generate(march_fifth());
        assert_eq!(
            compose_text(&record, RecordSource::Generated),
            render_text(&record)
        );
    }

    #[test]
    fn resolve_tags_the_source() {
        let (_, source) = resolve(march_fifth(), Ok(FortuneRecord::default()));
        assert_eq!(source, RecordSource::Upstream);

        let (record, source) = resolve(march_fifth(), Err(FetchError::Status(502)));
        assert_eq!(source, RecordSource::Generated);
        assert_eq!(record, fallback::generate(march_fifth()));
    }

    #[tokio::test]
    async fn new_day_gets_a_new_entry() {
        let clock = ManualClock::on(2024, 3, 5);
        let provider = provider(&config_for(None), &clock);

        let today = provider.get_fortune_structured().await;
        clock.advance(chrono::Duration::days(1));
        let tomorrow = provider.get_fortune_structured().await;

        assert_eq!(today.date_info.gregorian_date, "2024-03-05");
        assert_eq!(tomorrow.date_info.gregorian_date, "2024-03-06");
    }
}
