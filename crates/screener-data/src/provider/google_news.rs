//! Google News RSS 검색 클라이언트.
//!
//! 인도 에디션(`hl=en-IN&gl=IN&ceid=IN:en`) 검색 피드를 가져와 [`NewsItem`]으로 변환합니다.
//!
//! ## 사용 예시
//! ```rust,ignore
//! let client = GoogleNewsClient::new(&providers)?;
//! let items = client.fetch_news(&NewsQuery {
//!     symbol: "TCS".into(),
//!     query: "\"Tata Consultancy Services\" NSE stock".into(),
//!     lookback_days: 30,
//!     limit: 10,
//! }).await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::Client;
use tracing::debug;

use screener_core::{NewsItem, ProviderConfig};

use super::{NewsQuery, NewsSource};
use crate::error::{DataError, Result};

const RSS_ARTICLE_PATH: &str = "news.google.com/rss/articles/";
const ARTICLE_PATH: &str = "news.google.com/articles/";

/// Google News RSS 클라이언트.
pub struct GoogleNewsClient {
    client: Client,
    search_url: String,
}

impl GoogleNewsClient {
    /// Provider 설정으로 생성.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            search_url: config.google_news_url.clone(),
        })
    }

    /// 기간 제한(`when:<N>d`)이 포함된 검색어 생성.
    pub fn scoped_query(query: &str, lookback_days: u32) -> String {
        let query = query.trim();
        if query.contains("when:") {
            query.to_string()
        } else {
            format!("{} when:{}d", query, lookback_days)
        }
    }
}

#[async_trait]
impl NewsSource for GoogleNewsClient {
    fn name(&self) -> &str {
        "google_news"
    }

    async fn fetch_news(&self, query: &NewsQuery) -> Result<Vec<NewsItem>> {
        let q = Self::scoped_query(&query.query, query.lookback_days);

        let response = self
            .client
            .get(&self.search_url)
            .query(&[
                ("q", q.as_str()),
                ("hl", "en-IN"),
                ("gl", "IN"),
                ("ceid", "IN:en"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::FetchError(format!(
                "Google News 응답 오류 ({}): {}",
                query.symbol, status
            )));
        }

        let body = response.bytes().await?;
        let items = parse_feed(
            &query.symbol,
            &body,
            query.lookback_days,
            query.limit,
            Utc::now(),
        )?;

        debug!(
            symbol = %query.symbol,
            query = %q,
            items = items.len(),
            "뉴스 피드 수집"
        );
        Ok(items)
    }
}

/// RSS 피드 본문을 뉴스 항목으로 변환.
///
/// `now - lookback_days`보다 오래된 항목은 버리고, 날짜를 파싱할 수 없는 항목은 유지합니다.
/// 최대 `limit`개까지 피드 순서대로 반환합니다.
pub fn parse_feed(
    symbol: &str,
    body: &[u8],
    lookback_days: u32,
    limit: usize,
    now: DateTime<Utc>,
) -> Result<Vec<NewsItem>> {
    let channel = rss::Channel::read_from(body)
        .map_err(|e| DataError::ParseError(format!("RSS 파싱 실패 ({}): {}", symbol, e)))?;

    let cutoff = now - ChronoDuration::days(i64::from(lookback_days));

    let items = channel
        .items()
        .iter()
        .filter_map(|item| {
            let published = item.pub_date().unwrap_or_default().to_string();
            let published_at = parse_published(&published);
            if matches!(published_at, Some(at) if at < cutoff) {
                return None;
            }

            Some(NewsItem {
                symbol: symbol.to_string(),
                title: item.title().unwrap_or_default().to_string(),
                link: normalize_link(item.link().unwrap_or_default()),
                published,
                published_at,
                source: item
                    .source()
                    .and_then(|s| s.title())
                    .unwrap_or_default()
                    .to_string(),
            })
        })
        .take(limit)
        .collect();

    Ok(items)
}

/// RSS 전용 기사 경로를 직접 열 수 있는 경로로 변환.
pub fn normalize_link(raw: &str) -> String {
    let link = raw.trim();
    if link.contains(RSS_ARTICLE_PATH) {
        link.replacen(RSS_ARTICLE_PATH, ARTICLE_PATH, 1)
    } else {
        link.to_string()
    }
}

/// RFC 2822 타임스탬프를 UTC로 파싱.
fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
