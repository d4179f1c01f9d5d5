//! Yahoo Finance 펀더멘털 클라이언트.
//!
//! quoteSummary API로 밸류에이션·수익성·지분 지표를 수집합니다.
//! Yahoo는 세션 쿠키와 crumb 토큰을 요구하므로, 첫 요청 시 쿠키를 발급받고
//! crumb을 조회해 캐시합니다. 401 응답을 받으면 crumb을 폐기하고 다음 요청에서 재발급합니다.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use screener_core::num::finite;
use screener_core::ProviderConfig;

use super::{FundamentalSnapshot, FundamentalSource};
use crate::error::{DataError, Result};

/// quoteSummary 조회 모듈.
const QUOTE_SUMMARY_MODULES: &str =
    "assetProfile,summaryDetail,defaultKeyStatistics,financialData,price";

/// Yahoo Finance quoteSummary 클라이언트.
pub struct YahooFundamentalClient {
    client: Client,
    base_url: String,
    cookie_url: String,
    crumb: RwLock<Option<String>>,
}

impl YahooFundamentalClient {
    /// Provider 설정으로 생성.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            base_url: config.yahoo_base_url.trim_end_matches('/').to_string(),
            cookie_url: config.yahoo_cookie_url.clone(),
            crumb: RwLock::new(None),
        })
    }

    /// 캐시된 crumb 반환 (없으면 발급).
    async fn crumb(&self) -> Result<String> {
        if let Some(crumb) = self.crumb.read().await.as_ref() {
            return Ok(crumb.clone());
        }

        let mut guard = self.crumb.write().await;
        if let Some(crumb) = guard.as_ref() {
            return Ok(crumb.clone());
        }

        // 쿠키 발급 페이지는 404를 반환해도 세션 쿠키를 설정합니다.
        if let Err(e) = self.client.get(&self.cookie_url).send().await {
            warn!(error = %e, "Yahoo 쿠키 발급 요청 실패");
        }

        let response = self
            .client
            .get(format!("{}/v1/test/getcrumb", self.base_url))
            .send()
            .await?;
        let status = response.status();
        let crumb = response.text().await?.trim().to_string();

        if !status.is_success() || crumb.is_empty() {
            return Err(DataError::FetchError(format!(
                "Yahoo crumb 발급 실패: {}",
                status
            )));
        }

        debug!("Yahoo crumb 발급 완료");
        *guard = Some(crumb.clone());
        Ok(crumb)
    }

    async fn invalidate_crumb(&self) {
        *self.crumb.write().await = None;
    }
}

#[async_trait]
impl FundamentalSource for YahooFundamentalClient {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    async fn fetch_snapshot(&self, ticker: &str) -> Result<Option<FundamentalSnapshot>> {
        let crumb = self.crumb().await?;

        let response = self
            .client
            .get(format!(
                "{}/v10/finance/quoteSummary/{}",
                self.base_url, ticker
            ))
            .query(&[("modules", QUOTE_SUMMARY_MODULES), ("crumb", crumb.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.invalidate_crumb().await;
            return Err(DataError::FetchError(format!(
                "Yahoo 인증 만료 ({})",
                ticker
            )));
        }
        if !status.is_success() {
            return Err(DataError::FetchError(format!(
                "Yahoo quoteSummary 응답 오류 ({}): {}",
                ticker, status
            )));
        }

        let body: Value = response.json().await?;
        Ok(parse_quote_summary(&body))
    }
}

/// quoteSummary 응답에서 펀더멘털 값 추출.
///
/// 결과가 없으면 `None`을 반환합니다. 각 값은 `{"raw": ..., "fmt": ...}` 객체 또는
/// 숫자일 수 있으며, 숫자가 아니거나 비유한값이면 없음으로 처리합니다.
pub fn parse_quote_summary(body: &Value) -> Option<FundamentalSnapshot> {
    let result = body
        .get("quoteSummary")?
        .get("result")?
        .as_array()?
        .first()?;

    let profile = module(result, "assetProfile");
    let detail = module(result, "summaryDetail");
    let stats = module(result, "defaultKeyStatistics");
    let financial = module(result, "financialData");
    let price = module(result, "price");

    Some(FundamentalSnapshot {
        industry: text(profile, "industry"),
        sector: text(profile, "sector"),
        trailing_pe: raw(detail, "trailingPE"),
        forward_pe: raw(detail, "forwardPE").or_else(|| raw(stats, "forwardPE")),
        peg_ratio: raw(stats, "pegRatio"),
        price_to_book: raw(stats, "priceToBook"),
        debt_to_equity: raw(financial, "debtToEquity"),
        return_on_equity: raw(financial, "returnOnEquity"),
        return_on_assets: raw(financial, "returnOnAssets"),
        profit_margins: raw(financial, "profitMargins").or_else(|| raw(stats, "profitMargins")),
        market_cap: raw(detail, "marketCap").or_else(|| raw(price, "marketCap")),
        trailing_eps: raw(stats, "trailingEps"),
        current_price: raw(financial, "currentPrice")
            .or_else(|| raw(price, "regularMarketPrice")),
        held_percent_insiders: raw(stats, "heldPercentInsiders"),
    })
}

fn module<'a>(result: &'a Value, name: &str) -> Option<&'a Value> {
    result.get(name).filter(|v| v.is_object())
}

fn raw(module: Option<&Value>, key: &str) -> Option<f64> {
    let value = module?.get(key)?;
    let number = match value {
        Value::Object(map) => map.get("raw")?.as_f64(),
        other => other.as_f64(),
    }?;
    finite(number)
}

fn text(module: Option<&Value>, key: &str) -> Option<String> {
    module?
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
