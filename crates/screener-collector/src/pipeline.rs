//! 파이프라인 실행 컨텍스트.
//!
//! 설정, 대상 심볼, 데이터 Provider, 감성 분석기를 한 번 생성해 각 리포트 단계에
//! 명시적으로 전달합니다.

use screener_analytics::{PolicyReport, SentimentScorer};
use screener_core::AppConfig;
use screener_data::{FundamentalSource, GoogleNewsClient, NewsSource, YahooFundamentalClient};

use crate::error::Result;
use crate::modules::{self, FundamentalsReport, NewsReport};

/// 리포트 단계 실행 컨텍스트.
pub struct Pipeline {
    config: AppConfig,
    symbols: Vec<String>,
    news_source: Box<dyn NewsSource>,
    fundamental_source: Box<dyn FundamentalSource>,
    scorer: SentimentScorer,
}

impl Pipeline {
    /// 설정의 Provider(Google News, Yahoo Finance)로 컨텍스트 생성.
    pub fn from_config(config: AppConfig, symbols: Vec<String>) -> Result<Self> {
        let news_source = GoogleNewsClient::new(&config.providers)?;
        let fundamental_source = YahooFundamentalClient::new(&config.providers)?;
        Ok(Self::with_sources(
            config,
            symbols,
            Box::new(news_source),
            Box::new(fundamental_source),
        ))
    }

    /// 주어진 Provider로 컨텍스트 생성.
    pub fn with_sources(
        config: AppConfig,
        symbols: Vec<String>,
        news_source: Box<dyn NewsSource>,
        fundamental_source: Box<dyn FundamentalSource>,
    ) -> Self {
        Self {
            config,
            symbols,
            news_source,
            fundamental_source,
            scorer: SentimentScorer::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 회사 뉴스 / CEO 코멘터리 감성 리포트.
    pub async fn news_report(&self) -> Result<NewsReport> {
        let universe = modules::resolve_news_universe(&self.config.news, &self.symbols)?;
        modules::run_news_report(
            &self.config.news,
            &universe,
            self.news_source.as_ref(),
            &self.scorer,
        )
        .await
    }

    /// 정책/스킴 수혜 리포트.
    pub fn policy_report(&self) -> Result<PolicyReport> {
        modules::run_policy_report(&self.config.policy)
    }

    /// 펀더멘털 랭킹 리포트.
    pub async fn fundamentals_report(&self) -> Result<FundamentalsReport> {
        let universe =
            modules::resolve_fundamentals_universe(&self.config.fundamentals, &self.symbols)?;
        modules::run_fundamentals_report(
            &self.config.fundamentals,
            &universe,
            self.fundamental_source.as_ref(),
        )
        .await
    }
}

/// 쉼표로 구분된 심볼 목록 파싱 (빈 항목 제외).
pub fn parse_symbol_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
