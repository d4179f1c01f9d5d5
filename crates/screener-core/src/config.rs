//! 설정 관리.
//!
//! TOML 설정 파일을 읽고 `SCREENER__` 접두사 환경 변수로 덮어씁니다.
//! 모든 항목은 기본값을 가지므로 일부 섹션만 지정해도 됩니다.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::policy::Keywords;
use crate::domain::universe::UniverseEntry;
use crate::error::Result;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 뉴스 감성 리포트 설정
    pub news: NewsConfig,
    /// 정책 수혜 리포트 설정
    pub policy: PolicyConfig,
    /// 펀더멘털 랭킹 리포트 설정
    pub fundamentals: FundamentalsConfig,
    /// 외부 데이터 소스 설정
    pub providers: ProviderConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 데몬 모드 설정
    pub daemon: DaemonConfig,
}

/// 뉴스 감성 리포트 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsConfig {
    /// 유니버스 CSV 경로
    pub universe_csv: PathBuf,
    /// 인라인 종목 목록 (지정 시 CSV보다 우선)
    pub companies: Option<Vec<UniverseEntry>>,
    /// 최대 종목 수
    pub max_companies: Option<usize>,
    /// 조회 기간 (일)
    pub lookback_days: u32,
    /// 종목당 최대 뉴스 수
    pub limit_per_company: usize,
    /// 병렬 작업 수 (1~32로 제한)
    pub max_workers: usize,
    /// true면 항상 덮어쓰기, false면 새 결과가 비었을 때 기존 리포트 유지
    pub force_refresh: bool,
    /// 출력 경로
    pub outputs: NewsOutputs,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            universe_csv: PathBuf::from("data/universe/nse_universe.csv"),
            companies: None,
            max_companies: None,
            lookback_days: 30,
            limit_per_company: 10,
            max_workers: 12,
            force_refresh: true,
            outputs: NewsOutputs::default(),
        }
    }
}

/// 뉴스 리포트 출력 경로.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsOutputs {
    pub company_details_csv: PathBuf,
    pub company_summary_csv: PathBuf,
    pub ceo_details_csv: PathBuf,
    pub ceo_summary_csv: PathBuf,
}

impl Default for NewsOutputs {
    fn default() -> Self {
        Self {
            company_details_csv: PathBuf::from(
                "data/processed/company_news_sentiment_details_30d.csv",
            ),
            company_summary_csv: PathBuf::from(
                "data/processed/company_news_sentiment_summary_30d.csv",
            ),
            ceo_details_csv: PathBuf::from(
                "data/processed/ceo_commentary_sentiment_details_30d.csv",
            ),
            ceo_summary_csv: PathBuf::from(
                "data/processed/ceo_commentary_sentiment_summary_30d.csv",
            ),
        }
    }
}

/// 정책 수혜 리포트 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// 입력 뉴스 상세 CSV (회사 뉴스 상세 리포트)
    pub source_details_csv: PathBuf,
    /// 카테고리 → 키워드 목록 (없으면 기본 카테고리 사용)
    pub keywords: Option<serde_json::Value>,
    /// 출력 경로
    pub outputs: PolicyOutputs,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            source_details_csv: NewsOutputs::default().company_details_csv,
            keywords: None,
            outputs: PolicyOutputs::default(),
        }
    }
}

impl PolicyConfig {
    /// 키워드 설정 결정 (형식 오류는 에러로 보고).
    pub fn resolve_keywords(&self) -> Result<Keywords> {
        Keywords::resolve(self.keywords.as_ref())
    }
}

/// 정책 리포트 출력 경로.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyOutputs {
    pub summary_csv: PathBuf,
    pub evidence_csv: PathBuf,
}

impl Default for PolicyOutputs {
    fn default() -> Self {
        Self {
            summary_csv: PathBuf::from("data/processed/policy_beneficiary_stocks.csv"),
            evidence_csv: PathBuf::from("data/processed/policy_beneficiary_evidence.csv"),
        }
    }
}

/// 펀더멘털 랭킹 리포트 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FundamentalsConfig {
    /// 유니버스 CSV 경로
    pub universe_csv: PathBuf,
    /// 최대 종목 수
    pub max_companies: Option<usize>,
    /// 병렬 작업 수 (1~32로 제한)
    pub max_workers: usize,
    /// 종목당 재시도 횟수 (첫 시도 제외)
    pub retries: u32,
    /// 재시도 기본 딜레이 (밀리초, 시도마다 배수로 증가)
    pub retry_delay_ms: u64,
    /// 기존 raw 테이블과 병합 여부
    pub use_cache: bool,
    /// 상위 종목 리포트 크기
    pub top_n: usize,
    /// 회사 뉴스 감성 요약 CSV
    pub company_sentiment_csv: PathBuf,
    /// CEO 발언 감성 요약 CSV
    pub ceo_sentiment_csv: PathBuf,
    /// 출력 경로
    pub outputs: FundamentalsOutputs,
}

impl Default for FundamentalsConfig {
    fn default() -> Self {
        let news = NewsOutputs::default();
        Self {
            universe_csv: PathBuf::from("data/universe/nse_universe.csv"),
            max_companies: None,
            max_workers: 16,
            retries: 2,
            retry_delay_ms: 150,
            use_cache: false,
            top_n: 50,
            company_sentiment_csv: news.company_summary_csv,
            ceo_sentiment_csv: news.ceo_summary_csv,
            outputs: FundamentalsOutputs::default(),
        }
    }
}

impl FundamentalsConfig {
    /// 재시도 기본 딜레이를 Duration으로 반환
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// 펀더멘털 리포트 출력 경로.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FundamentalsOutputs {
    pub raw_fundamentals_csv: PathBuf,
    pub ranked_report_csv: PathBuf,
    pub top_picks_csv: PathBuf,
}

impl Default for FundamentalsOutputs {
    fn default() -> Self {
        Self {
            raw_fundamentals_csv: PathBuf::from("data/processed/fundamentals_raw.csv"),
            ranked_report_csv: PathBuf::from("data/processed/fundamentals_ranked_report.csv"),
            top_picks_csv: PathBuf::from("data/processed/fundamentals_top_picks.csv"),
        }
    }
}

/// 외부 데이터 소스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Google News RSS 검색 URL
    pub google_news_url: String,
    /// Yahoo Finance API 기본 URL
    pub yahoo_base_url: String,
    /// Yahoo 세션 쿠키 발급 URL
    pub yahoo_cookie_url: String,
    /// HTTP 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
    /// HTTP User-Agent
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            google_news_url: "https://news.google.com/rss/search".to_string(),
            yahoo_base_url: "https://query2.finance.yahoo.com".to_string(),
            yahoo_cookie_url: "https://fc.yahoo.com".to_string(),
            request_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl ProviderConfig {
    /// 요청 타임아웃을 Duration으로 반환
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 데몬 모드 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// 워크플로우 실행 주기 (분 단위)
    pub interval_minutes: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 60,
        }
    }
}

impl DaemonConfig {
    /// 워크플로우 실행 주기를 Duration으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes * 60)
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        dotenvy::dotenv().ok();

        let builder = ::config::Config::builder()
            // 파일에서 로드
            .add_source(::config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                ::config::Environment::with_prefix("SCREENER")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self> {
        Self::load("config/default.toml")
    }

    /// TOML 문자열에서 설정을 로드합니다 (환경 변수 미적용).
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config = ::config::Config::builder()
            .add_source(::config::File::from_str(content, ::config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
