//! 데이터 소스 및 저장소.
//!
//! 이 crate는 다음을 제공합니다:
//! - Google News RSS 및 Yahoo Finance Provider
//! - 재시도를 포함한 펀더멘털 수집
//! - 헤더가 고정된 CSV 리포트 테이블 저장 (원자적 교체, 기존 리포트 보존 모드)
//! - 펀더멘털 raw 테이블 캐시 병합

pub mod cache;
pub mod error;
pub mod provider;
pub mod retry;
pub mod storage;

pub use error::{DataError, Result};

pub use cache::{left_join_universe, merge_latest_wins, merge_with_cache};
pub use provider::{
    FundamentalSnapshot, FundamentalSource, GoogleNewsClient, NewsQuery, NewsSource,
    YahooFundamentalClient,
};
pub use retry::{fetch_fundamental_with_retry, RetryPolicy};
pub use storage::{
    load_policy_source, load_sentiment_averages, load_universe, read_table, write_output,
    write_table, PersistMode, TableRow,
};
