//! 감성 분석, 정책 수혜 분석, 펀더멘털 랭킹.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 헤드라인 감성 점수 (VADER)
//! - 심볼별 뉴스 감성 집계
//! - 정책 키워드 매칭과 수혜 점수
//! - 업종 대비 밸류에이션 기반 펀더멘털 점수와 랭킹
//!
//! 모든 함수는 순수 계산이며 I/O는 `screener-data`가 담당합니다.

pub mod fundamental_scorer;
pub mod news_summary;
pub mod policy;
pub mod sentiment;

pub use fundamental_scorer::{
    industry_median_pe, rank, score_row, top_n, RankingInputs, ScoreBreakdown, MAX_REASONS,
};
pub use news_summary::{score_items, summarize};
pub use policy::{build_policy_report, policy_row_score, KeywordMatcher, PolicyReport};
pub use sentiment::SentimentScorer;
