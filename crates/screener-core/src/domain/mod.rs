//! 도메인 모델.
//!
//! 파이프라인 단계 간에 주고받는 레코드 타입을 정의합니다.
//! 모든 테이블의 조인 키는 정규화된 심볼입니다.

pub mod fundamental;
pub mod news;
pub mod policy;
pub mod universe;

pub use fundamental::{
    FundamentalRow, PeAssessment, RankedFundamentalRow, ReturnPotentialFlag,
    HIGH_POTENTIAL_MIN_SCORE, WATCHLIST_MIN_SCORE,
};
pub use news::{
    join_top_links, NewsDetailRow, NewsItem, NewsKind, SentimentLabel, SentimentResult,
    SymbolSentimentSummary, Vibe, NEGATIVE_THRESHOLD, POSITIVE_THRESHOLD, TOP_LINKS_LIMIT,
};
pub use policy::{
    BenefitBucket, Keywords, PolicyBenefitSummary, PolicyEvidenceRow, PolicySourceRow,
};
pub use universe::{Universe, UniverseEntry};
