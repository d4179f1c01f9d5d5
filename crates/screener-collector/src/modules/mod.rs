//! 리포트 생성 모듈.

pub mod fundamentals_report;
pub mod news_report;
pub mod policy_report;

pub use fundamentals_report::{
    resolve_fundamentals_universe, run_fundamentals_report, FundamentalsReport,
};
pub use news_report::{
    build_queries, ceo_query, company_query, resolve_news_universe, run_news_report,
    NewsKindReport, NewsReport,
};
pub use policy_report::run_policy_report;
