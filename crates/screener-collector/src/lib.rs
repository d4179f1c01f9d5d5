//! NSE 시그널 스크리너 수집기.
//!
//! 세 개의 리포트 단계를 제공합니다:
//! - 회사 뉴스 / CEO 코멘터리 감성 리포트
//! - 정책/스킴 수혜 리포트 (회사 뉴스 상세 테이블 기반)
//! - 펀더멘털 랭킹 리포트 (뉴스 감성 요약 반영)
//!
//! 외부 조회는 `collector` 모듈의 동시성 제한 수집기로 실행되며, 개별 종목 실패는
//! 결과에서 제외될 뿐 단계 전체를 중단시키지 않습니다.

pub mod collector;
pub mod error;
pub mod modules;
pub mod pipeline;
pub mod stats;

pub use error::{CollectorError, Result};
pub use pipeline::{parse_symbol_list, Pipeline};
pub use stats::CollectionStats;
