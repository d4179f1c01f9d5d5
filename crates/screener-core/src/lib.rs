//! # Screener Core
//!
//! NSE 종목 스크리너의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 파이프라인 전반에서 사용되는 기본 타입을 제공합니다:
//! - 유니버스(종목 목록) 및 심볼 정규화
//! - 뉴스/감성 분석 결과 타입
//! - 정책 수혜 분석 결과 타입
//! - 펀더멘털 및 랭킹 결과 타입
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod num;
pub mod symbol;

pub use self::config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use symbol::{normalize_symbol, yahoo_ticker};
