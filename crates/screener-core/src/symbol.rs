//! 심볼 정규화.
//!
//! 심볼은 모든 테이블의 조인 키이므로 병합 전에 항상 이 모듈을 거칩니다.

/// NSE 상장 종목의 Yahoo Finance 접미사.
pub const NSE_SUFFIX: &str = ".NS";

/// 심볼 정규화 (앞뒤 공백 제거 + 대문자 변환).
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Yahoo Finance 티커 생성 (예: RELIANCE → RELIANCE.NS).
pub fn yahoo_ticker(symbol: &str) -> String {
    format!("{}{}", normalize_symbol(symbol), NSE_SUFFIX)
}
