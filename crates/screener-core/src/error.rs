//! 스크리너 공통 에러 타입.
//!
//! 설정 로드와 설정값 검증 과정에서 발생하는 에러를 정의합니다.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 파일/환경 변수 로드 에러
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// 정책 키워드 매핑 형식 오류
    #[error("Invalid keyword mapping: {0}")]
    InvalidKeywords(String),

    /// 설정값 검증 실패
    #[error("Validation error: {0}")]
    Validation(String),
}

/// 핵심 작업의 Result 타입.
pub type Result<T> = std::result::Result<T, CoreError>;
