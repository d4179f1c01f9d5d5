//! Collector 에러 타입.

use thiserror::Error;

use screener_core::CoreError;
use screener_data::DataError;

/// Collector 에러.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// 설정 에러
    #[error("Config error: {0}")]
    Config(#[from] CoreError),

    /// 데이터 소스/저장소 에러
    #[error("Data error: {0}")]
    Data(#[from] DataError),
}

/// Collector Result 타입.
pub type Result<T> = std::result::Result<T, CollectorError>;
