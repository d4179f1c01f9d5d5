//! 파일 기반 저장소.
//!
//! - `table`: 헤더가 고정된 CSV 리포트 테이블 읽기/쓰기
//! - `universe`: 유니버스 CSV 로더
//! - `reports`: 이전 단계 리포트 입력 로더

pub mod reports;
pub mod table;
pub mod universe;

pub use reports::{load_policy_source, load_sentiment_averages, POLICY_SOURCE_COLUMNS};
pub use table::{
    existing_non_empty, read_table, require_columns, write_output, write_table, PersistMode,
    TableRow,
};
pub use universe::{load_universe, UNIVERSE_REQUIRED_COLUMNS};
