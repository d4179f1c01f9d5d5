//! 캐시 모듈.
//!
//! 이전 실행의 raw 테이블을 재사용하는 병합 로직을 제공합니다.

pub mod fundamental;

pub use fundamental::{left_join_universe, merge_latest_wins, merge_with_cache};
