//! 유니버스 CSV 로더.

use std::path::Path;
use tracing::info;

use screener_core::{Universe, UniverseEntry};

use crate::error::{DataError, Result};
use crate::storage::table::require_columns;

/// 유니버스 필수 컬럼.
pub const UNIVERSE_REQUIRED_COLUMNS: &[&str] = &["symbol", "company_name"];

/// 유니버스 CSV 로드.
///
/// 필수 컬럼(`symbol`, `company_name`)이 없으면 에러입니다. `ceo_name`은 선택입니다.
/// 빈 심볼/회사명 행은 제외하고, 중복 심볼은 처음 항목만 유지한 뒤 앞에서부터
/// `max_companies`개를 남깁니다.
pub fn load_universe(path: &Path, max_companies: Option<usize>) -> Result<Universe> {
    if !path.exists() {
        return Err(DataError::SourceNotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    require_columns(path, &headers, UNIVERSE_REQUIRED_COLUMNS)?;

    let position = |name: &str| headers.iter().position(|h| h.trim() == name);
    let symbol_idx = position("symbol");
    let company_idx = position("company_name");
    let ceo_idx = position("ceo_name");

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");
        entries.push(
            UniverseEntry::new(field(symbol_idx), field(company_idx)).with_ceo(field(ceo_idx)),
        );
    }

    let universe = Universe::from_entries(entries).truncated(max_companies);
    info!(path = %path.display(), symbols = universe.len(), "유니버스 로드 완료");
    Ok(universe)
}
