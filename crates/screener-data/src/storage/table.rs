//! CSV 리포트 테이블 저장소.
//!
//! 모든 테이블은 헤더 행을 가지며, 행이 없어도 헤더는 기록됩니다.
//! 쓰기는 같은 디렉토리의 임시 파일에 기록한 뒤 rename하므로
//! 실패한 쓰기가 기존 테이블을 부분적으로 덮어쓰지 않습니다.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use screener_core::{
    FundamentalRow, NewsDetailRow, PolicyBenefitSummary, PolicyEvidenceRow, RankedFundamentalRow,
    SymbolSentimentSummary,
};

use crate::error::{DataError, Result};

/// 컬럼 구성이 고정된 테이블 행.
pub trait TableRow: Serialize {
    /// 헤더 컬럼 (직렬화 필드 순서와 동일)
    const COLUMNS: &'static [&'static str];
}

impl TableRow for NewsDetailRow {
    const COLUMNS: &'static [&'static str] = &[
        "symbol",
        "title",
        "link",
        "published",
        "source",
        "sentiment_label",
        "sentiment_score",
    ];
}

impl TableRow for SymbolSentimentSummary {
    const COLUMNS: &'static [&'static str] = &[
        "symbol",
        "news_count",
        "positive_count",
        "neutral_count",
        "negative_count",
        "avg_sentiment",
        "top_links",
        "vibe",
    ];
}

impl TableRow for PolicyEvidenceRow {
    const COLUMNS: &'static [&'static str] = &[
        "symbol",
        "published",
        "title",
        "link",
        "source",
        "sentiment_score",
        "matched_categories",
        "policy_row_score",
    ];
}

impl TableRow for PolicyBenefitSummary {
    const COLUMNS: &'static [&'static str] = &[
        "symbol",
        "scheme_mentions",
        "avg_scheme_sentiment",
        "policy_benefit_score",
        "matched_categories",
        "top_links",
        "benefit_bucket",
    ];
}

const FUNDAMENTAL_COLUMNS: &[&str] = &[
    "symbol",
    "yahoo_ticker",
    "company_name",
    "industry",
    "sector",
    "trailing_pe",
    "forward_pe",
    "peg_ratio",
    "price_to_book",
    "debt_to_equity",
    "return_on_equity",
    "return_on_assets",
    "profit_margins",
    "market_cap",
    "promoter_holding_proxy_pct",
];

impl TableRow for FundamentalRow {
    const COLUMNS: &'static [&'static str] = FUNDAMENTAL_COLUMNS;
}

impl TableRow for RankedFundamentalRow {
    const COLUMNS: &'static [&'static str] = &[
        "symbol",
        "yahoo_ticker",
        "company_name",
        "industry",
        "sector",
        "trailing_pe",
        "forward_pe",
        "peg_ratio",
        "price_to_book",
        "debt_to_equity",
        "return_on_equity",
        "return_on_assets",
        "profit_margins",
        "market_cap",
        "promoter_holding_proxy_pct",
        "industry_median_pe",
        "pe_assessment",
        "company_news_sentiment",
        "ceo_commentary_sentiment",
        "score",
        "reason_summary",
        "return_potential_flag",
    ];
}

/// 저장 모드.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistMode {
    /// 새 결과를 항상 기록 (비어 있어도)
    Overwrite,
    /// 새 결과가 비었고 기존 테이블이 비어 있지 않으면 기존 테이블 유지
    PreserveNonEmpty,
}

impl PersistMode {
    /// `force_refresh` 플래그에서 모드 결정.
    pub fn from_force_refresh(force_refresh: bool) -> Self {
        if force_refresh {
            Self::Overwrite
        } else {
            Self::PreserveNonEmpty
        }
    }
}

/// 테이블 쓰기 (헤더 포함, 원자적 교체).
pub fn write_table<T: TableRow>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| DataError::io(parent, e))?;
    }

    let tmp = temp_sibling(path);
    if let Err(e) = write_rows(&tmp, rows) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    fs::rename(&tmp, path).map_err(|e| DataError::io(path, e))?;

    debug!(path = %path.display(), rows = rows.len(), "테이블 저장 완료");
    Ok(())
}

fn write_rows<T: TableRow>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(T::COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| DataError::io(path, e))?;
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// 테이블 읽기.
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// 기존 테이블이 존재하고, 파싱 가능하며, 행이 있을 때만 반환.
pub fn existing_non_empty<T: DeserializeOwned>(path: &Path) -> Option<Vec<T>> {
    if !path.exists() {
        return None;
    }
    match read_table(path) {
        Ok(rows) if !rows.is_empty() => Some(rows),
        Ok(_) => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "기존 테이블 파싱 실패, 무시");
            None
        }
    }
}

/// 저장 모드에 따라 테이블을 기록하고 실제로 유효한 테이블을 반환.
///
/// `PreserveNonEmpty` 모드에서 새 결과가 비어 있으면 기존 테이블을 그대로 두고
/// 기존 행을 반환합니다. 기존 테이블이 없거나 비었거나 파싱할 수 없으면
/// 빈 테이블을 기록합니다.
pub fn write_output<T>(path: &Path, fresh: Vec<T>, mode: PersistMode) -> Result<Vec<T>>
where
    T: TableRow + DeserializeOwned,
{
    if mode == PersistMode::PreserveNonEmpty && fresh.is_empty() {
        if let Some(existing) = existing_non_empty::<T>(path) {
            info!(
                path = %path.display(),
                rows = existing.len(),
                "새 결과가 비어 있어 기존 테이블 유지"
            );
            return Ok(existing);
        }
    }

    write_table(path, &fresh)?;
    Ok(fresh)
}

/// CSV 헤더에 필수 컬럼이 모두 있는지 확인.
pub fn require_columns(path: &Path, headers: &csv::StringRecord, required: &[&str]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h.trim() == **col))
        .map(|col| col.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        })
    }
}
