//! 이전 단계 리포트 읽기.
//!
//! 정책 매칭은 회사 뉴스 상세 테이블을, 펀더멘털 랭킹은 감성 요약 테이블을 입력으로 씁니다.

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use screener_core::num::parse_finite;
use screener_core::{normalize_symbol, PolicySourceRow};

use crate::error::{DataError, Result};
use crate::storage::table::require_columns;

/// 정책 매칭 입력 필수 컬럼.
pub const POLICY_SOURCE_COLUMNS: &[&str] = &[
    "symbol",
    "title",
    "link",
    "published",
    "source",
    "sentiment_score",
];

/// 정책 매칭 입력 테이블 로드.
///
/// 파일이 없거나 필수 컬럼이 없으면 에러입니다.
/// 숫자가 아닌 `sentiment_score`는 0.0으로 처리합니다.
pub fn load_policy_source(path: &Path) -> Result<Vec<PolicySourceRow>> {
    if !path.exists() {
        return Err(DataError::SourceNotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    require_columns(path, &headers, POLICY_SOURCE_COLUMNS)?;

    let idx: Vec<Option<usize>> = POLICY_SOURCE_COLUMNS
        .iter()
        .map(|col| headers.iter().position(|h| h.trim() == *col))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let field = |i: usize| {
            idx[i]
                .and_then(|pos| record.get(pos))
                .unwrap_or("")
                .to_string()
        };
        rows.push(PolicySourceRow {
            symbol: normalize_symbol(&field(0)),
            title: field(1),
            link: field(2),
            published: field(3),
            source: field(4),
            sentiment_score: parse_finite(&field(5)).unwrap_or(0.0),
        });
    }

    debug!(path = %path.display(), rows = rows.len(), "정책 입력 테이블 로드");
    Ok(rows)
}

/// 감성 요약 테이블에서 심볼별 평균 감성 로드.
///
/// 파일이 없거나 `symbol`, `avg_sentiment` 컬럼이 없으면 빈 맵을 반환합니다.
pub fn load_sentiment_averages(path: &Path) -> HashMap<String, f64> {
    match read_sentiment_averages(path) {
        Ok(map) => map,
        Err(DataError::SourceNotFound(_)) => {
            debug!(path = %path.display(), "감성 요약 파일 없음");
            HashMap::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "감성 요약 로드 실패, 감성 없이 진행");
            HashMap::new()
        }
    }
}

fn read_sentiment_averages(path: &Path) -> Result<HashMap<String, f64>> {
    if !path.exists() {
        return Err(DataError::SourceNotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let headers = reader.headers()?.clone();
    require_columns(path, &headers, &["symbol", "avg_sentiment"])?;

    let symbol_idx = headers.iter().position(|h| h.trim() == "symbol");
    let avg_idx = headers.iter().position(|h| h.trim() == "avg_sentiment");

    let mut averages = HashMap::new();
    for record in reader.records() {
        let record = record?;
        let symbol = symbol_idx
            .and_then(|i| record.get(i))
            .map(normalize_symbol)
            .unwrap_or_default();
        let avg = avg_idx.and_then(|i| record.get(i)).and_then(parse_finite);
        if let (false, Some(avg)) = (symbol.is_empty(), avg) {
            averages.entry(symbol).or_insert(avg);
        }
    }
    Ok(averages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("screener-reports-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_policy_source_lenient_score() {
        let path = write_temp(
            "details.csv",
            "symbol,title,link,published,source,sentiment_label,sentiment_score\n\
             lt,L&T bags metro order,https://x,Mon,Mint,positive,0.3\n\
             NTPC,Solar push,https://y,Tue,ET,neutral,n/a\n",
        );

        let rows = load_policy_source(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].symbol, "LT");
        assert_eq!(rows[0].sentiment_score, 0.3);
        assert_eq!(rows[1].sentiment_score, 0.0);
    }

    #[test]
    fn test_policy_source_missing_columns_is_fatal() {
        let path = write_temp("details.csv", "symbol,title\nLT,metro\n");
        assert!(matches!(
            load_policy_source(&path),
            Err(DataError::MissingColumns { .. })
        ));

        let missing = std::env::temp_dir().join(format!("missing-{}.csv", uuid::Uuid::new_v4()));
        assert!(matches!(
            load_policy_source(&missing),
            Err(DataError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_sentiment_averages() {
        let path = write_temp(
            "summary.csv",
            "symbol,news_count,avg_sentiment\nTCS,3,0.25\nINFY,1,\nHAL,2,-0.1\n",
        );

        let averages = load_sentiment_averages(&path);
        assert_eq!(averages.len(), 2);
        assert_eq!(averages["TCS"], 0.25);
        assert_eq!(averages["HAL"], -0.1);
    }

    #[test]
    fn test_sentiment_averages_missing_inputs_are_empty() {
        let path = write_temp("summary.csv", "symbol,news_count\nTCS,3\n");
        assert!(load_sentiment_averages(&path).is_empty());

        let missing = std::env::temp_dir().join(format!("missing-{}.csv", uuid::Uuid::new_v4()));
        assert!(load_sentiment_averages(&missing).is_empty());
    }
}
