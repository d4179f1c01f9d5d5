//! 펀더멘털 raw 테이블 캐시.
//!
//! 이전 실행에서 저장한 raw 테이블과 이번 실행의 수집 결과를 심볼 기준으로 병합합니다.
//! 같은 심볼은 새 수집 결과가 우선합니다.

use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use screener_core::{normalize_symbol, FundamentalRow, Universe};

use crate::storage::table::existing_non_empty;

/// 캐시와 새 결과를 심볼 기준으로 병합 (새 결과 우선).
///
/// 캐시 행을 먼저 맵에 넣은 뒤 새 행으로 덮어씁니다. 결과는 심볼 순으로 정렬됩니다.
pub fn merge_latest_wins(cached: Vec<FundamentalRow>, fresh: Vec<FundamentalRow>) -> Vec<FundamentalRow> {
    let mut by_symbol: BTreeMap<String, FundamentalRow> = BTreeMap::new();

    for mut row in cached.into_iter().chain(fresh) {
        row.symbol = normalize_symbol(&row.symbol);
        if row.symbol.is_empty() {
            continue;
        }
        by_symbol.insert(row.symbol.clone(), row);
    }

    by_symbol.into_values().collect()
}

/// 유니버스 기준 left join.
///
/// 유니버스 순서대로 한 심볼당 한 행을 만들며, 데이터가 없는 심볼은 수치 필드가 모두 빈
/// 행이 됩니다. 회사명은 유니버스 값을 사용합니다.
pub fn left_join_universe(universe: &Universe, rows: Vec<FundamentalRow>) -> Vec<FundamentalRow> {
    let mut by_symbol: BTreeMap<String, FundamentalRow> = rows
        .into_iter()
        .map(|row| (normalize_symbol(&row.symbol), row))
        .collect();

    universe
        .iter()
        .map(|entry| match by_symbol.remove(&entry.symbol) {
            Some(row) => FundamentalRow {
                symbol: entry.symbol.clone(),
                yahoo_ticker: entry.yahoo_ticker(),
                company_name: entry.company_name.clone(),
                ..row
            },
            None => FundamentalRow::empty(entry),
        })
        .collect()
}

/// 새 수집 결과를 raw 테이블 캐시와 병합하고 유니버스에 맞춥니다.
///
/// `use_cache`가 false이면 새 결과만 사용합니다. 캐시 파일이 없거나 읽을 수 없으면
/// 새 결과만 사용합니다.
pub fn merge_with_cache(
    universe: &Universe,
    fresh: Vec<FundamentalRow>,
    raw_path: &Path,
    use_cache: bool,
) -> Vec<FundamentalRow> {
    let merged = if use_cache {
        match existing_non_empty::<FundamentalRow>(raw_path) {
            Some(cached) => {
                info!(
                    path = %raw_path.display(),
                    cached = cached.len(),
                    fresh = fresh.len(),
                    "펀더멘털 캐시 병합"
                );
                merge_latest_wins(cached, fresh)
            }
            None => {
                debug!(path = %raw_path.display(), "펀더멘털 캐시 없음");
                fresh
            }
        }
    } else {
        fresh
    };

    left_join_universe(universe, merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use screener_core::UniverseEntry;

    fn row(symbol: &str, pe: Option<f64>) -> FundamentalRow {
        FundamentalRow {
            symbol: symbol.to_string(),
            yahoo_ticker: format!("{}.NS", symbol),
            company_name: format!("{} Ltd", symbol),
            trailing_pe: pe,
            ..Default::default()
        }
    }

    #[test]
    fn test_fresh_overrides_cached() {
        let cached = vec![row("AAA", Some(10.0)), row("BBB", Some(20.0))];
        let fresh = vec![row("aaa ", Some(12.0))];

        let merged = merge_latest_wins(cached, fresh);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].symbol, "AAA");
        assert_eq!(merged[0].trailing_pe, Some(12.0));
        assert_eq!(merged[1].trailing_pe, Some(20.0));
    }

    #[test]
    fn test_left_join_fills_missing_symbols() {
        let universe = Universe::from_entries(vec![
            UniverseEntry::new("BBB", "Beta Corp"),
            UniverseEntry::new("AAA", "Alpha Co"),
        ]);
        let rows = vec![row("AAA", Some(18.0)), row("ZZZ", Some(5.0))];

        let joined = left_join_universe(&universe, rows);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0], FundamentalRow::empty(&universe.entries()[0]));
        assert_eq!(joined[1].symbol, "AAA");
        assert_eq!(joined[1].company_name, "Alpha Co");
        assert_eq!(joined[1].trailing_pe, Some(18.0));
    }

    fn arb_rows() -> impl Strategy<Value = Vec<FundamentalRow>> {
        proptest::collection::vec(
            ("[A-E]{1,3}", proptest::option::of(-50.0f64..200.0)),
            0..12,
        )
        .prop_map(|items| items.into_iter().map(|(s, pe)| row(&s, pe)).collect())
    }

    proptest! {
        #[test]
        fn prop_merge_with_self_is_idempotent(rows in arb_rows()) {
            let once = merge_latest_wins(Vec::new(), rows);
            let twice = merge_latest_wins(once.clone(), once.clone());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_merge_has_unique_symbols(cached in arb_rows(), fresh in arb_rows()) {
            let merged = merge_latest_wins(cached, fresh);
            let mut symbols: Vec<&str> = merged.iter().map(|r| r.symbol.as_str()).collect();
            let before = symbols.len();
            symbols.dedup();
            prop_assert_eq!(before, symbols.len());
        }
    }
}
