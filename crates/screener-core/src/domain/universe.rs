//! 유니버스(처리 대상 종목 목록).
//!
//! 실행마다 한 번 로드되며 실행 중에는 변경되지 않습니다.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::symbol::{normalize_symbol, yahoo_ticker};

/// 유니버스 항목.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseEntry {
    /// 심볼 (대문자, 공백 제거)
    pub symbol: String,
    /// 회사명
    pub company_name: String,
    /// CEO 이름 (선택)
    #[serde(default)]
    pub ceo_name: Option<String>,
}

impl UniverseEntry {
    /// 정규화된 항목 생성.
    pub fn new(symbol: &str, company_name: &str) -> Self {
        Self {
            symbol: normalize_symbol(symbol),
            company_name: company_name.trim().to_string(),
            ceo_name: None,
        }
    }

    /// CEO 이름 지정 (공백뿐이면 없음으로 처리).
    pub fn with_ceo(mut self, ceo_name: &str) -> Self {
        let ceo = ceo_name.trim();
        self.ceo_name = (!ceo.is_empty()).then(|| ceo.to_string());
        self
    }

    /// Yahoo Finance 조회용 티커.
    pub fn yahoo_ticker(&self) -> String {
        yahoo_ticker(&self.symbol)
    }

    fn normalized(self) -> Self {
        let ceo = self.ceo_name.clone().unwrap_or_default();
        Self::new(&self.symbol, &self.company_name).with_ceo(&ceo)
    }

    fn is_valid(&self) -> bool {
        !self.symbol.is_empty() && !self.company_name.is_empty()
    }
}

/// 유니버스.
///
/// 심볼은 유일하며, 중복 심볼은 처음 등장한 항목만 유지합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Universe {
    entries: Vec<UniverseEntry>,
}

impl Universe {
    /// 항목 목록에서 유니버스 생성.
    ///
    /// 정규화 후 심볼 또는 회사명이 빈 항목은 제외합니다.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = UniverseEntry>,
    {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .map(UniverseEntry::normalized)
            .filter(UniverseEntry::is_valid)
            .filter(|e| seen.insert(e.symbol.clone()))
            .collect();
        Self { entries }
    }

    /// 앞에서부터 최대 N개만 유지.
    pub fn truncated(mut self, max_companies: Option<usize>) -> Self {
        if let Some(max) = max_companies {
            self.entries.truncate(max);
        }
        self
    }

    /// 지정한 심볼만 유지 (빈 목록이면 전체 유지).
    pub fn filtered(mut self, symbols: &[String]) -> Self {
        if symbols.is_empty() {
            return self;
        }
        let wanted: HashSet<String> = symbols.iter().map(|s| normalize_symbol(s)).collect();
        self.entries.retain(|e| wanted.contains(&e.symbol));
        self
    }

    pub fn entries(&self) -> &[UniverseEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &UniverseEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 심볼 포함 여부.
    pub fn contains(&self, symbol: &str) -> bool {
        let symbol = normalize_symbol(symbol);
        self.entries.iter().any(|e| e.symbol == symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_universe_normalizes_and_dedupes() {
        let universe = Universe::from_entries(vec![
            UniverseEntry::new(" tcs ", "Tata Consultancy Services"),
            UniverseEntry::new("TCS", "Duplicate"),
            UniverseEntry::new("", "No Symbol"),
            UniverseEntry::new("INFY", "   "),
            UniverseEntry::new("infy", "Infosys").with_ceo("  Salil Parekh "),
        ]);

        let symbols: Vec<&str> = universe.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["TCS", "INFY"]);
        assert_eq!(universe.entries()[0].company_name, "Tata Consultancy Services");
        assert_eq!(universe.entries()[1].ceo_name.as_deref(), Some("Salil Parekh"));
    }

    #[test]
    fn test_blank_ceo_is_none() {
        let entry = UniverseEntry::new("ITC", "ITC Ltd").with_ceo("   ");
        assert_eq!(entry.ceo_name, None);
    }

    #[test]
    fn test_truncate_and_filter() {
        let universe = Universe::from_entries(vec![
            UniverseEntry::new("A", "Alpha"),
            UniverseEntry::new("B", "Beta"),
            UniverseEntry::new("C", "Gamma"),
        ]);

        assert_eq!(universe.clone().truncated(Some(2)).len(), 2);
        assert_eq!(universe.clone().truncated(None).len(), 3);

        let filtered = universe.filtered(&["c".to_string(), "zzz".to_string()]);
        assert_eq!(filtered.len(), 1);
        assert!(filtered.contains("C"));
    }
}
