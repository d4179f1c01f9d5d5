//! 데이터 Provider 모듈.
//!
//! ## Google News RSS
//! - `GoogleNewsClient`: 검색 쿼리별 뉴스 피드 수집 (인증 불필요)
//!
//! ## Yahoo Finance
//! - `YahooFundamentalClient`: quoteSummary API 기반 펀더멘털 수집 (쿠키 + crumb 인증)
//!
//! 수집기는 구체 타입 대신 `NewsSource`, `FundamentalSource` trait에 의존하므로
//! 테스트에서는 가짜 Provider로 교체할 수 있습니다.

pub mod google_news;
pub mod yahoo;

use async_trait::async_trait;

use screener_core::{FundamentalRow, NewsItem, UniverseEntry};

use crate::error::Result;

pub use google_news::{normalize_link, parse_feed, GoogleNewsClient};
pub use yahoo::{parse_quote_summary, YahooFundamentalClient};

/// 심볼 단위 뉴스 검색 요청.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    /// 결과에 붙일 심볼
    pub symbol: String,
    /// 검색어 (기간 제한 미포함 시 자동 추가)
    pub query: String,
    /// 조회 기간 (일)
    pub lookback_days: u32,
    /// 최대 항목 수
    pub limit: usize,
}

/// 뉴스 Provider trait.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 검색어에 해당하는 최근 뉴스 조회.
    ///
    /// 조회 기간보다 오래된 항목은 제외하고, 날짜를 알 수 없는 항목은 포함합니다.
    async fn fetch_news(&self, query: &NewsQuery) -> Result<Vec<NewsItem>>;
}

/// Provider가 반환한 원시 펀더멘털 값.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundamentalSnapshot {
    pub industry: Option<String>,
    pub sector: Option<String>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub price_to_book: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub profit_margins: Option<f64>,
    pub market_cap: Option<f64>,
    pub trailing_eps: Option<f64>,
    pub current_price: Option<f64>,
    /// 내부자 보유 비율 (0~1)
    pub held_percent_insiders: Option<f64>,
}

impl FundamentalSnapshot {
    /// 값이 하나도 없는지 여부.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// 유니버스 항목과 결합하여 펀더멘털 행 생성.
    ///
    /// trailing PER이 없고 EPS가 양수이면 `현재가 / EPS`로 보완하며,
    /// 프로모터 지분 대용치는 내부자 보유 비율 × 100입니다.
    pub fn into_row(self, entry: &UniverseEntry) -> FundamentalRow {
        let trailing_pe = self.trailing_pe.or_else(|| match (self.current_price, self.trailing_eps) {
            (Some(price), Some(eps)) if eps > 0.0 && price != 0.0 => Some(price / eps),
            _ => None,
        });

        FundamentalRow {
            symbol: entry.symbol.clone(),
            yahoo_ticker: entry.yahoo_ticker(),
            company_name: entry.company_name.clone(),
            industry: self.industry,
            sector: self.sector,
            trailing_pe,
            forward_pe: self.forward_pe,
            peg_ratio: self.peg_ratio,
            price_to_book: self.price_to_book,
            debt_to_equity: self.debt_to_equity,
            return_on_equity: self.return_on_equity,
            return_on_assets: self.return_on_assets,
            profit_margins: self.profit_margins,
            market_cap: self.market_cap,
            promoter_holding_proxy_pct: self.held_percent_insiders.map(|p| p * 100.0),
        }
    }
}

/// 펀더멘털 Provider trait.
#[async_trait]
pub trait FundamentalSource: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 티커의 펀더멘털 조회 (데이터가 없으면 `None`).
    async fn fetch_snapshot(&self, ticker: &str) -> Result<Option<FundamentalSnapshot>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_pe_fallback_from_eps() {
        let entry = UniverseEntry::new("AAA", "Alpha Co");
        let row = FundamentalSnapshot {
            current_price: Some(200.0),
            trailing_eps: Some(10.0),
            held_percent_insiders: Some(0.52),
            ..Default::default()
        }
        .into_row(&entry);

        assert_eq!(row.trailing_pe, Some(20.0));
        assert_eq!(row.yahoo_ticker, "AAA.NS");
        assert!((row.promoter_holding_proxy_pct.unwrap() - 52.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_fallback_for_loss_making() {
        let entry = UniverseEntry::new("AAA", "Alpha Co");
        let row = FundamentalSnapshot {
            current_price: Some(200.0),
            trailing_eps: Some(-4.0),
            ..Default::default()
        }
        .into_row(&entry);
        assert_eq!(row.trailing_pe, None);

        let row = FundamentalSnapshot {
            trailing_pe: Some(31.0),
            current_price: Some(200.0),
            trailing_eps: Some(10.0),
            ..Default::default()
        }
        .into_row(&entry);
        assert_eq!(row.trailing_pe, Some(31.0));
    }

    #[test]
    fn test_snapshot_is_empty() {
        assert!(FundamentalSnapshot::default().is_empty());
        assert!(!FundamentalSnapshot {
            sector: Some("Energy".to_string()),
            ..Default::default()
        }
        .is_empty());
    }
}
