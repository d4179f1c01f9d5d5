//! 펀더멘털 및 랭킹 결과 타입.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::universe::UniverseEntry;
use crate::num::deserialize_lenient_f64;

/// "High Potential" 최소 점수.
///
/// 행 점수 계산과 등급 매핑이 모두 이 상수를 사용합니다.
pub const HIGH_POTENTIAL_MIN_SCORE: i32 = 8;
/// "Watchlist" 최소 점수.
pub const WATCHLIST_MIN_SCORE: i32 = 5;

/// 심볼별 펀더멘털 데이터.
///
/// 모든 수치 필드는 선택값이며, 조회 실패나 숫자가 아닌 원본 값은 `None`입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalRow {
    pub symbol: String,
    #[serde(default)]
    pub yahoo_ticker: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub trailing_pe: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub forward_pe: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub peg_ratio: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub price_to_book: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub debt_to_equity: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub return_on_equity: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub return_on_assets: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub profit_margins: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub market_cap: Option<f64>,
    /// 내부자 보유율 × 100 (프로모터 지분 대용치)
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub promoter_holding_proxy_pct: Option<f64>,
}

impl FundamentalRow {
    /// 수치 필드가 모두 비어 있는 행 (조회 실패 종목용).
    pub fn empty(entry: &UniverseEntry) -> Self {
        Self {
            symbol: entry.symbol.clone(),
            yahoo_ticker: entry.yahoo_ticker(),
            company_name: entry.company_name.clone(),
            ..Default::default()
        }
    }

    /// 수치 지표가 하나라도 있는지 여부.
    pub fn has_metrics(&self) -> bool {
        [
            self.trailing_pe,
            self.forward_pe,
            self.peg_ratio,
            self.price_to_book,
            self.debt_to_equity,
            self.return_on_equity,
            self.return_on_assets,
            self.profit_margins,
            self.market_cap,
            self.promoter_holding_proxy_pct,
        ]
        .iter()
        .any(Option::is_some)
    }
}

/// 업종 대비 PER 평가.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeAssessment {
    UnavailableOrLossMaking,
    UndervaluedVsIndustry,
    FairVsIndustry,
    OvervaluedVsIndustry,
    LowAbsolutePe,
    MidAbsolutePe,
    HighAbsolutePe,
}

impl PeAssessment {
    /// trailing PER과 업종 중앙값 PER로 평가.
    ///
    /// 업종 중앙값이 없거나 0 이하이면 절대 PER 구간으로 평가합니다.
    pub fn assess(trailing_pe: Option<f64>, industry_median_pe: Option<f64>) -> Self {
        let pe = match trailing_pe {
            Some(pe) if pe > 0.0 => pe,
            _ => return Self::UnavailableOrLossMaking,
        };

        match industry_median_pe {
            Some(median) if median > 0.0 => {
                let ratio = pe / median;
                if ratio <= 0.9 {
                    Self::UndervaluedVsIndustry
                } else if ratio <= 1.2 {
                    Self::FairVsIndustry
                } else {
                    Self::OvervaluedVsIndustry
                }
            }
            _ => {
                if pe <= 15.0 {
                    Self::LowAbsolutePe
                } else if pe <= 25.0 {
                    Self::MidAbsolutePe
                } else {
                    Self::HighAbsolutePe
                }
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnavailableOrLossMaking => "unavailable_or_loss_making",
            Self::UndervaluedVsIndustry => "undervalued_vs_industry",
            Self::FairVsIndustry => "fair_vs_industry",
            Self::OvervaluedVsIndustry => "overvalued_vs_industry",
            Self::LowAbsolutePe => "low_absolute_pe",
            Self::MidAbsolutePe => "mid_absolute_pe",
            Self::HighAbsolutePe => "high_absolute_pe",
        }
    }
}

impl fmt::Display for PeAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 수익 잠재력 등급.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnPotentialFlag {
    #[serde(rename = "High Potential")]
    HighPotential,
    #[serde(rename = "Watchlist")]
    Watchlist,
    #[serde(rename = "Avoid/Needs Work")]
    AvoidNeedsWork,
}

impl ReturnPotentialFlag {
    pub fn from_score(score: i32) -> Self {
        if score >= HIGH_POTENTIAL_MIN_SCORE {
            Self::HighPotential
        } else if score >= WATCHLIST_MIN_SCORE {
            Self::Watchlist
        } else {
            Self::AvoidNeedsWork
        }
    }
}

impl fmt::Display for ReturnPotentialFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HighPotential => write!(f, "High Potential"),
            Self::Watchlist => write!(f, "Watchlist"),
            Self::AvoidNeedsWork => write!(f, "Avoid/Needs Work"),
        }
    }
}

/// 랭킹 결과 행.
///
/// CSV 직렬화를 위해 `FundamentalRow` 필드를 평탄화하여 보관합니다.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFundamentalRow {
    pub symbol: String,
    pub yahoo_ticker: String,
    pub company_name: String,
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
    pub promoter_holding_proxy_pct: Option<f64>,
    pub industry_median_pe: Option<f64>,
    pub pe_assessment: PeAssessment,
    pub company_news_sentiment: Option<f64>,
    pub ceo_commentary_sentiment: Option<f64>,
    pub score: i32,
    pub reason_summary: String,
    pub return_potential_flag: ReturnPotentialFlag,
}

impl RankedFundamentalRow {
    /// 펀더멘털 행과 파생 지표를 결합.
    ///
    /// 등급은 점수에서 직접 계산하므로 점수와 항상 일치합니다.
    pub fn from_parts(
        row: FundamentalRow,
        industry_median_pe: Option<f64>,
        company_news_sentiment: Option<f64>,
        ceo_commentary_sentiment: Option<f64>,
        score: i32,
        reason_summary: String,
    ) -> Self {
        let pe_assessment = PeAssessment::assess(row.trailing_pe, industry_median_pe);
        Self {
            symbol: row.symbol,
            yahoo_ticker: row.yahoo_ticker,
            company_name: row.company_name,
            industry: row.industry,
            sector: row.sector,
            trailing_pe: row.trailing_pe,
            forward_pe: row.forward_pe,
            peg_ratio: row.peg_ratio,
            price_to_book: row.price_to_book,
            debt_to_equity: row.debt_to_equity,
            return_on_equity: row.return_on_equity,
            return_on_assets: row.return_on_assets,
            profit_margins: row.profit_margins,
            market_cap: row.market_cap,
            promoter_holding_proxy_pct: row.promoter_holding_proxy_pct,
            industry_median_pe,
            pe_assessment,
            company_news_sentiment,
            ceo_commentary_sentiment,
            score,
            reason_summary,
            return_potential_flag: ReturnPotentialFlag::from_score(score),
        }
    }
}
