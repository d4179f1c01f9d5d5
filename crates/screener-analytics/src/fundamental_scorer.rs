//! 펀더멘털 점수 및 랭킹.
//!
//! 업종 대비 밸류에이션, 수익성, 재무 안정성, 지분 구조, 뉴스 감성을 가산식 정수 점수로
//! 종합하여 종목 순위를 산출합니다.
//!
//! # 점수 규칙 (모두 독립적으로 평가)
//!
//! | 조건 | 점수 |
//! |------|------|
//! | PER 평가: 업종 대비 저평가 / 절대 PER 낮음 | +2 |
//! | PER 평가: 업종 대비 적정 / 절대 PER 중간 | +1 |
//! | forward PER < trailing PER (둘 다 양수) | +1 |
//! | PEG ≤ 1.2 / ≤ 1.8 (양수) | +2 / +1 |
//! | ROE ≥ 15% / ≥ 10% | +2 / +1 |
//! | 순이익률 ≥ 10% | +1 |
//! | 부채비율 ≤ 80 / ≥ 250 | +1 / −1 |
//! | 내부자 지분 ≥ 45% / ≥ 25% | +2 / +1 |
//! | 회사 뉴스 감성 ≥ 0.20 / ≥ 0.08 / ≤ −0.08 | +2 / +1 / −1 |
//! | CEO 발언 감성 ≥ 0.15 / ≤ −0.08 | +1 / −1 |
//!
//! 사유 문자열은 규칙 평가 순서대로 최대 6개까지 `; `로 연결합니다.

use std::collections::HashMap;
use tracing::debug;

use screener_core::num::cmp_desc_missing_last;
use screener_core::{FundamentalRow, PeAssessment, RankedFundamentalRow};

/// 사유 문자열 최대 개수.
pub const MAX_REASONS: usize = 6;

const REASON_SEPARATOR: &str = "; ";

/// 업종별 trailing PER 중앙값.
///
/// 업종이 있고 trailing PER이 양수인 행만 사용합니다. 짝수 개면 가운데 두 값의 평균입니다.
pub fn industry_median_pe(rows: &[FundamentalRow]) -> HashMap<String, f64> {
    let mut by_industry: HashMap<&str, Vec<f64>> = HashMap::new();

    for row in rows {
        if let (Some(industry), Some(pe)) = (row.industry.as_deref(), row.trailing_pe) {
            if pe > 0.0 {
                by_industry.entry(industry).or_default().push(pe);
            }
        }
    }

    by_industry
        .into_iter()
        .filter_map(|(industry, mut values)| median(&mut values).map(|m| (industry.to_string(), m)))
        .collect()
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// 점수 계산 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub score: i32,
    /// 규칙 평가 순서의 사유 (최대 6개)
    pub reasons: Vec<&'static str>,
}

impl ScoreBreakdown {
    pub fn reason_summary(&self) -> String {
        self.reasons.join(REASON_SEPARATOR)
    }
}

struct ScoreBuilder {
    score: i32,
    reasons: Vec<&'static str>,
}

impl ScoreBuilder {
    fn add(&mut self, points: i32, reason: &'static str) {
        self.score += points;
        self.reasons.push(reason);
    }

    fn finish(mut self) -> ScoreBreakdown {
        self.reasons.truncate(MAX_REASONS);
        ScoreBreakdown {
            score: self.score,
            reasons: self.reasons,
        }
    }
}

/// 한 종목의 점수 계산.
pub fn score_row(
    row: &FundamentalRow,
    pe_assessment: PeAssessment,
    company_sentiment: Option<f64>,
    ceo_sentiment: Option<f64>,
) -> ScoreBreakdown {
    let mut b = ScoreBuilder {
        score: 0,
        reasons: Vec::new(),
    };

    match pe_assessment {
        PeAssessment::UndervaluedVsIndustry | PeAssessment::LowAbsolutePe => {
            b.add(2, "PE favorable")
        }
        PeAssessment::FairVsIndustry | PeAssessment::MidAbsolutePe => b.add(1, "PE acceptable"),
        _ => {}
    }

    if let (Some(fpe), Some(tpe)) = (row.forward_pe, row.trailing_pe) {
        if fpe > 0.0 && tpe > 0.0 && fpe < tpe {
            b.add(1, "Forward PE improving");
        }
    }

    if let Some(peg) = row.peg_ratio.filter(|p| *p > 0.0) {
        if peg <= 1.2 {
            b.add(2, "PEG attractive");
        } else if peg <= 1.8 {
            b.add(1, "PEG reasonable");
        }
    }

    if let Some(roe) = row.return_on_equity {
        if roe >= 0.15 {
            b.add(2, "High ROE");
        } else if roe >= 0.10 {
            b.add(1, "Decent ROE");
        }
    }

    if row.profit_margins.is_some_and(|m| m >= 0.10) {
        b.add(1, "Healthy margins");
    }

    if let Some(d2e) = row.debt_to_equity {
        if d2e <= 80.0 {
            b.add(1, "Manageable debt");
        } else if d2e >= 250.0 {
            b.add(-1, "High leverage");
        }
    }

    if let Some(promoter) = row.promoter_holding_proxy_pct {
        if promoter >= 45.0 {
            b.add(2, "High insider/promoter proxy");
        } else if promoter >= 25.0 {
            b.add(1, "Moderate insider/promoter proxy");
        }
    }

    if let Some(sent) = company_sentiment {
        if sent >= 0.20 {
            b.add(2, "Strong company news sentiment");
        } else if sent >= 0.08 {
            b.add(1, "Positive company news sentiment");
        } else if sent <= -0.08 {
            b.add(-1, "Negative company news sentiment");
        }
    }

    if let Some(sent) = ceo_sentiment {
        if sent >= 0.15 {
            b.add(1, "Positive CEO sentiment");
        } else if sent <= -0.08 {
            b.add(-1, "Negative CEO sentiment");
        }
    }

    b.finish()
}

/// 랭킹 입력.
#[derive(Debug, Default)]
pub struct RankingInputs<'a> {
    /// 심볼 → 회사 뉴스 평균 감성
    pub company_sentiment: Option<&'a HashMap<String, f64>>,
    /// 심볼 → CEO 발언 평균 감성
    pub ceo_sentiment: Option<&'a HashMap<String, f64>>,
}

/// 펀더멘털 행을 점수화하고 정렬.
///
/// 정렬: 점수, 회사 뉴스 감성, CEO 감성, 시가총액 순 내림차순 (없는 값은 가장 낮음).
/// 모두 같으면 입력 순서를 유지합니다.
pub fn rank(rows: Vec<FundamentalRow>, inputs: &RankingInputs<'_>) -> Vec<RankedFundamentalRow> {
    let medians = industry_median_pe(&rows);

    let mut ranked: Vec<RankedFundamentalRow> = rows
        .into_iter()
        .map(|row| {
            let industry_median = row
                .industry
                .as_deref()
                .and_then(|industry| medians.get(industry).copied());
            let company = inputs
                .company_sentiment
                .and_then(|m| m.get(&row.symbol).copied());
            let ceo = inputs.ceo_sentiment.and_then(|m| m.get(&row.symbol).copied());

            let assessment = PeAssessment::assess(row.trailing_pe, industry_median);
            let breakdown = score_row(&row, assessment, company, ceo);

            RankedFundamentalRow::from_parts(
                row,
                industry_median,
                company,
                ceo,
                breakdown.score,
                breakdown.reason_summary(),
            )
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| cmp_desc_missing_last(a.company_news_sentiment, b.company_news_sentiment))
            .then_with(|| {
                cmp_desc_missing_last(a.ceo_commentary_sentiment, b.ceo_commentary_sentiment)
            })
            .then_with(|| cmp_desc_missing_last(a.market_cap, b.market_cap))
    });

    debug!(
        rows = ranked.len(),
        industries = medians.len(),
        "펀더멘털 랭킹 완료"
    );

    ranked
}

/// 상위 N개.
pub fn top_n(ranked: &[RankedFundamentalRow], n: usize) -> Vec<RankedFundamentalRow> {
    ranked.iter().take(n).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use screener_core::{ReturnPotentialFlag, UniverseEntry};

    fn base(symbol: &str) -> FundamentalRow {
        FundamentalRow::empty(&UniverseEntry::new(symbol, &format!("{} Co", symbol)))
    }

    #[test]
    fn test_industry_median() {
        let mut a = base("A");
        a.industry = Some("X".into());
        a.trailing_pe = Some(10.0);
        let mut b = base("B");
        b.industry = Some("X".into());
        b.trailing_pe = Some(20.0);
        let mut c = base("C");
        c.industry = Some("X".into());
        c.trailing_pe = Some(-5.0);
        let mut d = base("D");
        d.industry = Some("Y".into());
        d.trailing_pe = Some(30.0);
        let mut e = base("E");
        e.trailing_pe = Some(12.0);

        let medians = industry_median_pe(&[a, b, c, d, e]);
        assert_eq!(medians.len(), 2);
        assert_eq!(medians["X"], 15.0);
        assert_eq!(medians["Y"], 30.0);
    }

    #[test]
    fn test_single_symbol_industry_is_fair() {
        let mut row = base("AAA");
        row.industry = Some("X".into());
        row.trailing_pe = Some(18.0);

        let ranked = rank(vec![row], &RankingInputs::default());
        let r = &ranked[0];
        assert_eq!(r.industry_median_pe, Some(18.0));
        assert_eq!(r.pe_assessment, PeAssessment::FairVsIndustry);
        assert_eq!(r.score, 1);
        assert_eq!(r.reason_summary, "PE acceptable");
        assert_eq!(r.return_potential_flag, ReturnPotentialFlag::AvoidNeedsWork);
    }

    #[test]
    fn test_full_score_and_reason_cap() {
        let mut row = base("AAA");
        row.trailing_pe = Some(12.0);
        row.forward_pe = Some(10.0);
        row.peg_ratio = Some(1.0);
        row.return_on_equity = Some(0.2);
        row.profit_margins = Some(0.15);
        row.debt_to_equity = Some(40.0);
        row.promoter_holding_proxy_pct = Some(50.0);

        let breakdown = score_row(&row, PeAssessment::LowAbsolutePe, Some(0.25), Some(0.2));
        // 2 + 1 + 2 + 2 + 1 + 1 + 2 + 2 + 1
        assert_eq!(breakdown.score, 14);
        assert_eq!(breakdown.reasons.len(), MAX_REASONS);
        assert_eq!(
            breakdown.reason_summary(),
            "PE favorable; Forward PE improving; PEG attractive; High ROE; Healthy margins; Manageable debt"
        );
    }

    #[test]
    fn test_penalties() {
        let mut row = base("AAA");
        row.debt_to_equity = Some(300.0);
        let breakdown = score_row(
            &row,
            PeAssessment::UnavailableOrLossMaking,
            Some(-0.1),
            Some(-0.08),
        );
        assert_eq!(breakdown.score, -3);
        assert_eq!(
            breakdown.reasons,
            vec![
                "High leverage",
                "Negative company news sentiment",
                "Negative CEO sentiment"
            ]
        );
    }

    #[test]
    fn test_middle_bands() {
        let mut row = base("AAA");
        row.peg_ratio = Some(1.5);
        row.return_on_equity = Some(0.12);
        row.debt_to_equity = Some(120.0);
        row.promoter_holding_proxy_pct = Some(30.0);

        let breakdown = score_row(&row, PeAssessment::MidAbsolutePe, Some(0.1), Some(0.0));
        assert_eq!(breakdown.score, 5);
        assert_eq!(
            breakdown.reasons,
            vec![
                "PE acceptable",
                "PEG reasonable",
                "Decent ROE",
                "Moderate insider/promoter proxy",
                "Positive company news sentiment"
            ]
        );
    }

    #[test]
    fn test_rank_order_with_missing_values() {
        let mut a = base("A");
        a.market_cap = Some(100.0);
        let mut b = base("B");
        b.market_cap = Some(500.0);
        let c = base("C");
        let mut d = base("D");
        d.return_on_equity = Some(0.2);

        let mut company = HashMap::new();
        company.insert("C".to_string(), 0.05);
        let inputs = RankingInputs {
            company_sentiment: Some(&company),
            ceo_sentiment: None,
        };

        let ranked = rank(vec![a, b, c, d], &inputs);
        let symbols: Vec<&str> = ranked.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["D", "C", "B", "A"]);
        assert_eq!(ranked[1].company_news_sentiment, Some(0.05));

        assert_eq!(top_n(&ranked, 2).len(), 2);
        assert_eq!(top_n(&ranked, 10).len(), 4);
    }

    fn arb_row() -> impl Strategy<Value = FundamentalRow> {
        let opt = |r: std::ops::Range<f64>| proptest::option::of(r);
        (
            opt(-20.0..80.0),
            opt(-20.0..80.0),
            opt(-1.0..4.0),
            opt(-0.5..0.6),
            opt(-0.3..0.5),
            opt(0.0..400.0),
            opt(0.0..90.0),
        )
            .prop_map(|(tpe, fpe, peg, roe, margin, d2e, promoter)| FundamentalRow {
                trailing_pe: tpe,
                forward_pe: fpe,
                peg_ratio: peg,
                return_on_equity: roe,
                profit_margins: margin,
                debt_to_equity: d2e,
                promoter_holding_proxy_pct: promoter,
                ..base("P")
            })
    }

    proptest! {
        #[test]
        fn prop_flag_agrees_with_score(
            row in arb_row(),
            company in proptest::option::of(-1.0f64..1.0),
            ceo in proptest::option::of(-1.0f64..1.0),
        ) {
            let mut company_map = HashMap::new();
            if let Some(c) = company {
                company_map.insert("P".to_string(), c);
            }
            let mut ceo_map = HashMap::new();
            if let Some(c) = ceo {
                ceo_map.insert("P".to_string(), c);
            }
            let inputs = RankingInputs {
                company_sentiment: Some(&company_map),
                ceo_sentiment: Some(&ceo_map),
            };

            let ranked = rank(vec![row], &inputs);
            let r = &ranked[0];
            prop_assert_eq!(r.score >= 8, r.return_potential_flag == ReturnPotentialFlag::HighPotential);
            prop_assert_eq!((5..8).contains(&r.score), r.return_potential_flag == ReturnPotentialFlag::Watchlist);
            prop_assert_eq!(r.score < 5, r.return_potential_flag == ReturnPotentialFlag::AvoidNeedsWork);
            prop_assert!(r.reason_summary.split("; ").filter(|s| !s.is_empty()).count() <= MAX_REASONS);
        }
    }
}
