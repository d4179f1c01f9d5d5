//! 정책/스킴 수혜 분석.
//!
//! 뉴스 헤드라인에서 정책 카테고리 키워드를 찾아 종목별 수혜 점수를 계산합니다.
//!
//! # 점수
//!
//! - 행 점수: `1.5 × 매칭 카테고리 수 + 2.0 × max(감성, 0)`
//! - 종목 점수: 매칭된 행 점수의 합
//!
//! # 등급
//!
//! - 언급 5회 이상, 점수 8 이상: High Policy Benefit
//! - 언급 2회 이상, 점수 4 이상: Potential Beneficiary
//! - 그 외: Watch

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use screener_core::{
    join_top_links, BenefitBucket, Keywords, PolicyBenefitSummary, PolicyEvidenceRow,
    PolicySourceRow,
};

/// 카테고리당 가중치.
pub const CATEGORY_WEIGHT: f64 = 1.5;
/// 양의 감성 가중치.
pub const SENTIMENT_WEIGHT: f64 = 2.0;

const CATEGORY_SEPARATOR: &str = ", ";

/// 대소문자 무시 부분 문자열 키워드 매처.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    categories: BTreeMap<String, Vec<String>>,
}

impl KeywordMatcher {
    pub fn new(keywords: &Keywords) -> Self {
        let categories = keywords
            .categories()
            .into_iter()
            .map(|(category, words)| {
                let words = words
                    .into_iter()
                    .map(|w| w.trim().to_lowercase())
                    .filter(|w| !w.is_empty())
                    .collect();
                (category, words)
            })
            .collect();
        Self { categories }
    }

    /// 텍스트에 매칭되는 카테고리 (정렬, 중복 없음).
    pub fn matches(&self, text: &str) -> Vec<&str> {
        let text = text.to_lowercase();
        self.categories
            .iter()
            .filter(|(_, words)| words.iter().any(|w| text.contains(w.as_str())))
            .map(|(category, _)| category.as_str())
            .collect()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }
}

/// 행 점수 계산.
pub fn policy_row_score(distinct_categories: usize, sentiment_score: f64) -> f64 {
    CATEGORY_WEIGHT * distinct_categories as f64 + SENTIMENT_WEIGHT * sentiment_score.max(0.0)
}

/// 정책 수혜 분석 결과.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyReport {
    /// 종목별 요약 (점수, 언급 수, 평균 감성 내림차순)
    pub summary: Vec<PolicyBenefitSummary>,
    /// 매칭된 뉴스 근거 (행 점수, 감성 내림차순)
    pub evidence: Vec<PolicyEvidenceRow>,
}

impl PolicyReport {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty() && self.evidence.is_empty()
    }
}

#[derive(Default)]
struct SymbolAccumulator<'a> {
    mentions: usize,
    sentiment_sum: f64,
    score_sum: f64,
    categories: BTreeSet<&'a str>,
    links: Vec<&'a str>,
}

/// 뉴스 상세 행에서 정책 수혜 리포트 생성.
///
/// 키워드가 하나도 매칭되지 않은 행은 제외합니다. 매칭이 없으면 빈 리포트입니다.
pub fn build_policy_report(rows: &[PolicySourceRow], matcher: &KeywordMatcher) -> PolicyReport {
    let mut evidence = Vec::new();
    let mut groups: BTreeMap<&str, SymbolAccumulator<'_>> = BTreeMap::new();

    for row in rows {
        let matched = matcher.matches(&row.title);
        if matched.is_empty() {
            continue;
        }

        let row_score = policy_row_score(matched.len(), row.sentiment_score);

        let acc = groups.entry(row.symbol.as_str()).or_default();
        acc.mentions += 1;
        acc.sentiment_sum += row.sentiment_score;
        acc.score_sum += row_score;
        acc.categories.extend(matched.iter().copied());
        acc.links.push(row.link.as_str());

        evidence.push(PolicyEvidenceRow {
            symbol: row.symbol.clone(),
            published: row.published.clone(),
            title: row.title.clone(),
            link: row.link.clone(),
            source: row.source.clone(),
            sentiment_score: row.sentiment_score,
            matched_categories: matched.join(CATEGORY_SEPARATOR),
            policy_row_score: row_score,
        });
    }

    evidence.sort_by(|a, b| {
        b.policy_row_score
            .total_cmp(&a.policy_row_score)
            .then_with(|| b.sentiment_score.total_cmp(&a.sentiment_score))
    });

    let mut summary: Vec<PolicyBenefitSummary> = groups
        .into_iter()
        .map(|(symbol, acc)| PolicyBenefitSummary {
            symbol: symbol.to_string(),
            scheme_mentions: acc.mentions,
            avg_scheme_sentiment: acc.sentiment_sum / acc.mentions as f64,
            policy_benefit_score: acc.score_sum,
            matched_categories: acc
                .categories
                .into_iter()
                .collect::<Vec<_>>()
                .join(CATEGORY_SEPARATOR),
            top_links: join_top_links(acc.links),
            benefit_bucket: BenefitBucket::classify(acc.mentions, acc.score_sum),
        })
        .collect();

    summary.sort_by(|a, b| {
        b.policy_benefit_score
            .total_cmp(&a.policy_benefit_score)
            .then_with(|| b.scheme_mentions.cmp(&a.scheme_mentions))
            .then_with(|| b.avg_scheme_sentiment.total_cmp(&a.avg_scheme_sentiment))
            .then_with(|| a.symbol.cmp(&b.symbol))
    });

    debug!(
        source_rows = rows.len(),
        evidence = evidence.len(),
        symbols = summary.len(),
        "정책 수혜 분석 완료"
    );

    PolicyReport { summary, evidence }
}
