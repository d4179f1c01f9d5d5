//! 뉴스 및 감성 분석 타입.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// 긍정 판정 임계값 (이상).
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// 부정 판정 임계값 (이하).
pub const NEGATIVE_THRESHOLD: f64 = -0.05;
/// 요약에 포함할 최대 링크 수.
pub const TOP_LINKS_LIMIT: usize = 3;

/// 뉴스 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NewsKind {
    /// 회사 뉴스
    Company,
    /// CEO 발언/인터뷰
    CeoCommentary,
}

impl fmt::Display for NewsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Company => write!(f, "company"),
            Self::CeoCommentary => write!(f, "ceo_commentary"),
        }
    }
}

/// 피드에서 수집한 뉴스 항목.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsItem {
    pub symbol: String,
    pub title: String,
    pub link: String,
    /// 원문 타임스탬프 문자열
    pub published: String,
    /// 파싱된 타임스탬프 (파싱 실패 시 None)
    pub published_at: Option<DateTime<Utc>>,
    pub source: String,
}

/// 감성 라벨.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// 점수에서 라벨 결정 (경계값 포함).
    pub fn from_score(score: f64) -> Self {
        if score >= POSITIVE_THRESHOLD {
            Self::Positive
        } else if score <= NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 텍스트 감성 분석 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// 극성 점수 [-1, 1]
    pub score: f64,
}

impl SentimentResult {
    pub fn from_score(score: f64) -> Self {
        Self {
            label: SentimentLabel::from_score(score),
            score,
        }
    }
}

/// 심볼 단위 집계 분위기.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vibe {
    #[serde(rename = "positive vibe")]
    Positive,
    #[serde(rename = "neutral vibe")]
    Neutral,
    #[serde(rename = "negative vibe")]
    Negative,
}

impl Vibe {
    /// 평균 점수에서 분위기 결정 (개별 라벨과 같은 임계값 사용).
    pub fn from_score(avg_sentiment: f64) -> Self {
        match SentimentLabel::from_score(avg_sentiment) {
            SentimentLabel::Positive => Self::Positive,
            SentimentLabel::Neutral => Self::Neutral,
            SentimentLabel::Negative => Self::Negative,
        }
    }
}

/// 감성 분석이 적용된 뉴스 상세 행.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsDetailRow {
    pub symbol: String,
    pub title: String,
    pub link: String,
    pub published: String,
    pub source: String,
    pub sentiment_label: SentimentLabel,
    pub sentiment_score: f64,
}

impl NewsDetailRow {
    pub fn new(item: NewsItem, sentiment: SentimentResult) -> Self {
        Self {
            symbol: item.symbol,
            title: item.title,
            link: item.link,
            published: item.published,
            source: item.source,
            sentiment_label: sentiment.label,
            sentiment_score: sentiment.score,
        }
    }
}

/// 심볼별 감성 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSentimentSummary {
    pub symbol: String,
    pub news_count: usize,
    pub positive_count: usize,
    pub neutral_count: usize,
    pub negative_count: usize,
    pub avg_sentiment: f64,
    /// 중복 제거된 상위 링크 (최대 3개, ` | ` 구분)
    pub top_links: String,
    pub vibe: Vibe,
}

/// 빈 링크를 제외하고 순서를 유지한 채 중복 제거 후 상위 3개를 ` | `로 연결.
pub fn join_top_links<'a, I>(links: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    links
        .into_iter()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| seen.insert(*l))
        .take(TOP_LINKS_LIMIT)
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_label_thresholds_are_inclusive() {
        assert_eq!(SentimentLabel::from_score(0.05), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_score(-0.05), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_score(0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(0.0499), SentimentLabel::Neutral);
    }

    #[test]
    fn test_vibe_uses_same_thresholds() {
        assert_eq!(Vibe::from_score(0.05), Vibe::Positive);
        assert_eq!(Vibe::from_score(-0.05), Vibe::Negative);
        assert_eq!(Vibe::from_score(0.01), Vibe::Neutral);
    }

    #[test]
    fn test_join_top_links() {
        let links = ["a", "", "b", "a", "  ", "c", "d"];
        assert_eq!(join_top_links(links), "a | b | c");
        assert_eq!(join_top_links(Vec::<&str>::new()), "");
    }

    proptest! {
        #[test]
        fn prop_label_matches_thresholds(score in -1.0f64..=1.0) {
            let label = SentimentLabel::from_score(score);
            let expected = if score >= 0.05 {
                SentimentLabel::Positive
            } else if score <= -0.05 {
                SentimentLabel::Negative
            } else {
                SentimentLabel::Neutral
            };
            prop_assert_eq!(label, expected);
        }
    }
}
