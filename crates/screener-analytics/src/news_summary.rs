//! 뉴스 감성 집계.
//!
//! 뉴스 항목에 감성 점수를 붙여 상세 테이블을 만들고, 심볼별 요약을 계산합니다.
//! 집계는 심볼 기준 그룹화이므로 입력 순서와 무관하게 같은 결과를 냅니다
//! (상위 링크만 상세 테이블 순서를 따릅니다).

use std::collections::BTreeMap;

use screener_core::{
    join_top_links, NewsDetailRow, NewsItem, SentimentLabel, SymbolSentimentSummary, Vibe,
};

use crate::sentiment::SentimentScorer;

/// 뉴스 항목 제목에 감성 점수를 매겨 상세 행 생성.
pub fn score_items(scorer: &SentimentScorer, items: Vec<NewsItem>) -> Vec<NewsDetailRow> {
    items
        .into_iter()
        .map(|item| {
            let sentiment = scorer.score(&item.title);
            NewsDetailRow::new(item, sentiment)
        })
        .collect()
}

#[derive(Default)]
struct SymbolAccumulator<'a> {
    count: usize,
    positive: usize,
    neutral: usize,
    negative: usize,
    score_sum: f64,
    links: Vec<&'a str>,
}

/// 상세 행을 심볼별 요약으로 집계.
///
/// 정렬: 평균 감성 내림차순, 뉴스 수 내림차순, 심볼 오름차순.
pub fn summarize(details: &[NewsDetailRow]) -> Vec<SymbolSentimentSummary> {
    let mut groups: BTreeMap<&str, SymbolAccumulator<'_>> = BTreeMap::new();

    for row in details {
        let acc = groups.entry(row.symbol.as_str()).or_default();
        acc.count += 1;
        match row.sentiment_label {
            SentimentLabel::Positive => acc.positive += 1,
            SentimentLabel::Neutral => acc.neutral += 1,
            SentimentLabel::Negative => acc.negative += 1,
        }
        acc.score_sum += row.sentiment_score;
        acc.links.push(row.link.as_str());
    }

    let mut summaries: Vec<SymbolSentimentSummary> = groups
        .into_iter()
        .map(|(symbol, acc)| {
            let avg_sentiment = acc.score_sum / acc.count as f64;
            SymbolSentimentSummary {
                symbol: symbol.to_string(),
                news_count: acc.count,
                positive_count: acc.positive,
                neutral_count: acc.neutral,
                negative_count: acc.negative,
                avg_sentiment,
                top_links: join_top_links(acc.links),
                vibe: Vibe::from_score(avg_sentiment),
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.avg_sentiment
            .total_cmp(&a.avg_sentiment)
            .then_with(|| b.news_count.cmp(&a.news_count))
            .then_with(|| a.symbol.cmp(&b.symbol))
    });

    summaries
}
