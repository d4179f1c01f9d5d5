//! 리포트 테이블 간 계약 테스트.
//!
//! 한 단계가 쓴 테이블을 다음 단계의 로더가 그대로 읽을 수 있는지 확인합니다.

use std::fs;
use std::path::PathBuf;

use screener_core::{NewsDetailRow, NewsItem, SentimentResult, SymbolSentimentSummary, Vibe};
use screener_data::{load_policy_source, load_sentiment_averages, write_table};

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("screener-contracts-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn detail(symbol: &str, title: &str, score: f64) -> NewsDetailRow {
    NewsDetailRow::new(
        NewsItem {
            symbol: symbol.to_string(),
            title: title.to_string(),
            link: format!("https://news.example/{}", symbol),
            published: "Mon, 06 Jan 2025 10:00:00 GMT".to_string(),
            published_at: None,
            source: "Example, Times".to_string(),
        },
        SentimentResult::from_score(score),
    )
}

#[test]
fn test_news_details_feed_policy_source() {
    let dir = temp_dir();
    let path = dir.join("company_details.csv");

    write_table(
        &path,
        &[
            detail("LT", "L&T bags \"Mumbai Metro\" contract", 0.3),
            detail("TCS", "TCS declares dividend", -0.1),
        ],
    )
    .unwrap();

    let rows = load_policy_source(&path).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].symbol, "LT");
    assert_eq!(rows[0].title, "L&T bags \"Mumbai Metro\" contract");
    assert_eq!(rows[0].source, "Example, Times");
    assert_eq!(rows[0].sentiment_score, 0.3);
    assert_eq!(rows[1].sentiment_score, -0.1);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_summary_feeds_sentiment_averages() {
    let dir = temp_dir();
    let path = dir.join("company_summary.csv");

    write_table(
        &path,
        &[SymbolSentimentSummary {
            symbol: "INFY".to_string(),
            news_count: 2,
            positive_count: 1,
            neutral_count: 1,
            negative_count: 0,
            avg_sentiment: 0.125,
            top_links: "https://a | https://b".to_string(),
            vibe: Vibe::from_score(0.125),
        }],
    )
    .unwrap();

    let averages = load_sentiment_averages(&path);
    assert_eq!(averages.len(), 1);
    assert_eq!(averages.get("INFY"), Some(&0.125));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_empty_details_table_is_still_a_valid_source() {
    let dir = temp_dir();
    let path = dir.join("company_details.csv");

    write_table::<NewsDetailRow>(&path, &[]).unwrap();
    assert!(load_policy_source(&path).unwrap().is_empty());

    fs::remove_dir_all(&dir).ok();
}
