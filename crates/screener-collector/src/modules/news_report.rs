//! 회사 뉴스 / CEO 코멘터리 감성 리포트.
//!
//! 유니버스의 각 종목에 대해 두 종류의 검색어로 뉴스를 수집하고, 헤드라인 감성을
//! 매겨 상세 테이블과 심볼별 요약 테이블을 저장합니다.

use std::path::Path;
use std::time::Instant;
use tracing::info;

use screener_analytics::{score_items, summarize, SentimentScorer};
use screener_core::{
    NewsConfig, NewsDetailRow, NewsKind, SymbolSentimentSummary, Universe, UniverseEntry,
};
use screener_data::{load_universe, write_output, NewsQuery, NewsSource, PersistMode};

use crate::collector::{collect_keyed, successes};
use crate::error::Result;
use crate::stats::CollectionStats;

const CEO_COMMENTARY_TERMS: &str = "commentary OR interview OR says OR guidance";

/// 종류별 수집 결과.
#[derive(Debug, Clone)]
pub struct NewsKindReport {
    pub kind: NewsKind,
    /// 저장된(유효한) 상세 테이블
    pub details: Vec<NewsDetailRow>,
    /// 저장된(유효한) 요약 테이블
    pub summary: Vec<SymbolSentimentSummary>,
    pub stats: CollectionStats,
}

/// 뉴스 리포트 결과.
#[derive(Debug, Clone)]
pub struct NewsReport {
    pub company: NewsKindReport,
    pub ceo: NewsKindReport,
}

/// 뉴스 리포트 대상 유니버스.
///
/// 설정에 인라인 회사 목록이 있으면 그것을, 없으면 유니버스 CSV를 사용합니다.
pub fn resolve_news_universe(config: &NewsConfig, symbols: &[String]) -> Result<Universe> {
    let universe = match &config.companies {
        Some(companies) if !companies.is_empty() => {
            Universe::from_entries(companies.iter().cloned())
        }
        _ => load_universe(&config.universe_csv, None)?,
    };
    Ok(universe.filtered(symbols).truncated(config.max_companies))
}

/// 회사 뉴스 검색어.
pub fn company_query(entry: &UniverseEntry) -> String {
    format!("\"{}\" NSE stock", entry.company_name)
}

/// CEO 코멘터리 검색어. CEO 이름이 없으면 회사명 + CEO로 검색합니다.
pub fn ceo_query(entry: &UniverseEntry) -> String {
    let subject = match &entry.ceo_name {
        Some(ceo) => format!("\"{}\" \"{}\"", ceo, entry.company_name),
        None => format!("\"{}\" CEO", entry.company_name),
    };
    format!("{} {}", subject, CEO_COMMENTARY_TERMS)
}

/// 종류별 (심볼, 검색 요청) 목록 생성.
pub fn build_queries(
    kind: NewsKind,
    universe: &Universe,
    config: &NewsConfig,
) -> Vec<(String, NewsQuery)> {
    universe
        .iter()
        .map(|entry| {
            let query = match kind {
                NewsKind::Company => company_query(entry),
                NewsKind::CeoCommentary => ceo_query(entry),
            };
            (
                entry.symbol.clone(),
                NewsQuery {
                    symbol: entry.symbol.clone(),
                    query,
                    lookback_days: config.lookback_days,
                    limit: config.limit_per_company,
                },
            )
        })
        .collect()
}

struct KindOutputs<'a> {
    kind: NewsKind,
    details_csv: &'a Path,
    summary_csv: &'a Path,
}

/// 회사 뉴스와 CEO 코멘터리를 차례로 수집하고 네 개의 테이블을 저장.
///
/// `force_refresh`가 꺼져 있으면 이번 수집 결과가 빈 테이블은 기존 파일을 유지하고,
/// 요약은 실제로 유지된 상세 테이블에서 계산합니다.
pub async fn run_news_report(
    config: &NewsConfig,
    universe: &Universe,
    source: &dyn NewsSource,
    scorer: &SentimentScorer,
) -> Result<NewsReport> {
    let mode = PersistMode::from_force_refresh(config.force_refresh);
    let outputs = &config.outputs;

    let company = collect_kind(
        KindOutputs {
            kind: NewsKind::Company,
            details_csv: &outputs.company_details_csv,
            summary_csv: &outputs.company_summary_csv,
        },
        build_queries(NewsKind::Company, universe, config),
        config.max_workers,
        source,
        scorer,
        mode,
    )
    .await?;

    let ceo = collect_kind(
        KindOutputs {
            kind: NewsKind::CeoCommentary,
            details_csv: &outputs.ceo_details_csv,
            summary_csv: &outputs.ceo_summary_csv,
        },
        build_queries(NewsKind::CeoCommentary, universe, config),
        config.max_workers,
        source,
        scorer,
        mode,
    )
    .await?;

    Ok(NewsReport { company, ceo })
}

async fn collect_kind(
    outputs: KindOutputs<'_>,
    jobs: Vec<(String, NewsQuery)>,
    workers: usize,
    source: &dyn NewsSource,
    scorer: &SentimentScorer,
    mode: PersistMode,
) -> Result<NewsKindReport> {
    let start = Instant::now();
    let operation = format!("{} 뉴스", outputs.kind);
    let mut stats = CollectionStats::new();

    info!(
        kind = %outputs.kind,
        source = source.name(),
        queries = jobs.len(),
        "뉴스 수집 시작"
    );

    let results = collect_keyed(jobs, workers, move |_, query: NewsQuery| async move {
        source.fetch_news(&query).await
    })
    .await;

    let mut items = Vec::new();
    for (_, feed) in successes(results, &operation, &mut stats) {
        if feed.is_empty() {
            stats.empty += 1;
        }
        items.extend(feed);
    }
    stats.rows = items.len();

    let details = write_output(outputs.details_csv, score_items(scorer, items), mode)?;
    let summary = write_output(outputs.summary_csv, summarize(&details), mode)?;

    stats.elapsed = start.elapsed();
    stats.log_summary(&operation);

    Ok(NewsKindReport {
        kind: outputs.kind,
        details,
        summary,
        stats,
    })
}
