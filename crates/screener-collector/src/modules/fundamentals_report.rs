//! 펀더멘털 수집 및 랭킹 리포트.
//!
//! 처리 순서:
//! 1. 유니버스 종목별 펀더멘털 수집 (재시도, 동시성 제한)
//! 2. raw 캐시와 병합 후 유니버스 기준 정렬, raw 테이블 저장
//! 3. 회사 뉴스 / CEO 코멘터리 평균 감성 로드
//! 4. 점수화, 정렬, 상위 N개 저장

use std::time::Instant;
use tracing::info;

use screener_analytics::{rank, top_n, RankingInputs};
use screener_core::{FundamentalRow, FundamentalsConfig, RankedFundamentalRow, Universe};
use screener_data::{
    fetch_fundamental_with_retry, load_sentiment_averages, load_universe, merge_with_cache,
    write_table, FundamentalSource, RetryPolicy,
};

use crate::collector::{collect_keyed, successes};
use crate::error::Result;
use crate::stats::CollectionStats;

const OPERATION: &str = "펀더멘털 수집";

/// 펀더멘털 리포트 결과.
#[derive(Debug, Clone)]
pub struct FundamentalsReport {
    /// 캐시 병합 후 raw 테이블 (유니버스 순서)
    pub raw: Vec<FundamentalRow>,
    /// 전체 랭킹
    pub ranked: Vec<RankedFundamentalRow>,
    /// 상위 종목
    pub top_picks: Vec<RankedFundamentalRow>,
    pub stats: CollectionStats,
}

/// 펀더멘털 리포트 대상 유니버스.
pub fn resolve_fundamentals_universe(
    config: &FundamentalsConfig,
    symbols: &[String],
) -> Result<Universe> {
    let universe = load_universe(&config.universe_csv, None)?;
    Ok(universe.filtered(symbols).truncated(config.max_companies))
}

/// 펀더멘털 수집, 캐시 병합, 랭킹 후 세 개의 테이블을 저장.
///
/// 수집에 실패한 종목은 수치 필드가 빈 행으로 raw 테이블에 남습니다
/// (캐시 사용 시 이전 값이 있으면 그 값을 사용).
pub async fn run_fundamentals_report(
    config: &FundamentalsConfig,
    universe: &Universe,
    source: &dyn FundamentalSource,
) -> Result<FundamentalsReport> {
    let start = Instant::now();
    let policy = RetryPolicy::from(config);
    let mut stats = CollectionStats::new();

    info!(
        source = source.name(),
        symbols = universe.len(),
        workers = config.max_workers,
        retries = policy.retries,
        "펀더멘털 수집 시작"
    );

    let jobs: Vec<_> = universe
        .iter()
        .map(|entry| (entry.symbol.clone(), entry.clone()))
        .collect();

    let results = collect_keyed(jobs, config.max_workers, move |_, entry| async move {
        fetch_fundamental_with_retry(source, &entry, policy).await
    })
    .await;

    let fresh: Vec<FundamentalRow> = successes(results, OPERATION, &mut stats)
        .into_iter()
        .map(|(_, row)| row)
        .collect();
    stats.empty = fresh.iter().filter(|row| !row.has_metrics()).count();
    stats.rows = fresh.len();

    let raw_path = &config.outputs.raw_fundamentals_csv;
    let raw = merge_with_cache(universe, fresh, raw_path, config.use_cache);
    write_table(raw_path, &raw)?;

    let company_sentiment = load_sentiment_averages(&config.company_sentiment_csv);
    let ceo_sentiment = load_sentiment_averages(&config.ceo_sentiment_csv);
    let inputs = RankingInputs {
        company_sentiment: Some(&company_sentiment),
        ceo_sentiment: Some(&ceo_sentiment),
    };

    let ranked = rank(raw.clone(), &inputs);
    let top_picks = top_n(&ranked, config.top_n);

    write_table(&config.outputs.ranked_report_csv, &ranked)?;
    write_table(&config.outputs.top_picks_csv, &top_picks)?;

    stats.elapsed = start.elapsed();
    stats.log_summary(OPERATION);

    Ok(FundamentalsReport {
        raw,
        ranked,
        top_picks,
        stats,
    })
}
