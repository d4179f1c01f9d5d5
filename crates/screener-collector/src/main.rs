//! NSE Signal Screener CLI.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use screener_analytics::PolicyReport;
use screener_collector::modules::{FundamentalsReport, NewsReport};
use screener_collector::{parse_symbol_list, Pipeline};
use screener_core::{init_logging, AppConfig, LogConfig};

/// 로그에 출력할 상위 행 수.
const TOP_LOG_ROWS: usize = 5;

#[derive(Parser)]
#[command(name = "screener-collector")]
#[command(about = "NSE Signal Screener - news sentiment, policy beneficiaries, fundamentals ranking", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 설정 파일 경로
    #[arg(long, global = true, default_value = "config/default.toml")]
    config: PathBuf,

    /// 로그 레벨 (trace, debug, info, warn, error). 설정 파일보다 우선
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// 뉴스 리포트 강제 갱신 (false면 빈 결과일 때 기존 리포트 유지)
    #[arg(long, global = true)]
    force_refresh: Option<bool>,

    /// 특정 심볼만 처리 (쉼표로 구분, 예: "TCS,INFY")
    #[arg(long, global = true)]
    symbols: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// 회사 뉴스 / CEO 코멘터리 감성 리포트
    NewsReport,

    /// 정책/스킴 수혜 리포트 (회사 뉴스 상세 테이블 필요)
    PolicyReport,

    /// 펀더멘털 수집 및 랭킹 리포트
    FundamentalsReport,

    /// 전체 워크플로우 실행 (뉴스 → 정책 → 펀더멘털)
    RunAll,

    /// 데몬 모드: 주기적으로 전체 워크플로우 실행
    Daemon,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 설정 로드
    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("설정 파일 로드 실패: {}", cli.config.display()))?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(force_refresh) = cli.force_refresh {
        config.news.force_refresh = force_refresh;
    }

    // 로깅 초기화
    init_logging(LogConfig::from(&config.logging))?;

    tracing::info!("NSE Signal Screener 시작");
    tracing::debug!(config = %cli.config.display(), "설정 로드 완료");

    let symbols = parse_symbol_list(cli.symbols.as_deref());
    let pipeline =
        Pipeline::from_config(config, symbols).context("데이터 Provider 초기화 실패")?;

    // 명령 실행
    match cli.command {
        Commands::NewsReport => {
            let report = pipeline.news_report().await?;
            log_news_report(&pipeline, &report);
        }
        Commands::PolicyReport => {
            let report = pipeline.policy_report()?;
            log_policy_report(&pipeline, &report);
        }
        Commands::FundamentalsReport => {
            let report = pipeline.fundamentals_report().await?;
            log_fundamentals_report(&pipeline, &report);
        }
        Commands::RunAll => {
            tracing::info!("=== 전체 워크플로우 시작 ===");

            // 1. 뉴스 감성
            tracing::info!("Step 1/3: 뉴스 감성 리포트");
            let news = pipeline.news_report().await?;
            log_news_report(&pipeline, &news);

            // 2. 정책 수혜
            tracing::info!("Step 2/3: 정책 수혜 리포트");
            let policy = pipeline.policy_report()?;
            log_policy_report(&pipeline, &policy);

            // 3. 펀더멘털 랭킹
            tracing::info!("Step 3/3: 펀더멘털 랭킹 리포트");
            let fundamentals = pipeline.fundamentals_report().await?;
            log_fundamentals_report(&pipeline, &fundamentals);

            tracing::info!("=== 전체 워크플로우 완료 ===");
        }
        Commands::Daemon => {
            let interval_minutes = pipeline.config().daemon.interval_minutes;
            tracing::info!("=== 데몬 모드 시작 (주기: {}분) ===", interval_minutes);

            let mut interval = tokio::time::interval(pipeline.config().daemon.interval());
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("종료 신호 수신, 데몬 종료 중...");
                        break;
                    }
                    _ = interval.tick() => {
                        tracing::info!("=== 워크플로우 실행 시작 ===");

                        // 1. 뉴스 감성
                        match pipeline.news_report().await {
                            Ok(report) => log_news_report(&pipeline, &report),
                            Err(e) => tracing::error!("뉴스 감성 리포트 실패: {}", e),
                        }

                        // 2. 정책 수혜
                        match pipeline.policy_report() {
                            Ok(report) => log_policy_report(&pipeline, &report),
                            Err(e) => tracing::error!("정책 수혜 리포트 실패: {}", e),
                        }

                        // 3. 펀더멘털 랭킹
                        match pipeline.fundamentals_report().await {
                            Ok(report) => log_fundamentals_report(&pipeline, &report),
                            Err(e) => tracing::error!("펀더멘털 랭킹 리포트 실패: {}", e),
                        }

                        tracing::info!(
                            "=== 워크플로우 완료, 다음 실행: {}분 후 ===",
                            interval_minutes
                        );
                    }
                }
            }
        }
    }

    tracing::info!("NSE Signal Screener 종료");

    Ok(())
}

fn log_news_report(pipeline: &Pipeline, report: &NewsReport) {
    for kind_report in [&report.company, &report.ceo] {
        for row in kind_report.summary.iter().take(TOP_LOG_ROWS) {
            tracing::info!(
                kind = %kind_report.kind,
                symbol = %row.symbol,
                news = row.news_count,
                avg_sentiment = format!("{:.3}", row.avg_sentiment),
                vibe = ?row.vibe,
                "상위 감성 종목"
            );
        }
    }

    let outputs = &pipeline.config().news.outputs;
    tracing::info!(
        company_details = %outputs.company_details_csv.display(),
        company_summary = %outputs.company_summary_csv.display(),
        ceo_details = %outputs.ceo_details_csv.display(),
        ceo_summary = %outputs.ceo_summary_csv.display(),
        "뉴스 리포트 저장 완료"
    );
}

fn log_policy_report(pipeline: &Pipeline, report: &PolicyReport) {
    if report.is_empty() {
        tracing::info!("정책 키워드에 매칭된 뉴스가 없습니다");
    }

    for row in report.summary.iter().take(TOP_LOG_ROWS) {
        tracing::info!(
            symbol = %row.symbol,
            mentions = row.scheme_mentions,
            score = format!("{:.2}", row.policy_benefit_score),
            bucket = %row.benefit_bucket,
            categories = %row.matched_categories,
            "정책 수혜 상위 종목"
        );
    }

    let outputs = &pipeline.config().policy.outputs;
    tracing::info!(
        summary = %outputs.summary_csv.display(),
        evidence = %outputs.evidence_csv.display(),
        "정책 리포트 경로"
    );
}

fn log_fundamentals_report(pipeline: &Pipeline, report: &FundamentalsReport) {
    for row in report.top_picks.iter().take(TOP_LOG_ROWS) {
        tracing::info!(
            symbol = %row.symbol,
            score = row.score,
            flag = %row.return_potential_flag,
            pe_assessment = %row.pe_assessment,
            reasons = %row.reason_summary,
            "펀더멘털 상위 종목"
        );
    }

    let outputs = &pipeline.config().fundamentals.outputs;
    tracing::info!(
        raw = %outputs.raw_fundamentals_csv.display(),
        ranked = %outputs.ranked_report_csv.display(),
        top_picks = %outputs.top_picks_csv.display(),
        "펀더멘털 리포트 저장 완료"
    );
}
