//! 정책/스킴 수혜 리포트.
//!
//! 회사 뉴스 상세 테이블을 입력으로 정책 키워드를 매칭해 요약과 근거 테이블을
//! 저장합니다. 매칭이 없어도 두 테이블은 헤더만 있는 빈 파일로 저장됩니다.

use tracing::info;

use screener_analytics::{build_policy_report, KeywordMatcher, PolicyReport};
use screener_core::PolicyConfig;
use screener_data::{load_policy_source, write_table};

use crate::error::Result;

/// 정책 수혜 리포트 생성 및 저장.
///
/// 키워드 설정이 잘못되었거나 입력 테이블이 없으면 아무것도 쓰지 않고 실패합니다.
pub fn run_policy_report(config: &PolicyConfig) -> Result<PolicyReport> {
    let keywords = config.resolve_keywords()?;
    let matcher = KeywordMatcher::new(&keywords);
    let rows = load_policy_source(&config.source_details_csv)?;

    info!(
        source = %config.source_details_csv.display(),
        rows = rows.len(),
        categories = matcher.category_count(),
        "정책 수혜 분석 시작"
    );

    let report = build_policy_report(&rows, &matcher);

    write_table(&config.outputs.summary_csv, &report.summary)?;
    write_table(&config.outputs.evidence_csv, &report.evidence)?;

    info!(
        symbols = report.summary.len(),
        evidence = report.evidence.len(),
        "정책 수혜 리포트 저장 완료"
    );

    Ok(report)
}
