//! 동시성 제한 수집기.
//!
//! 키가 붙은 요청 목록을 최대 `workers`개씩 동시에 실행하고, 결과를 키 순으로
//! 돌려줍니다. 개별 요청 실패는 결과에 남을 뿐 다른 요청에 영향을 주지 않습니다.

use futures::stream::{self, StreamExt};
use std::fmt::Display;
use std::future::Future;
use tracing::warn;

use crate::stats::CollectionStats;

/// 동시 실행 상한.
pub const MAX_WORKERS: usize = 32;

/// 작업자 수를 [1, MAX_WORKERS] 범위로 제한.
pub fn clamp_workers(workers: usize) -> usize {
    workers.clamp(1, MAX_WORKERS)
}

/// 요청을 제한된 동시성으로 실행하고 (키, 결과) 목록을 키 순으로 반환.
///
/// 완료 순서와 무관하게 같은 입력은 같은 순서의 결과를 냅니다.
pub async fn collect_keyed<K, D, T, E, F, Fut>(
    jobs: Vec<(K, D)>,
    workers: usize,
    fetch: F,
) -> Vec<(K, Result<T, E>)>
where
    K: Ord + Clone,
    F: Fn(K, D) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let futures = jobs.into_iter().map(|(key, job)| {
        let fut = fetch(key.clone(), job);
        async move { (key, fut.await) }
    });

    let mut results: Vec<(K, Result<T, E>)> = stream::iter(futures)
        .buffer_unordered(clamp_workers(workers))
        .collect()
        .await;

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

/// 성공한 결과만 남기고 통계를 갱신.
///
/// 실패한 요청은 경고 로그를 남기고 결과에서 제외합니다.
pub fn successes<K, T, E>(
    results: Vec<(K, Result<T, E>)>,
    operation: &str,
    stats: &mut CollectionStats,
) -> Vec<(K, T)>
where
    K: Display,
    E: Display,
{
    stats.total += results.len();

    results
        .into_iter()
        .filter_map(|(key, result)| match result {
            Ok(value) => {
                stats.success += 1;
                Some((key, value))
            }
            Err(e) => {
                stats.errors += 1;
                warn!(operation = operation, key = %key, error = %e, "수집 실패, 결과에서 제외");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_clamp_workers() {
        assert_eq!(clamp_workers(0), 1);
        assert_eq!(clamp_workers(12), 12);
        assert_eq!(clamp_workers(500), MAX_WORKERS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_sorted_by_key() {
        let jobs: Vec<(String, u64)> = vec![
            ("CCC".to_string(), 1),
            ("AAA".to_string(), 30),
            ("BBB".to_string(), 10),
        ];

        let results = collect_keyed(jobs, 3, |key, delay| async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok::<_, String>(key.to_lowercase())
        })
        .await;

        let keys: Vec<&str> = results.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["AAA", "BBB", "CCC"]);
        assert_eq!(results[0].1.as_deref(), Ok("aaa"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_is_bounded() {
        let in_flight = &AtomicUsize::new(0);
        let peak = &AtomicUsize::new(0);
        let jobs: Vec<(usize, ())> = (0..20).map(|i| (i, ())).collect();

        let results = collect_keyed(jobs, 4, move |key, _| async move {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok::<_, String>(key)
        })
        .await;

        assert_eq!(results.len(), 20);
        assert!(peak.load(Ordering::SeqCst) <= 4);
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let jobs: Vec<(String, bool)> = vec![
            ("AAA".to_string(), true),
            ("BAD".to_string(), false),
            ("CCC".to_string(), true),
        ];

        let results = collect_keyed(jobs, 2, |key, ok| async move {
            if ok {
                Ok(key)
            } else {
                Err("boom".to_string())
            }
        })
        .await;

        let mut stats = CollectionStats::new();
        let ok = successes(results, "test", &mut stats);
        let keys: Vec<&str> = ok.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["AAA", "CCC"]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.success, 2);
        assert_eq!(stats.errors, 1);
    }

    #[tokio::test]
    async fn test_empty_jobs() {
        let results = collect_keyed(Vec::<(String, ())>::new(), 8, |key, _| async move {
            Ok::<_, String>(key)
        })
        .await;
        assert!(results.is_empty());
    }
}
