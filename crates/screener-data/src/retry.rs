//! 펀더멘털 수집 재시도.

use std::time::Duration;
use tracing::{debug, warn};

use screener_core::{FundamentalRow, FundamentalsConfig, UniverseEntry};

use crate::error::{DataError, Result};
use crate::provider::FundamentalSource;

/// 재시도 정책.
///
/// 첫 시도 후 최대 `retries`번 재시도하며, n번째 시도(0부터) 실패 후
/// `base_delay × (n + 1)`만큼 대기합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, base_delay: Duration) -> Self {
        Self {
            retries,
            base_delay,
        }
    }

    /// `attempt`번째 시도 실패 후 대기 시간.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * (attempt + 1)
    }
}

impl From<&FundamentalsConfig> for RetryPolicy {
    fn from(config: &FundamentalsConfig) -> Self {
        Self::new(config.retries, config.retry_delay())
    }
}

/// 재시도를 포함한 단일 종목 펀더멘털 수집.
///
/// 데이터를 받으면 즉시 행을 반환합니다. 모든 시도에서 데이터를 받지 못했고
/// 에러가 한 번이라도 발생했다면 마지막 에러를 반환하며, 에러 없이 빈 응답만
/// 받았다면 수치 필드가 모두 빈 행을 반환합니다.
pub async fn fetch_fundamental_with_retry(
    source: &dyn FundamentalSource,
    entry: &UniverseEntry,
    policy: RetryPolicy,
) -> Result<FundamentalRow> {
    let ticker = entry.yahoo_ticker();
    let mut last_err: Option<DataError> = None;

    for attempt in 0..=policy.retries {
        match source.fetch_snapshot(&ticker).await {
            Ok(Some(snapshot)) if !snapshot.is_empty() => {
                return Ok(snapshot.into_row(entry));
            }
            Ok(_) => {
                debug!(ticker = %ticker, attempt = attempt, "빈 펀더멘털 응답");
            }
            Err(e) => {
                debug!(
                    ticker = %ticker,
                    attempt = attempt,
                    max_retries = policy.retries,
                    error = %e,
                    "펀더멘털 수집 실패"
                );
                last_err = Some(e);
            }
        }

        if attempt < policy.retries {
            tokio::time::sleep(policy.delay_after(attempt)).await;
        }
    }

    match last_err {
        Some(e) => {
            warn!(
                ticker = %ticker,
                attempts = policy.retries + 1,
                error = %e,
                "펀더멘털 수집 최종 실패"
            );
            Err(e)
        }
        None => Ok(FundamentalRow::empty(entry)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::FundamentalSnapshot;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// 미리 정한 응답을 순서대로 돌려주는 Provider.
    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<Option<FundamentalSnapshot>>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<Option<FundamentalSnapshot>>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl FundamentalSource for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn fetch_snapshot(&self, _ticker: &str) -> Result<Option<FundamentalSnapshot>> {
            *self.calls.lock().unwrap() += 1;
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(None))
        }
    }

    fn snapshot(pe: f64) -> FundamentalSnapshot {
        FundamentalSnapshot {
            trailing_pe: Some(pe),
            industry: Some("X".to_string()),
            ..Default::default()
        }
    }

    fn policy(retries: u32) -> RetryPolicy {
        RetryPolicy::new(retries, Duration::from_millis(150))
    }

    #[test]
    fn test_linear_delay() {
        let p = policy(2);
        assert_eq!(p.delay_after(0), Duration::from_millis(150));
        assert_eq!(p.delay_after(1), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_error() {
        let source = ScriptedSource::new(vec![
            Err(DataError::FetchError("timeout".into())),
            Ok(Some(snapshot(18.0))),
        ]);
        let entry = UniverseEntry::new("AAA", "Alpha Co");

        let row = fetch_fundamental_with_retry(&source, &entry, policy(2))
            .await
            .unwrap();

        assert_eq!(row.trailing_pe, Some(18.0));
        assert_eq!(row.yahoo_ticker, "AAA.NS");
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_propagate_last_error() {
        let source = ScriptedSource::new(vec![
            Err(DataError::FetchError("first".into())),
            Err(DataError::FetchError("second".into())),
            Err(DataError::FetchError("third".into())),
        ]);
        let entry = UniverseEntry::new("AAA", "Alpha Co");

        let err = fetch_fundamental_with_retry(&source, &entry, policy(2))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Fetch error: third");
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_payload_without_error_yields_empty_row() {
        let source = ScriptedSource::new(vec![
            Ok(None),
            Ok(Some(FundamentalSnapshot::default())),
        ]);
        let entry = UniverseEntry::new("AAA", "Alpha Co");

        let row = fetch_fundamental_with_retry(&source, &entry, policy(1))
            .await
            .unwrap();

        assert_eq!(row, FundamentalRow::empty(&entry));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_then_empty_still_fails() {
        let source = ScriptedSource::new(vec![
            Err(DataError::FetchError("rate limited".into())),
            Ok(None),
        ]);
        let entry = UniverseEntry::new("AAA", "Alpha Co");

        assert!(fetch_fundamental_with_retry(&source, &entry, policy(1))
            .await
            .is_err());
    }
}
