//! Tests for the exponential backoff retry policy.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use toolsmith_error::{RemoteError, RemoteErrorKind};
use toolsmith_retry::{
    RecordingSleeper, RetryConfig, retry_default, retry_with_backoff, retry_with_sleeper,
};

fn unavailable() -> RemoteError {
    RemoteError::http(503, "Service unavailable")
}

fn bad_request() -> RemoteError {
    RemoteError::http(400, "Bad request")
}

#[tokio::test]
async fn test_permanent_retryable_failure_attempts_n_plus_one() {
    for max_retries in 0..5 {
        let config = RetryConfig::default().with_max_retries(max_retries);
        let sleeper = RecordingSleeper::new();
        let calls = AtomicU32::new(0);

        let result: Result<(), RemoteError> = retry_with_sleeper(
            &config,
            &sleeper,
            |e: &RemoteError| e.kind.is_retryable(),
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(unavailable()) }
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), max_retries + 1);
        assert_eq!(sleeper.count(), max_retries as usize);
    }
}

#[tokio::test]
async fn test_non_retryable_failure_attempts_once() {
    let config = RetryConfig::default().with_max_retries(10);
    let sleeper = RecordingSleeper::new();
    let calls = AtomicU32::new(0);

    let result: Result<(), RemoteError> = retry_with_sleeper(
        &config,
        &sleeper,
        |e: &RemoteError| e.kind.is_retryable(),
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(bad_request()) }
        },
    )
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err.kind, RemoteErrorKind::Http { status_code: 400, .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(sleeper.count(), 0);
}

#[tokio::test]
async fn test_delay_sequence_is_capped() {
    let config = RetryConfig::default().with_max_retries(7);
    let sleeper = RecordingSleeper::new();

    let _: Result<(), RemoteError> = retry_with_sleeper(
        &config,
        &sleeper,
        |_: &RemoteError| true,
        || async { Err(unavailable()) },
    )
    .await;

    let delays: Vec<u128> = sleeper.delays().iter().map(|d| d.as_millis()).collect();
    assert_eq!(delays, vec![1000, 2000, 4000, 8000, 10000, 10000, 10000]);
}

#[tokio::test(start_paused = true)]
async fn test_fake_timer_spacing_between_attempts() {
    let config = RetryConfig::default().with_max_retries(5);
    let stamps = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let start = tokio::time::Instant::now();

    let result: Result<(), RemoteError> = retry_with_backoff(
        &config,
        |e: &RemoteError| e.kind.is_retryable(),
        || {
            stamps.lock().push(start.elapsed());
            async { Err(unavailable()) }
        },
    )
    .await;
    assert!(result.is_err());

    let stamps = stamps.lock().clone();
    let gaps: Vec<u128> = stamps
        .windows(2)
        .map(|w| (w[1] - w[0]).as_millis())
        .collect();
    assert_eq!(gaps, vec![1000, 2000, 4000, 8000, 10000]);
}

#[tokio::test]
async fn test_two_failures_then_success() {
    let config = RetryConfig::default();
    let sleeper = RecordingSleeper::new();
    let calls = AtomicU32::new(0);

    let result = retry_with_sleeper(
        &config,
        &sleeper,
        |e: &RemoteError| e.kind.is_retryable(),
        || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(unavailable())
                } else {
                    Ok("done")
                }
            }
        },
    )
    .await;

    assert_eq!(result.unwrap(), "done");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        sleeper.delays(),
        vec![Duration::from_millis(1000), Duration::from_millis(2000)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_default_classifier_uses_error_kind() {
    let config = RetryConfig::default().with_max_retries(2);
    let calls = AtomicU32::new(0);

    let result: Result<(), RemoteError> = retry_default(&config, || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(RemoteError::new(RemoteErrorKind::Timeout("slow".into()))) }
    })
    .await;
    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    calls.store(0, Ordering::SeqCst);
    let result: Result<(), RemoteError> = retry_default(&config, || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err(RemoteError::new(RemoteErrorKind::QuotaExceeded("daily".into()))) }
    })
    .await;
    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_custom_classifier_overrides_default() {
    let config = RetryConfig::default().with_max_retries(2);
    let sleeper = RecordingSleeper::new();
    let calls = AtomicU32::new(0);

    // Treat 429 as transient even though the default does not.
    let result: Result<(), RemoteError> = retry_with_sleeper(
        &config,
        &sleeper,
        |e: &RemoteError| matches!(e.kind, RemoteErrorKind::Http { status_code: 429, .. }),
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(RemoteError::http(429, "slow down")) }
        },
    )
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}
