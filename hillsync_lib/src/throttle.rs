//! Per-provider request pacing and retry.
//!
//! Each upstream provider gets one [`RateGate`] enforcing a minimum interval
//! between outbound calls: 1.2 s for congress.gov, 6 s for OpenFEC. The gate
//! holds its last-call timestamp behind a tokio mutex and keeps the
//! check-elapsed → sleep → record sequence atomic under the lock, so the
//! pacing stays correct if callers are ever parallelized. Today the
//! pipelines issue one call at a time.
//!
//! [`with_retry`] wraps a fetch closure with the gate plus exponential
//! backoff on transient failures, surfacing `FetchExhausted` once the
//! attempt budget is spent.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

use crate::error::SyncError;
use crate::openfec::OpenFecError;

/// Minimum gap between congress.gov calls.
const CONGRESS_MIN_INTERVAL: Duration = Duration::from_millis(1200);

/// Minimum gap between OpenFEC calls (the stricter of the two providers).
const FINANCE_MIN_INTERVAL: Duration = Duration::from_secs(6);

/// Attempts per fetch, including the first.
pub const MAX_ATTEMPTS: u32 = 5;

/// Exponential backoff ceiling.
const BACKOFF_CAP: Duration = Duration::from_secs(60);

/// Minimum-interval pacer for one upstream provider.
pub struct RateGate {
    last_call: Mutex<Option<Instant>>,
    min_interval: Duration,
    tracker: RequestTracker,
}

impl RateGate {
    /// Create a gate with an explicit interval (used by tests).
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_call: Mutex::new(None),
            min_interval,
            tracker: RequestTracker::new(),
        }
    }

    /// Gate for the legislative-data provider.
    pub fn congress() -> Self {
        Self::new(CONGRESS_MIN_INTERVAL)
    }

    /// Gate for the campaign-finance provider.
    pub fn finance() -> Self {
        Self::new(FINANCE_MIN_INTERVAL)
    }

    /// Wait out the remaining interval since the last call, then record the
    /// new call time.
    ///
    /// The lock is held across the sleep on purpose: releasing it between
    /// the elapsed check and the record would let two callers both observe a
    /// stale timestamp and proceed without waiting.
    pub async fn acquire(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                let deficit = self.min_interval - elapsed;
                tracing::debug!("rate gate: sleeping {:?}", deficit);
                sleep(deficit).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// Access the request tracker for recording and reading outcomes.
    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    /// The configured minimum interval.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Atomic counters tracking fetch outcomes for one gate.
pub struct RequestTracker {
    calls_made: AtomicU64,
    calls_succeeded: AtomicU64,
    calls_retried: AtomicU64,
    calls_failed: AtomicU64,
    total_backoff_ms: AtomicU64,
}

impl RequestTracker {
    fn new() -> Self {
        Self {
            calls_made: AtomicU64::new(0),
            calls_succeeded: AtomicU64::new(0),
            calls_retried: AtomicU64::new(0),
            calls_failed: AtomicU64::new(0),
            total_backoff_ms: AtomicU64::new(0),
        }
    }

    pub fn record_success(&self) {
        self.calls_made.fetch_add(1, Ordering::Relaxed);
        self.calls_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.calls_made.fetch_add(1, Ordering::Relaxed);
        self.calls_retried.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.calls_made.fetch_add(1, Ordering::Relaxed);
        self.calls_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_backoff(&self, duration: Duration) {
        self.total_backoff_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Snapshot the current counters.
    pub fn summary(&self) -> TrackerSummary {
        TrackerSummary {
            calls_made: self.calls_made.load(Ordering::Relaxed),
            calls_succeeded: self.calls_succeeded.load(Ordering::Relaxed),
            calls_retried: self.calls_retried.load(Ordering::Relaxed),
            calls_failed: self.calls_failed.load(Ordering::Relaxed),
            total_backoff_secs: self.total_backoff_ms.load(Ordering::Relaxed) as f64 / 1000.0,
        }
    }
}

/// Immutable snapshot of tracker counters for display.
#[derive(Debug, Clone)]
pub struct TrackerSummary {
    pub calls_made: u64,
    pub calls_succeeded: u64,
    pub calls_retried: u64,
    pub calls_failed: u64,
    pub total_backoff_secs: f64,
}

/// Transient/fatal classification for provider errors.
///
/// Transient failures (network, non-2xx status, decode) are retried with
/// backoff; everything else returns immediately.
pub trait ApiFailure: Into<SyncError> + std::fmt::Display {
    fn is_transient(&self) -> bool;
}

impl ApiFailure for congress_api::Error {
    fn is_transient(&self) -> bool {
        use congress_api::Error::*;
        match self {
            Network(_) | RateLimited | HttpStatus { .. } | Parse(_) => true,
            InvalidApiKey | InvalidUrl(_) => false,
        }
    }
}

impl ApiFailure for OpenFecError {
    fn is_transient(&self) -> bool {
        match self {
            OpenFecError::Network(_)
            | OpenFecError::RateLimited
            | OpenFecError::HttpStatus { .. }
            | OpenFecError::Parse(_) => true,
            OpenFecError::InvalidApiKey => false,
        }
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    let base = Duration::from_secs(1u64 << attempt.min(6));
    let capped = base.min(BACKOFF_CAP);
    let jitter = Duration::from_millis(rand::thread_rng().gen_range(0..1000));
    capped + jitter
}

/// Execute a fetch with pacing, retry, and backoff.
///
/// - Calls `gate.acquire()` before every attempt.
/// - Transient failures: wait `min(2^attempt, 60)` seconds plus 0-1 s jitter,
///   then retry, up to [`MAX_ATTEMPTS`] total attempts.
/// - Non-transient failures return immediately.
/// - Once the budget is spent, returns [`SyncError::FetchExhausted`] naming
///   `context` (the URL or endpoint being fetched).
pub async fn with_retry<F, Fut, T, E>(
    gate: &RateGate,
    context: &str,
    operation: F,
) -> Result<T, SyncError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: ApiFailure,
{
    let tracker = gate.tracker();

    for attempt in 0..MAX_ATTEMPTS {
        gate.acquire().await;

        match operation().await {
            Ok(val) => {
                tracker.record_success();
                return Ok(val);
            }
            Err(e) if e.is_transient() => {
                tracker.record_retry();
                tracing::warn!(
                    "attempt {}/{} failed for {}: {}",
                    attempt + 1,
                    MAX_ATTEMPTS,
                    context,
                    e
                );
                if attempt + 1 == MAX_ATTEMPTS {
                    break;
                }
                let wait = backoff_delay(attempt);
                tracker.record_backoff(wait);
                sleep(wait).await;
            }
            Err(e) => {
                tracker.record_failure();
                return Err(e.into());
            }
        }
    }

    tracker.record_failure();
    Err(SyncError::FetchExhausted {
        context: context.to_string(),
        attempts: MAX_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn first_acquire_is_immediate() {
        let gate = RateGate::new(Duration::from_secs(6));
        let start = Instant::now();
        gate.acquire().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn three_finance_calls_enforce_two_gaps() {
        let gate = RateGate::new(Duration::from_secs(6));
        let start = Instant::now();
        gate.acquire().await;
        gate.acquire().await;
        gate.acquire().await;
        // Two enforced 6-second gaps
        assert!(start.elapsed() >= Duration::from_secs(12));
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_time_counts_toward_interval() {
        let gate = RateGate::new(Duration::from_secs(6));
        gate.acquire().await;
        tokio::time::advance(Duration::from_secs(4)).await;

        let start = Instant::now();
        gate.acquire().await;
        // Only the 2-second deficit remains
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_acquires_serialize() {
        let gate = Arc::new(RateGate::new(Duration::from_secs(6)));
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..3 {
            let gate = Arc::clone(&gate);
            handles.push(tokio::spawn(async move { gate.acquire().await }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(start.elapsed() >= Duration::from_secs(12));
    }

    #[tokio::test(start_paused = true)]
    async fn retry_succeeds_on_fifth_attempt() {
        let gate = RateGate::new(Duration::ZERO);
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = with_retry(&gate, "test", move || {
            let attempts = Arc::clone(&attempts_clone);
            async move {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                if n < 4 {
                    Err(congress_api::Error::RateLimited)
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 5);

        let summary = gate.tracker().summary();
        assert_eq!(summary.calls_succeeded, 1);
        assert_eq!(summary.calls_retried, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_exhausts_budget() {
        let gate = RateGate::new(Duration::ZERO);

        let result: Result<i32, _> = with_retry(&gate, "http://example/bill/1", || async {
            Err::<i32, _>(congress_api::Error::Parse("bad json".into()))
        })
        .await;

        match result {
            Err(SyncError::FetchExhausted { context, attempts }) => {
                assert_eq!(context, "http://example/bill/1");
                assert_eq!(attempts, MAX_ATTEMPTS);
            }
            other => panic!("expected FetchExhausted, got {:?}", other.map(|_| ())),
        }

        let summary = gate.tracker().summary();
        assert_eq!(summary.calls_retried, MAX_ATTEMPTS as u64);
        assert_eq!(summary.calls_failed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn non_transient_error_returns_immediately() {
        let gate = RateGate::new(Duration::ZERO);
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result: Result<i32, _> = with_retry(&gate, "test", move || {
            let attempts = Arc::clone(&attempts_clone);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(OpenFecError::InvalidApiKey)
            }
        })
        .await;

        assert!(matches!(result, Err(SyncError::OpenFec(OpenFecError::InvalidApiKey))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(gate.tracker().summary().calls_failed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_grows_and_caps() {
        // Four backoffs of 1, 2, 4, 8 seconds between 5 attempts, plus
        // jitter < 1 s each: total paused-clock time lands in [15, 19).
        let gate = RateGate::new(Duration::ZERO);
        let start = Instant::now();

        let _ = with_retry(&gate, "test", || async {
            Err::<i32, _>(congress_api::Error::RateLimited)
        })
        .await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(15), "elapsed: {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(19), "elapsed: {:?}", elapsed);
    }

    #[test]
    fn backoff_delay_is_capped() {
        for attempt in 0..20 {
            assert!(backoff_delay(attempt) <= BACKOFF_CAP + Duration::from_secs(1));
        }
    }

    #[test]
    fn tracker_counters() {
        let tracker = RequestTracker::new();
        tracker.record_success();
        tracker.record_success();
        tracker.record_retry();
        tracker.record_failure();
        tracker.record_backoff(Duration::from_secs(30));

        let summary = tracker.summary();
        assert_eq!(summary.calls_made, 4);
        assert_eq!(summary.calls_succeeded, 2);
        assert_eq!(summary.calls_retried, 1);
        assert_eq!(summary.calls_failed, 1);
        assert!((summary.total_backoff_secs - 30.0).abs() < 0.01);
    }
}
