//! Bounded retry on transport-level failures.
//!
//! Only errors raised while exchanging bytes with the server (connect,
//! timeout, reset, body read) consume the budget. HTTP status codes are
//! never retried here; they come back as ordinary responses.

use std::future::Future;
use std::time::Duration;

use crate::error::DominosError;

const MAX_DELAY_MS: u64 = 30_000;

/// Short label for the kind of transport failure, for log fields.
fn transport_kind(err: &reqwest::Error) -> &'static str {
    if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else if err.is_body() || err.is_decode() {
        "body"
    } else if err.is_request() {
        "request"
    } else {
        "other"
    }
}

/// Back-off before the `attempt`-th retry: `base * 2^(attempt-1)` ± 25% jitter,
/// capped at 30 s. A zero base disables sleeping entirely.
fn backoff_delay(backoff_base_ms: u64, attempt: u32) -> Duration {
    if backoff_base_ms == 0 {
        return Duration::ZERO;
    }
    let computed = backoff_base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    Duration::from_millis(delay_ms)
}

/// Runs `operation` up to `budget` times in total, retrying only on
/// transport errors.
///
/// Every failed attempt logs a warning with the remaining budget, the last
/// one included. When the budget runs out the failure is also logged at
/// error level and returned as
/// [`DominosError::TransportExhausted`] carrying the last underlying error.
/// A budget of `0` is treated as a single attempt.
pub(crate) async fn retry_transport<T, F, Fut>(
    budget: u32,
    backoff_base_ms: u64,
    method: &str,
    url: &str,
    mut operation: F,
) -> Result<T, DominosError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, reqwest::Error>>,
{
    let attempts = budget.max(1);
    let mut remaining = attempts;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        remaining -= 1;

        let delay = if remaining == 0 {
            Duration::ZERO
        } else {
            backoff_delay(backoff_base_ms, attempts - remaining)
        };
        tracing::warn!(
            method,
            url,
            remaining,
            kind = transport_kind(&err),
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "transport error"
        );

        if remaining == 0 {
            tracing::error!(
                method,
                url,
                attempts,
                kind = transport_kind(&err),
                error = %err,
                "download error: retry budget exhausted"
            );
            return Err(DominosError::TransportExhausted {
                method: method.to_owned(),
                url: url.to_owned(),
                attempts,
                source: err,
            });
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    use super::*;

    /// Counts warn and error events emitted while installed.
    #[derive(Clone, Default)]
    struct LevelCounter {
        warnings: Arc<AtomicU32>,
        errors: Arc<AtomicU32>,
    }

    impl<S: tracing::Subscriber> Layer<S> for LevelCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            match *event.metadata().level() {
                tracing::Level::WARN => self.warnings.fetch_add(1, Ordering::SeqCst),
                tracing::Level::ERROR => self.errors.fetch_add(1, Ordering::SeqCst),
                _ => 0,
            };
        }
    }

    /// Produces a real connect error by dialing a port nothing listens on.
    async fn connect_error() -> reqwest::Error {
        reqwest::Client::new()
            .get("http://0.0.0.0:1")
            .send()
            .await
            .unwrap_err()
    }

    /// Fails `failures` times, then yields `7`.
    async fn run_with(budget: u32, failures: u32) -> (Result<u32, DominosError>, u32) {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_transport(budget, 0, "GET", "http://test/", || {
            let c = Arc::clone(&c);
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst);
                if n < failures {
                    Err(connect_error().await)
                } else {
                    Ok(7)
                }
            }
        })
        .await;
        (result, calls.load(Ordering::SeqCst))
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let (result, calls) = run_with(5, 0).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn succeeds_when_budget_covers_failures() {
        // fails N-1 = 2 times, budget N = 3
        let (result, calls) = run_with(3, 2).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn exhausts_when_budget_is_short() {
        // fails N-1 = 3 times, budget 3 < N = 4
        let (result, calls) = run_with(3, 3).await;
        assert_eq!(calls, 3, "must stop after the budget is spent");
        assert!(
            matches!(result, Err(DominosError::TransportExhausted { attempts: 3, .. })),
            "got: {result:?}"
        );
    }

    #[tokio::test]
    async fn zero_budget_still_makes_one_attempt() {
        let (result, calls) = run_with(0, 0).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn every_failed_attempt_logs_a_warning() {
        let counter = LevelCounter::default();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(counter.clone()));

        let (result, calls) = run_with(3, 3).await;

        assert!(result.is_err());
        assert_eq!(calls, 3);
        assert_eq!(counter.warnings.load(Ordering::SeqCst), 3);
        assert_eq!(counter.errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn recovered_failures_log_no_error() {
        let counter = LevelCounter::default();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(counter.clone()));

        let (result, _) = run_with(3, 1).await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(counter.warnings.load(Ordering::SeqCst), 1);
        assert_eq!(counter.errors.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn zero_backoff_never_sleeps() {
        assert_eq!(backoff_delay(0, 3), Duration::ZERO);
    }

    #[test]
    fn backoff_grows_and_is_capped() {
        let first = backoff_delay(1_000, 1);
        assert!(first >= Duration::from_millis(750) && first <= Duration::from_millis(1_250));
        let huge = backoff_delay(1_000, 20);
        assert!(huge <= Duration::from_millis(37_500));
    }
}
