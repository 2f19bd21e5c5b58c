//! Retry with exponential back-off and jitter for read requests.
//!
//! [`retry_with_backoff`] wraps a fallible async operation and retries on
//! transient errors (network failures, 429, 5xx). When the server names a
//! wait in `Retry-After`, that wait is used instead of the computed back-off.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

const MAX_DELAY: Duration = Duration::from_secs(30);

/// Returns `true` for errors that are worth retrying after a delay.
///
/// **Retriable:** timeouts, connection failures, HTTP 429 and HTTP 5xx.
///
/// **Not retriable:** other 4xx responses (including 404), API-level
/// failures and malformed bodies.
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        ClientError::RateLimited { .. } => true,
        ClientError::UnexpectedStatus { status, .. } => *status >= 500,
        ClientError::Api(_)
        | ClientError::Deserialize { .. }
        | ClientError::Serialize { .. }
        | ClientError::NotFound { .. }
        | ClientError::InvalidBaseUrl { .. } => false,
    }
}

/// The wait the server asked for, if the error carries one.
fn requested_delay(err: &ClientError) -> Option<Duration> {
    match err {
        ClientError::RateLimited {
            retry_after_secs, ..
        }
        | ClientError::UnexpectedStatus {
            retry_after_secs, ..
        } => retry_after_secs.map(Duration::from_secs),
        _ => None,
    }
}

/// Computed wait before retry number `attempt` (1-based).
///
/// `backoff_base_ms × 2^(attempt-1)`, capped at [`MAX_DELAY`], then scaled
/// by `0.75 + jitter / 2` so a `jitter` in `[0, 1)` spreads it ±25 %.
fn backoff_delay(attempt: u32, backoff_base_ms: u64, jitter: f64) -> Duration {
    let exponent = attempt.saturating_sub(1).min(10);
    let base = Duration::from_millis(backoff_base_ms.saturating_mul(1u64 << exponent));
    base.min(MAX_DELAY).mul_f64(0.75 + jitter * 0.5)
}

fn next_delay(attempt: u32, backoff_base_ms: u64, err: &ClientError) -> Duration {
    match requested_delay(err) {
        Some(requested) => requested.min(MAX_DELAY),
        None => backoff_delay(attempt, backoff_base_ms, rand::random::<f64>()),
    }
}

/// Runs `operation`, retrying transient failures up to `max_retries` times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_retries && is_retriable(&err) => err,
            Err(err) => return Err(err),
        };
        attempt += 1;
        let delay = next_delay(attempt, backoff_base_ms, &err);
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            server_requested = requested_delay(&err).is_some(),
            error = %err,
            "dashboard API transient error, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}
