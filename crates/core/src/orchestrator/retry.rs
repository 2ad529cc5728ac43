//! Retry helper for flaky collaborators.

use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Run `operation` up to `attempts` times. The wait before attempt N+1 is
/// `base_delay * N`, growing linearly. `retryable` stops retries early for
/// errors that a second attempt can never fix.
pub async fn retry_with_backoff<T, E, F, Fut, R>(
    attempts: u32,
    base_delay: Duration,
    operation_name: &str,
    retryable: R,
    mut operation: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    R: Fn(&E) -> bool,
{
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < attempts && retryable(&error) => {
                let delay = base_delay * attempt;
                warn!(
                    error = %error,
                    attempt,
                    attempts,
                    delay_ms = delay.as_millis() as u64,
                    "{operation_name} failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = retry_with_backoff(
            3,
            Duration::from_millis(1),
            "test operation",
            |_| true,
            || async {
                let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if call < 3 {
                    Err(format!("transient {call}"))
                } else {
                    Ok(call)
                }
            },
        )
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_returns_last_error_when_attempts_exhausted() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = retry_with_backoff(
            2,
            Duration::from_millis(1),
            "test operation",
            |_| true,
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("still down".to_string())
            },
        )
        .await;

        assert_eq!(result.unwrap_err(), "still down");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_fast() {
        let calls = AtomicU32::new(0);
        let result: Result<(), String> = retry_with_backoff(
            5,
            Duration::from_millis(1),
            "test operation",
            |error: &String| error != "permanent",
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("permanent".to_string())
            },
        )
        .await;

        assert_eq!(result.unwrap_err(), "permanent");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
