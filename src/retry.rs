//! Retry logic with fixed backoff and proxy rotation
//!
//! This module provides the retry driver wrapped around every single-attempt
//! fetch. The backoff interval is fixed (no exponential growth, no jitter):
//! the knob for gentler pacing is the wave size, not the retry schedule.
//!
//! The retry budget depends on the proxy mode: a constant number of attempts
//! without a proxy pool, or `attempts_per_proxy * pool size` with one, so the
//! round-robin rotation is amortized across every endpoint. All per-request
//! state (attempt counter, current proxy) is local to one driver call, which
//! makes concurrent fetches rotate independently.
//!
//! # Example
//!
//! ```no_run
//! use wavefetch::config::RetryConfig;
//! use wavefetch::error::Error;
//! use wavefetch::retry::fetch_with_retry;
//!
//! # async fn example() -> Result<(), Error> {
//! let config = RetryConfig::default();
//! let result = fetch_with_retry(&config, None, |_proxy| async {
//!     // Your single-attempt operation here
//!     Ok::<_, Error>(())
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;

use crate::config::RetryConfig;
use crate::error::{Error, TransportError};
use crate::proxy::ProxyRotator;

/// Trait for errors that can be classified as retryable or not
///
/// Transient failures (timeouts, connection resets, DNS hiccups) should return
/// `true`. Caller errors and configuration problems should return `false`.
pub trait IsRetryable {
    /// Returns true if the error is transient and the operation should be retried
    fn is_retryable(&self) -> bool;
}

/// Implementation of IsRetryable for our Error type
impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            // A missing per-proxy client is a setup inconsistency, not a flaky network
            Error::Transport(TransportError::Proxy(_)) => false,
            // Every other transport failure is transient
            Error::Transport(_) => true,
            // Caller errors are programmer mistakes, retrying cannot fix them
            Error::InvalidArgument(_) | Error::UnsupportedMethod(_) => false,
            // Already terminal
            Error::RetriesExhausted { .. } => false,
            // Configuration problems need operator action
            Error::Config { .. } => false,
            // The bytes arrived; the remote is not misbehaving transiently
            Error::Decode(_) => false,
            // Local file access problems are permanent
            Error::Io(_) => false,
        }
    }
}

/// Per-request retry state: attempt counter, current proxy, computed budget
///
/// Created when the driver starts and dropped when it resolves; never shared
/// between requests.
struct RetryState {
    attempts: u32,
    budget: u32,
    proxy: Option<String>,
}

impl RetryState {
    fn new(config: &RetryConfig, rotator: Option<&ProxyRotator>) -> Self {
        let budget = match rotator {
            Some(r) => config.attempts_per_proxy.saturating_mul(r.len() as u32),
            None => config.max_attempts,
        };
        Self {
            attempts: 0,
            budget,
            proxy: rotator.map(|r| r.first().to_string()),
        }
    }
}

/// Execute a single-attempt operation under the retry policy
///
/// The operation receives the proxy endpoint to use for this attempt (`None`
/// in no-proxy mode). On each transient failure the driver logs the cause,
/// rotates to the next proxy when a rotator is present, sleeps the fixed
/// backoff, and tries again until the budget is consumed, at which point it
/// fails with [`Error::RetriesExhausted`]. Non-retryable errors surface
/// immediately without consuming budget or sleeping.
pub async fn fetch_with_retry<F, Fut, T>(
    config: &RetryConfig,
    rotator: Option<&ProxyRotator>,
    mut operation: F,
) -> Result<T, Error>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let mut state = RetryState::new(config, rotator);

    loop {
        match operation(state.proxy.clone()).await {
            Ok(result) => {
                if state.attempts > 0 {
                    tracing::info!(
                        attempts = state.attempts + 1,
                        "Request succeeded after retry"
                    );
                }
                return Ok(result);
            }
            Err(e) if !e.is_retryable() => {
                tracing::error!(error = %e, "Request failed with non-retryable error");
                return Err(e);
            }
            Err(e) => {
                state.attempts += 1;

                if state.attempts >= state.budget {
                    tracing::error!(
                        error = %e,
                        attempts = state.attempts,
                        "Request failed after all retry attempts exhausted"
                    );
                    return Err(Error::RetriesExhausted {
                        attempts: state.attempts,
                    });
                }

                tracing::warn!(
                    error = %e,
                    attempt = state.attempts,
                    budget = state.budget,
                    proxy = state.proxy.as_deref().unwrap_or("direct"),
                    "Request failed, retrying"
                );

                if let (Some(r), Some(current)) = (rotator, state.proxy.as_deref()) {
                    state.proxy = Some(r.next(current)?.to_string());
                }

                tokio::time::sleep(config.backoff).await;
            }
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::ProxyList;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn fast_config() -> RetryConfig {
        RetryConfig {
            backoff: Duration::from_millis(1),
            ..Default::default()
        }
    }

    fn transient() -> Error {
        Error::Transport(TransportError::Timeout("simulated".to_string()))
    }

    fn rotator(endpoints: &[&str]) -> ProxyRotator {
        ProxyRotator::new(ProxyList::from_endpoints(endpoints.iter().copied())).unwrap()
    }

    #[tokio::test]
    async fn test_success_no_retry() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = fetch_with_retry(&fast_config(), None, |_proxy| {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Error>(42)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 1, "should only call once");
    }

    #[tokio::test]
    async fn test_retry_transient_then_succeed() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = fetch_with_retry(&fast_config(), None, |_proxy| {
            let counter = counter_clone.clone();
            async move {
                let count = counter.fetch_add(1, Ordering::SeqCst);
                if count < 2 { Err(transient()) } else { Ok(42) }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(
            counter.load(Ordering::SeqCst),
            3,
            "should retry twice before success"
        );
    }

    #[tokio::test]
    async fn no_proxy_mode_makes_exactly_five_attempts() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = fetch_with_retry(&fast_config(), None, |proxy| {
            let counter = counter_clone.clone();
            async move {
                assert!(proxy.is_none(), "no-proxy mode should pass None");
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(transient())
            }
        })
        .await;

        assert!(matches!(result, Err(Error::RetriesExhausted { attempts: 5 })));
        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn proxy_mode_budget_is_ten_times_pool_size() {
        let r = rotator(&["p1", "p2", "p3"]);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = fetch_with_retry(&fast_config(), Some(&r), |_proxy| {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(transient())
            }
        })
        .await;

        assert!(matches!(
            result,
            Err(Error::RetriesExhausted { attempts: 30 })
        ));
        assert_eq!(counter.load(Ordering::SeqCst), 30, "10 attempts per proxy");
    }

    #[tokio::test]
    async fn attempt_i_uses_proxy_i_minus_one_mod_pool_size() {
        let endpoints = ["p1", "p2", "p3"];
        let r = rotator(&endpoints);
        let used = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let used_clone = used.clone();

        let _result = fetch_with_retry(&fast_config(), Some(&r), |proxy| {
            let used = used_clone.clone();
            async move {
                used.lock().await.push(proxy.unwrap());
                Err::<i32, _>(transient())
            }
        })
        .await;

        let used = used.lock().await;
        assert_eq!(used.len(), 30);
        for (i, proxy) in used.iter().enumerate() {
            assert_eq!(
                proxy,
                endpoints[i % endpoints.len()],
                "attempt {} should use proxy list[{}]",
                i + 1,
                i % endpoints.len()
            );
        }
    }

    #[tokio::test]
    async fn non_retryable_error_surfaces_immediately() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = fetch_with_retry(&fast_config(), None, |_proxy| {
            let counter = counter_clone.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(Error::UnsupportedMethod("delete".to_string()))
            }
        })
        .await;

        assert!(matches!(result, Err(Error::UnsupportedMethod(_))));
        assert_eq!(
            counter.load(Ordering::SeqCst),
            1,
            "should not retry a programmer error"
        );
    }

    #[tokio::test]
    async fn backoff_is_a_fixed_interval() {
        let config = RetryConfig {
            max_attempts: 4,
            backoff: Duration::from_millis(50),
            ..Default::default()
        };

        let timestamps = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        let ts_clone = timestamps.clone();

        let _result = fetch_with_retry(&config, None, |_proxy| {
            let ts = ts_clone.clone();
            async move {
                ts.lock().await.push(std::time::Instant::now());
                Err::<i32, _>(transient())
            }
        })
        .await;

        let ts = timestamps.lock().await;
        assert_eq!(ts.len(), 4);

        // Every inter-attempt gap should be ~50ms, with tolerance for scheduling
        for i in 1..ts.len() {
            let gap = ts[i].duration_since(ts[i - 1]);
            assert!(
                gap >= Duration::from_millis(40),
                "gap {i} should be at least the backoff, was {gap:?}"
            );
            assert!(
                gap < Duration::from_millis(500),
                "gap {i} should not grow, was {gap:?}"
            );
        }
    }

    #[test]
    fn transport_errors_are_retryable_except_proxy_dispatch() {
        assert!(Error::Transport(TransportError::Timeout("t".into())).is_retryable());
        assert!(Error::Transport(TransportError::Connect("c".into())).is_retryable());
        assert!(Error::Transport(TransportError::Request("r".into())).is_retryable());
        assert!(Error::Transport(TransportError::Body("b".into())).is_retryable());
        assert!(!Error::Transport(TransportError::Proxy("p".into())).is_retryable());
    }

    #[test]
    fn caller_and_config_errors_are_not_retryable() {
        assert!(!Error::InvalidArgument("x".into()).is_retryable());
        assert!(!Error::UnsupportedMethod("delete".into()).is_retryable());
        assert!(!Error::RetriesExhausted { attempts: 5 }.is_retryable());
        assert!(!Error::config("bad", None).is_retryable());
        assert!(
            !Error::Decode(serde_json::from_str::<String>("bad json").unwrap_err()).is_retryable()
        );
        assert!(
            !Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")).is_retryable()
        );
    }
}
