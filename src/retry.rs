//! Convergence retrier.
//!
//! Wraps a confirmation probe that must observe the remote system settle
//! after a state change (e.g. an unfollow not yet reflected by reads).
//! Polls on a bounded schedule with exponential backoff; hard errors stop
//! the loop immediately and are never retried.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::RetryConfig;

/// Outcome of a convergence poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Convergence<E> {
    /// The desired end-state was observed.
    Converged,

    /// The attempt budget (or the caller's cancellation) ran out first.
    TimedOut,

    /// A probe failed hard; surfaced immediately without further polls.
    Failed(E),
}

/// Polling schedule for [`converge`].
#[derive(Debug, Clone)]
pub struct ConvergePolicy {
    /// Maximum number of probes
    pub max_attempts: u32,

    /// Delay before the second probe
    pub initial_delay: Duration,

    /// Backoff ceiling
    pub max_delay: Duration,
}

impl Default for ConvergePolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl From<&RetryConfig> for ConvergePolicy {
    fn from(retry: &RetryConfig) -> Self {
        Self {
            max_attempts: retry.max_attempts,
            initial_delay: Duration::from_millis(retry.initial_delay_ms),
            max_delay: Duration::from_millis(retry.max_delay_ms),
        }
    }
}

/// Poll `probe` until it reports convergence, a hard error, or the budget
/// is exhausted.
///
/// The probe returns `Ok(true)` when the desired end-state is visible,
/// `Ok(false)` while the remote has not settled yet, and `Err` for hard
/// failures. Cancellation between polls reports [`Convergence::TimedOut`].
pub async fn converge<F, Fut, E>(
    policy: &ConvergePolicy,
    cancel: &CancellationToken,
    mut probe: F,
) -> Convergence<E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    let mut delay = policy.initial_delay;

    for attempt in 1..=policy.max_attempts {
        if cancel.is_cancelled() {
            return Convergence::TimedOut;
        }

        match probe().await {
            Ok(true) => return Convergence::Converged,
            Ok(false) => {
                debug!(attempt, "remote state not yet converged");
                if attempt == policy.max_attempts {
                    break;
                }
                tokio::select! {
                    () = cancel.cancelled() => return Convergence::TimedOut,
                    () = tokio::time::sleep(delay) => {}
                }
                delay = std::cmp::min(delay * 2, policy.max_delay);
            }
            Err(e) => return Convergence::Failed(e),
        }
    }

    Convergence::TimedOut
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> ConvergePolicy {
        ConvergePolicy {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    #[test]
    fn policy_from_retry_config() {
        let policy = ConvergePolicy::from(&RetryConfig {
            max_attempts: 5,
            initial_delay_ms: 250,
            max_delay_ms: 2000,
        });
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.initial_delay, Duration::from_millis(250));
        assert_eq!(policy.max_delay, Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn converges_immediately() {
        let outcome: Convergence<()> = converge(
            &fast_policy(3),
            &CancellationToken::new(),
            || async { Ok(true) },
        )
        .await;
        assert_eq!(outcome, Convergence::Converged);
    }

    #[tokio::test]
    async fn converges_after_transient_misses() {
        let polls = AtomicU32::new(0);
        let outcome: Convergence<()> = converge(&fast_policy(5), &CancellationToken::new(), || {
            let n = polls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(n >= 2) }
        })
        .await;

        assert_eq!(outcome, Convergence::Converged);
        assert_eq!(polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn budget_exhaustion_times_out() {
        let polls = AtomicU32::new(0);
        let outcome: Convergence<()> = converge(&fast_policy(3), &CancellationToken::new(), || {
            polls.fetch_add(1, Ordering::SeqCst);
            async { Ok(false) }
        })
        .await;

        assert_eq!(outcome, Convergence::TimedOut);
        assert_eq!(polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn hard_error_stops_polling() {
        let polls = AtomicU32::new(0);
        let outcome = converge(&fast_policy(5), &CancellationToken::new(), || {
            polls.fetch_add(1, Ordering::SeqCst);
            async { Err::<bool, &str>("connection reset") }
        })
        .await;

        assert_eq!(outcome, Convergence::Failed("connection reset"));
        assert_eq!(polls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancellation_short_circuits() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome: Convergence<()> =
            converge(&fast_policy(5), &cancel, || async { Ok(false) }).await;
        assert_eq!(outcome, Convergence::TimedOut);
    }
}
