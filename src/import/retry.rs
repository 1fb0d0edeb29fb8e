use crate::config::RetryConfig;
use crate::import::error::ImportError;
use crate::store::StoreError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Backoff state for one retryable remote operation.
///
/// Every call site creates a fresh instance and drives it in a loop: check
/// [`should_retry`](Self::should_retry) before each attempt (including the
/// first), attempt the call, and report failures through
/// [`on_failure`](Self::on_failure). Rate-limited failures sleep exactly the
/// server-suggested duration; generic transient failures sleep the current
/// backoff, which then grows multiplicatively up to a cap. Once the attempt
/// count or the cumulative wait budget is spent, `should_retry` stays false
/// and the instance never sleeps again.
pub struct BackoffRetryPolicy {
    config: RetryConfig,
    attempts: u32,
    current_backoff: Duration,
    total_waited: Duration,
}

impl BackoffRetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        let current_backoff = config.initial_backoff;
        Self {
            config,
            attempts: 0,
            current_backoff,
            total_waited: Duration::ZERO,
        }
    }

    /// True while another attempt is allowed.
    pub fn should_retry(&self) -> bool {
        self.attempts < self.config.max_attempts
            && self.total_waited <= self.config.max_total_wait
    }

    /// Failures recorded so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Record a failure and sleep for the computed delay.
    pub async fn on_failure(&mut self, error: &StoreError) {
        let delay = self.record_failure(error);
        sleep(delay).await;
    }

    /// State update for one failure; returns how long to wait before the next
    /// attempt. Split from the sleep so the schedule is testable.
    fn record_failure(&mut self, error: &StoreError) -> Duration {
        self.attempts += 1;
        let delay = match error.retry_after() {
            // Server-dictated wait, no jitter or growth applied.
            Some(hint) => hint,
            None => {
                let delay = self.current_backoff;
                self.current_backoff =
                    (self.current_backoff * self.config.backoff_factor).min(self.config.max_backoff);
                delay
            }
        };
        self.total_waited += delay;
        delay
    }
}

/// Run `op` under a fresh retry policy.
///
/// Transient failures sleep and retry; fatal failures escape immediately
/// without consuming the policy; exhaustion surfaces the last transient
/// failure as the root cause. This is the single retry loop shared by every
/// remote call site.
pub async fn execute_with_retry<T, F, Fut>(
    config: &RetryConfig,
    mut op: F,
) -> Result<T, ImportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut policy = BackoffRetryPolicy::new(config.clone());
    let mut last_error: Option<StoreError> = None;

    while policy.should_retry() {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_transient() => {
                log::warn!(
                    "transient store error (attempt {}): {}",
                    policy.attempts() + 1,
                    error
                );
                policy.on_failure(&error).await;
                last_error = Some(error);
            }
            Err(error) => return Err(ImportError::Store(error)),
        }
    }

    match last_error {
        Some(source) => Err(ImportError::RetriesExhausted {
            attempts: policy.attempts(),
            source,
        }),
        None => Err(ImportError::NoAttemptsPermitted),
    }
}
