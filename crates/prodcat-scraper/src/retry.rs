//! Bounded retry with randomized linear backoff.
//!
//! Transient failures (non-2xx status, timeout) are retried; once the attempt
//! budget is spent the controller yields `Ok(None)` so callers can degrade
//! instead of aborting. Every other error kind is returned immediately.

use std::future::Future;
use std::time::Duration;

use prodcat_core::ScraperConfig;

use crate::error::ScraperError;
use crate::random::RandomSource;

/// Attempt bound and jitter window for [`with_retry`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first. `0` behaves like `1`.
    pub max_attempts: u32,
    pub backoff_min_secs: f64,
    pub backoff_max_secs: f64,
}

impl RetryPolicy {
    #[must_use]
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff_min_secs: config.backoff_min_secs,
            backoff_max_secs: config.backoff_max_secs,
        }
    }

    /// Delay after failed attempt `attempt` (1-based): a uniform draw from the
    /// jitter window scaled by the attempt number.
    ///
    /// | Attempt | Sleep (defaults 10/20 s) |
    /// |---------|--------------------------|
    /// | 1       | 10–20 s                  |
    /// | 2       | 20–40 s                  |
    /// | 3       | 30–60 s                  |
    #[must_use]
    pub fn backoff_delay(&self, attempt: u32, random: &dyn RandomSource) -> Duration {
        let jitter = random.uniform(self.backoff_min_secs, self.backoff_max_secs);
        Duration::try_from_secs_f64(jitter * f64::from(attempt)).unwrap_or(Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ScraperConfig::default())
    }
}

/// Returns `true` for failures worth another attempt.
///
/// Connection-level transport errors, undecodable bodies, invalid URLs and
/// missing fields are not retried.
pub(crate) fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::HttpStatus { .. } | ScraperError::Timeout { .. }
    )
}

/// Runs `operation` up to `policy.max_attempts` times.
///
/// - `Ok(Some(value))` on the first success.
/// - `Ok(None)` when every attempt failed transiently.
/// - `Err(err)` as soon as a non-retriable error occurs.
///
/// No sleep follows the final attempt, so `n` exhausted attempts sleep `n - 1`
/// times.
///
/// # Errors
///
/// Returns the first non-retriable [`ScraperError`] produced by `operation`.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    random: &dyn RandomSource,
    mut operation: F,
) -> Result<Option<T>, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let max_attempts = policy.max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let err = match operation().await {
            Ok(value) => return Ok(Some(value)),
            Err(err) if !is_retriable(&err) => return Err(err),
            Err(err) => err,
        };

        if attempt == max_attempts {
            tracing::warn!(
                attempt,
                max_attempts,
                error = %err,
                "transient error on final attempt, giving up"
            );
            break;
        }

        let delay = policy.backoff_delay(attempt, random);
        tracing::warn!(
            attempt,
            max_attempts,
            delay_secs = delay.as_secs_f64(),
            error = %err,
            "transient error, retrying after backoff"
        );
        tokio::time::sleep(delay).await;
    }

    Ok(None)
}
