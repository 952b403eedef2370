//! Retry policy for catalog requests.
//!
//! Listing and search requests get the initial attempt plus one retry,
//! whatever the failure. Failures are classified into a [`FailureType`] that
//! only picks the delay before the next attempt. Detail candidates are tried
//! once each; the candidate chain is their fallback.
//!
//! # Example
//!
//! ```
//! use catalog_core::catalog::{CatalogError, FailureType, RetryDecision, RetryPolicy, classify_error};
//!
//! let policy = RetryPolicy::default();
//! let error = CatalogError::http_status("https://openlibrary.org/search.json", 503);
//!
//! assert_eq!(classify_error(&error), FailureType::Transient);
//! assert!(matches!(policy.should_retry(FailureType::Transient, 1), RetryDecision::Retry { .. }));
//! assert!(matches!(policy.should_retry(FailureType::Permanent, 1), RetryDecision::Retry { .. }));
//! assert!(matches!(policy.should_retry(FailureType::Transient, 2), RetryDecision::DoNotRetry { .. }));
//! ```

use std::time::Duration;

use rand::Rng;
use tracing::{debug, instrument};

use super::CatalogError;

/// Default attempts for listing and search requests (one automatic retry).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;

/// Default base delay before the first retry.
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(200);

/// Default maximum delay cap.
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(2);

/// Default backoff multiplier (doubles each attempt).
const DEFAULT_BACKOFF_MULTIPLIER: f32 = 2.0;

/// Default maximum jitter added to delays.
const DEFAULT_MAX_JITTER: Duration = Duration::from_millis(100);

/// Classification of request failures; selects the retry delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Timeouts, 5xx and connection errors: exponential backoff.
    Transient,
    /// 404, other 4xx and malformed payloads: retried without delay.
    Permanent,
    /// Server rate limiting (HTTP 429): waits the maximum delay.
    RateLimited,
}

/// Decision on whether to retry a failed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after the specified delay.
    Retry {
        /// How long to wait before retrying.
        delay: Duration,
        /// Which attempt number this will be (1-indexed, so first retry is attempt 2).
        attempt: u32,
    },
    /// Give up.
    DoNotRetry {
        /// Human-readable reason why retry is not attempted.
        reason: String,
    },
}

/// Exponential backoff configuration.
///
/// ```text
/// delay = min(base_delay * multiplier^(attempt - 1), max_delay) + jitter
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
    backoff_multiplier: f32,
    max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            max_jitter: DEFAULT_MAX_JITTER,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with custom settings.
    ///
    /// `max_attempts` includes the initial attempt and is clamped to at least 1.
    #[must_use]
    pub fn new(
        max_attempts: u32,
        base_delay: Duration,
        max_delay: Duration,
        backoff_multiplier: f32,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
            backoff_multiplier,
            max_jitter: DEFAULT_MAX_JITTER,
        }
    }

    /// Creates a policy with a custom attempt count and default delays.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    /// Creates a policy that retries immediately, with no backoff or jitter.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            max_jitter: Duration::ZERO,
        }
    }

    /// Returns the maximum number of attempts configured.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Determines whether to retry after `attempt` (1-indexed) failed.
    ///
    /// Every failure type is retried until `max_attempts` is reached.
    #[instrument(skip(self), fields(max_attempts = self.max_attempts))]
    pub fn should_retry(&self, failure_type: FailureType, attempt: u32) -> RetryDecision {
        if attempt >= self.max_attempts {
            debug!(attempt, max = self.max_attempts, "max attempts reached");
            return RetryDecision::DoNotRetry {
                reason: format!("max attempts ({}) exhausted", self.max_attempts),
            };
        }

        let delay = match failure_type {
            FailureType::Transient => self.calculate_delay(attempt),
            FailureType::Permanent => Duration::ZERO,
            FailureType::RateLimited => self.max_delay + self.calculate_jitter(),
        };
        debug!(
            attempt,
            ?failure_type,
            next_attempt = attempt + 1,
            delay_ms = delay.as_millis(),
            "will retry"
        );

        RetryDecision::Retry {
            delay,
            attempt: attempt + 1,
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn calculate_delay(&self, attempt: u32) -> Duration {
        let base_ms = self.base_delay.as_millis() as f64;
        let exponent = f64::from(attempt.saturating_sub(1));
        let delay_ms = base_ms * f64::from(self.backoff_multiplier).powf(exponent);
        let capped_ms = delay_ms.min(self.max_delay.as_millis() as f64);

        Duration::from_millis(capped_ms as u64) + self.calculate_jitter()
    }

    #[allow(clippy::cast_possible_truncation)]
    fn calculate_jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
    }
}

/// Classifies a catalog error for retry delays and logging.
///
/// | Error | Type |
/// |-------|------|
/// | `NetworkTimeout` | Transient |
/// | `NetworkError` without status | Transient |
/// | `NetworkError` 408 / 5xx | Transient |
/// | `NetworkError` 429 | RateLimited |
/// | `NetworkError` other status | Permanent |
/// | `NotFound`, `MalformedField`, `ClientInit` | Permanent |
#[must_use]
pub fn classify_error(error: &CatalogError) -> FailureType {
    match error {
        CatalogError::NetworkTimeout { .. } => FailureType::Transient,
        CatalogError::NetworkError { status: None, .. } => FailureType::Transient,
        CatalogError::NetworkError {
            status: Some(status),
            ..
        } => classify_http_status(*status),
        CatalogError::NotFound { .. }
        | CatalogError::MalformedField { .. }
        | CatalogError::ClientInit { .. } => FailureType::Permanent,
    }
}

#[allow(clippy::match_same_arms)]
fn classify_http_status(status: u16) -> FailureType {
    match status {
        408 => FailureType::Transient, // Request Timeout
        429 => FailureType::RateLimited,
        status if (500..600).contains(&status) => FailureType::Transient,
        _ => FailureType::Permanent,
    }
}
