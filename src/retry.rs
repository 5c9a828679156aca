//! Fixed-delay retry for network operations.
//!
//! Every failed attempt is classified through [`Error::retry_class`]:
//! transport failures wait the configured delay before the next attempt,
//! protocol failures (non-200 status, undecodable or rejected body) move
//! straight to the next attempt, and fatal failures end the loop at once.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::error::{Error, RetryClass};

/// Default number of attempts per operation.
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Default delay between attempts after a transport failure, in seconds.
pub const DEFAULT_DELAY_SECS: f64 = 5.0;

/// Retry budget for a single operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Seconds to wait after a transport failure.
    #[serde(default = "default_delay")]
    pub delay: f64,
}

fn default_attempts() -> u32 {
    DEFAULT_ATTEMPTS
}

fn default_delay() -> f64 {
    DEFAULT_DELAY_SECS
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay: DEFAULT_DELAY_SECS,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with an explicit delay.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts,
            delay: delay.as_secs_f64(),
        }
    }

    /// Delay between attempts as a [`Duration`].
    ///
    /// Negative or unrepresentable values mean no delay; configuration
    /// validation rejects them before a policy is built from a file.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay).unwrap_or(Duration::ZERO)
    }
}

/// Run `operation` until it succeeds or the policy's attempts run out.
///
/// `operation` receives the 1-based attempt number. The last error is
/// returned when every attempt failed.
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, label: &str, mut operation: F) -> Result<T, Error>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;

    loop {
        let err = match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(attempt, "{} succeeded after retry", label);
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        let class = err.retry_class();
        tracing::error!(
            error = %err,
            attempt,
            max_attempts = attempts,
            "{} attempt {} failed",
            label,
            attempt
        );

        if class == RetryClass::Fatal || attempt >= attempts {
            return Err(err);
        }

        if class == RetryClass::Transient {
            sleep(policy.delay()).await;
        }

        attempt += 1;
    }
}
