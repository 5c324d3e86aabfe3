//! Linear-backoff retry for transient transport failures

use std::future::Future;
use std::time::Duration;

use rhc_domain::{BrokerError, ErrorKind};

use crate::ports::TransportError;

/// Bounded retry with a linearly growing delay.
///
/// Only [`TransportError::Timeout`] and [`TransportError::ConnectionReset`]
/// are retried. The delay before retry `n` (1-based) is `base_delay * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay unit.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy.
    #[must_use]
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Delay before the given retry (1-based).
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(retry)
    }

    /// Runs `operation` until it succeeds, fails with a non-retryable error,
    /// or the retries are used up. The closure receives the attempt number,
    /// starting at 0.
    ///
    /// # Errors
    ///
    /// Returns the last transport error.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, TransportError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut attempt = 0;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        retry = attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis(),
                        error = %error,
                        "retrying broker request"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

/// Converts a transport failure into the error surfaced to the user.
#[must_use]
pub fn transport_failure(error: TransportError) -> BrokerError {
    match error {
        TransportError::Timeout(detail) => BrokerError::new(
            ErrorKind::Timeout,
            format!(
                "The server did not respond in time. It is possible the operation finished \
                 without being able to report success. ({detail})"
            ),
        ),
        TransportError::ConnectionReset(detail) => BrokerError::new(
            ErrorKind::Connection,
            format!(
                "Connection to server got interrupted. It is possible the operation finished \
                 without being able to report success. ({detail})"
            ),
        ),
        TransportError::Ssl(detail) => BrokerError::resource_access(format!(
            "An SSL connection could not be established to the server: {detail}"
        )),
        TransportError::Certificate(detail) => BrokerError::resource_access(format!(
            "The server's certificate could not be verified: {detail}. \
             Pass --insecure to skip verification."
        )),
        other => BrokerError::resource_access(format!(
            "Failed to access resource: {other}"
        )),
    }
}
