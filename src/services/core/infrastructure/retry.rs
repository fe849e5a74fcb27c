// src/services/core/infrastructure/retry.rs
//! Retry policy for outbound provider requests.
//!
//! Plain exponential backoff without circuit breaker state. Call sites pass
//! their own `RetryConfig` and the helper reruns the operation until it
//! succeeds, exhausts its attempts, or fails with an error that retrying
//! cannot fix (client errors and rate limits are returned as-is).

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::log_warn;
use crate::utils::{MovieRecError, MovieRecResult};

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Enable retry functionality
    pub enabled: bool,
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,
    /// Initial delay between retries (milliseconds)
    pub initial_delay_ms: u64,
    /// Maximum delay between retries (milliseconds)
    pub max_delay_ms: u64,
    /// Backoff multiplier (exponential backoff)
    pub backoff_multiplier: f64,
    /// Enable jitter to prevent thundering herd
    pub enable_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            initial_delay_ms: 1000,
            max_delay_ms: 10_000,
            backoff_multiplier: 2.0,
            enable_jitter: true,
        }
    }
}

impl RetryConfig {
    /// Validate configuration
    pub fn validate(&self) -> MovieRecResult<()> {
        if self.max_attempts == 0 {
            return Err(MovieRecError::config_error(
                "Max attempts must be greater than 0",
            ));
        }

        if self.initial_delay_ms == 0 {
            return Err(MovieRecError::config_error(
                "Initial delay must be greater than 0",
            ));
        }

        if self.max_delay_ms < self.initial_delay_ms {
            return Err(MovieRecError::config_error(
                "Max delay must be greater than or equal to initial delay",
            ));
        }

        if self.backoff_multiplier <= 1.0 {
            return Err(MovieRecError::config_error(
                "Backoff multiplier must be greater than 1.0",
            ));
        }

        Ok(())
    }
}

/// Next backoff delay: scales by the multiplier, clamped to the maximum.
fn next_delay(current_ms: u64, config: &RetryConfig) -> u64 {
    let scaled = ((current_ms as f64) * config.backoff_multiplier) as u64;
    scaled.min(config.max_delay_ms)
}

/// Adds up to 10% extra delay so concurrent callers do not wake in lockstep.
fn apply_jitter(delay_ms: u64) -> u64 {
    let jitter = (delay_ms as f64 * 0.1 * rand::random::<f64>()) as u64;
    delay_ms.saturating_add(jitter)
}

/// Run `operation` with exponential backoff.
///
/// Only errors whose kind is retryable (timeouts, network failures, upstream
/// 5xx) trigger another attempt. Everything else, including rate limiting,
/// is returned immediately.
pub async fn run_with_retry<T, F, Fut>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> MovieRecResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = MovieRecResult<T>>,
{
    if !config.enabled {
        return operation().await;
    }

    let mut attempt = 1;
    let mut delay = config.initial_delay_ms;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() && attempt < config.max_attempts => {
                log_warn!(&format!(
                    "Attempt {} of '{}' failed: {}. Retrying in {}ms...",
                    attempt, operation_name, e, delay
                ));

                let wait = if config.enable_jitter {
                    apply_jitter(delay)
                } else {
                    delay
                };
                tokio::time::sleep(tokio::time::Duration::from_millis(wait)).await;

                delay = next_delay(delay, config);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
