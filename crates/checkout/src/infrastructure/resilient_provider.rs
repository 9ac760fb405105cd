//! Resilient option provider wrapper with per-attempt timeout and
//! exponential backoff retry
//!
//! Wraps any OptionProviderPort implementation so transient commerce failures
//! do not immediately leave a stage `Failed`.

use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use storefront_domain::{ResolutionContext, SelectionOption, StageId};

use crate::infrastructure::ports::{OptionProviderPort, ProviderError};

/// Configuration for retry behavior
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 = no retries, just the initial attempt)
    pub max_retries: u32,
    /// Base delay in milliseconds before first retry
    pub base_delay_ms: u64,
    /// Maximum delay in milliseconds (caps exponential growth)
    pub max_delay_ms: u64,
    /// Jitter factor (0.0-1.0) for randomizing delays
    pub jitter_factor: f64,
    /// Time budget for a single attempt
    pub attempt_timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 250,
            max_delay_ms: 5000,
            jitter_factor: 0.2,
            attempt_timeout_ms: 10_000,
        }
    }
}

/// Wrapper that adds timeouts and retries to any option provider
pub struct ResilientOptionProvider {
    inner: Arc<dyn OptionProviderPort>,
    config: RetryConfig,
}

impl ResilientOptionProvider {
    pub fn new(inner: Arc<dyn OptionProviderPort>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// Calculate delay for a given attempt number using exponential backoff with jitter
    fn calculate_delay(&self, attempt: u32) -> u64 {
        let base = self.config.base_delay_ms;
        // Exponential: base * 2^(attempt-1)
        let exponential = base.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        let capped = exponential.min(self.config.max_delay_ms);

        let jitter_range = (capped as f64 * self.config.jitter_factor) as i64;
        if jitter_range > 0 {
            let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
            (capped as i64 + jitter).max(0) as u64
        } else {
            capped
        }
    }

    async fn attempt(
        &self,
        stage: &StageId,
        context: &ResolutionContext,
    ) -> Result<Vec<SelectionOption>, ProviderError> {
        let timeout_ms = self.config.attempt_timeout_ms;
        match tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            self.inner.fetch_options(stage, context),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout { timeout_ms }),
        }
    }
}

#[async_trait]
impl OptionProviderPort for ResilientOptionProvider {
    async fn fetch_options(
        &self,
        stage: &StageId,
        context: &ResolutionContext,
    ) -> Result<Vec<SelectionOption>, ProviderError> {
        let mut attempt = 0;
        loop {
            match self.attempt(stage, context).await {
                Ok(options) => {
                    if attempt > 0 {
                        tracing::info!(
                            attempt = attempt + 1,
                            stage = %stage,
                            "Option request succeeded after retry"
                        );
                    }
                    return Ok(options);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.calculate_delay(attempt);
                    tracing::warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        delay_ms = delay,
                        error = %e,
                        stage = %stage,
                        "Option request failed, retrying..."
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => {
                    tracing::error!(
                        attempts = attempt + 1,
                        retryable = e.is_retryable(),
                        error = %e,
                        stage = %stage,
                        "Option request failed"
                    );
                    return Err(e);
                }
            }
        }
    }
}
