//! Model invocation with lateral fallback and backoff retry.
//!
//! Two layers:
//! - [`ModelInvoker::try_all_models`] makes one pass over the ordered model list,
//!   moving to the next model on any invocation or structure error;
//! - [`ModelInvoker::invoke`] repeats whole passes with exponential backoff while
//!   the pass fails with a transient service error.

use crate::{FabulaConfig, RetryConfig, StoryPayload, validate_response};
use fabula_core::{GenerateRequest, PromptPair};
use fabula_error::{ConfigError, FabulaError, FabulaResult, StoryError, StoryErrorKind};
use fabula_interface::StoryDriver;
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, info, instrument, warn};

/// Delays between passes: `base * 2^attempt + random(0..=jitter)`.
///
/// Yields `max_attempts - 1` delays, one before each retry.
///
/// # Examples
///
/// ```
/// use fabula_narrative::{BackoffSchedule, RetryConfig};
/// use std::time::Duration;
///
/// let retry = RetryConfig { max_attempts: 3, base_delay_ms: 1000, jitter_ms: 0 };
/// let delays: Vec<Duration> = BackoffSchedule::new(&retry).collect();
/// assert_eq!(delays, vec![Duration::from_millis(1000), Duration::from_millis(2000)]);
/// ```
#[derive(Debug, Clone)]
pub struct BackoffSchedule {
    base_delay_ms: u64,
    jitter_ms: u64,
    attempt: u32,
    retries: u32,
}

impl BackoffSchedule {
    /// Schedule for the given retry policy.
    pub fn new(retry: &RetryConfig) -> Self {
        Self {
            base_delay_ms: retry.base_delay_ms,
            jitter_ms: retry.jitter_ms,
            attempt: 0,
            retries: retry.max_attempts.saturating_sub(1),
        }
    }
}

impl Iterator for BackoffSchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.attempt >= self.retries {
            return None;
        }

        let exponential = self
            .base_delay_ms
            .saturating_mul(2u64.saturating_pow(self.attempt));
        let jitter = if self.jitter_ms > 0 {
            rand::thread_rng().gen_range(0..=self.jitter_ms)
        } else {
            0
        };
        self.attempt += 1;

        Some(Duration::from_millis(exponential.saturating_add(jitter)))
    }
}

/// Result of asking one model for a payload.
#[derive(Debug)]
enum ModelOutcome<T> {
    /// The model answered and the answer validated
    Accepted(T),
    /// The call failed or the answer did not validate
    Rejected(FabulaError),
}

/// Asks an ordered list of models for a validated payload.
#[derive(Clone)]
pub struct ModelInvoker {
    driver: Arc<dyn StoryDriver>,
    models: Vec<String>,
    retry: RetryConfig,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl std::fmt::Debug for ModelInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelInvoker")
            .field("provider", &self.driver.provider_name())
            .field("models", &self.models)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl ModelInvoker {
    /// Create an invoker from the generation and retry settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the model list is empty or the retry
    /// policy allows no attempts.
    pub fn new(driver: Arc<dyn StoryDriver>, config: &FabulaConfig) -> FabulaResult<Self> {
        if config.generation.models.is_empty() {
            return Err(ConfigError::new("model list cannot be empty").into());
        }
        if config.retry.max_attempts == 0 {
            return Err(ConfigError::new("retry.max_attempts must be at least 1").into());
        }

        Ok(Self {
            driver,
            models: config.generation.models.clone(),
            retry: config.retry,
            temperature: config.generation.temperature,
            max_tokens: config.generation.max_output_tokens,
        })
    }

    /// Models in the order they are tried.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Retry policy applied by [`ModelInvoker::invoke`].
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Ask each model in turn until one returns a valid payload, retrying whole
    /// passes with backoff while they fail transiently.
    ///
    /// Non-transient errors, and transient errors once attempts are exhausted,
    /// are returned as they are.
    #[instrument(skip(self, prompt), fields(kind = T::KIND, max_attempts = self.retry.max_attempts))]
    pub async fn invoke<T: StoryPayload>(&self, prompt: &PromptPair) -> FabulaResult<T> {
        let attempts = AtomicU32::new(0);
        let (this, attempts_ref) = (self, &attempts);

        let result = Retry::spawn(BackoffSchedule::new(&self.retry), move || async move {
            let attempt = attempts_ref.fetch_add(1, Ordering::SeqCst) + 1;
            match this.try_all_models::<T>(prompt).await {
                Ok(payload) => Ok(payload),
                Err(e) if e.is_transient() => {
                    if attempt < this.retry.max_attempts {
                        warn!(
                            attempt,
                            max_attempts = this.retry.max_attempts,
                            error = %e,
                            "Transient service error, retrying model chain"
                        );
                    }
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => {
                    debug!(attempt, error = %e, "Permanent error, failing immediately");
                    Err(RetryError::Permanent(e))
                }
            }
        })
        .await;

        if result.is_ok() {
            info!(attempts = attempts.load(Ordering::SeqCst), "Model chain produced a payload");
        }
        result
    }

    /// One pass over the model list, cheapest first.
    ///
    /// An invocation or structure error on any model but the last moves on to the
    /// next model; on the last model the error is returned.
    #[instrument(skip(self, prompt), fields(kind = T::KIND, models = self.models.len()))]
    pub async fn try_all_models<T: StoryPayload>(&self, prompt: &PromptPair) -> FabulaResult<T> {
        let last = self.models.len().saturating_sub(1);

        for (index, model) in self.models.iter().enumerate() {
            match self.attempt::<T>(model, prompt).await {
                ModelOutcome::Accepted(payload) => {
                    debug!(model = %model, "Model produced a valid payload");
                    return Ok(payload);
                }
                ModelOutcome::Rejected(err) if index == last => return Err(err),
                ModelOutcome::Rejected(err) => {
                    warn!(model = %model, error = %err, "Model failed, falling back to next model");
                }
            }
        }

        Err(StoryError::new(StoryErrorKind::AllModelsFailed(T::KIND.to_string())).into())
    }

    async fn attempt<T: StoryPayload>(&self, model: &str, prompt: &PromptPair) -> ModelOutcome<T> {
        debug!(model, "Invoking model");
        let request = self.request(model, prompt);

        match self.driver.generate(&request).await {
            Ok(response) => match validate_response::<T>(&response.text) {
                Ok(payload) => ModelOutcome::Accepted(payload),
                Err(err) => ModelOutcome::Rejected(err.into()),
            },
            Err(err) => ModelOutcome::Rejected(err),
        }
    }

    fn request(&self, model: &str, prompt: &PromptPair) -> GenerateRequest {
        let mut request = prompt.request_for(model);
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;
        request
    }
}
