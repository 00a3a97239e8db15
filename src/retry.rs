//! Bounded-retry invoker for remote model calls.
//!
//! Retry policy: rate-limited failures (HTTP 429) are transient and
//! self-correcting with backoff, so they are re-attempted up to the
//! configured budget. Every other failure (auth, malformed request, network
//! partition) surfaces immediately after a single attempt.

use crate::backoff::delay_for_attempt;
use crate::client::{ModelEndpoint, ModelId};
use crate::config::{DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};
use crate::error::{Error, Result};
use crate::prompt::Prompt;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Executes remote calls with a bounded exponential-backoff retry loop.
#[derive(Debug, Clone)]
pub struct Invoker {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for Invoker {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl Invoker {
    /// Creates an invoker with the given attempt budget and the default
    /// 5 second backoff base.
    #[must_use]
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Overrides the backoff base delay.
    #[must_use]
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Sends the prompt, retrying rate-limited failures with backoff.
    ///
    /// Attempts are 0-indexed. After attempt `k` fails rate-limited the
    /// invoker sleeps `base × 2^k` before attempt `k + 1`; the sleep blocks
    /// the calling thread.
    ///
    /// # Errors
    ///
    /// - A non-rate-limit failure is returned unmodified after exactly one
    ///   attempt.
    /// - [`Error::RetriesExhausted`] is returned once all `max_attempts`
    ///   attempts failed rate-limited.
    pub fn invoke<E: ModelEndpoint>(
        &self,
        endpoint: &E,
        model: ModelId,
        prompt: &Prompt,
    ) -> Result<String> {
        for attempt in 0..self.max_attempts {
            debug!("Attempt {}/{} against {model}", attempt + 1, self.max_attempts);

            match endpoint.send(model, prompt) {
                Ok(text) => return Ok(text),
                Err(e) if e.is_rate_limited() => {
                    if attempt + 1 < self.max_attempts {
                        let delay = delay_for_attempt(self.base_delay, attempt);
                        warn!(
                            "Rate limited on attempt {}/{}, waiting {:.1}s before retrying",
                            attempt + 1,
                            self.max_attempts,
                            delay.as_secs_f64()
                        );
                        thread::sleep(delay);
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::retries_exhausted(self.max_attempts, model.api_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    /// Endpoint answering from a scripted queue of results.
    struct ScriptedEndpoint {
        script: RefCell<VecDeque<Result<String>>>,
        calls: Cell<u32>,
    }

    impl ScriptedEndpoint {
        fn new(script: Vec<Result<String>>) -> Self {
            Self {
                script: RefCell::new(script.into()),
                calls: Cell::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.get()
        }
    }

    impl ModelEndpoint for ScriptedEndpoint {
        fn send(&self, _model: ModelId, _prompt: &Prompt) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            self.script
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| panic!("endpoint called more times than scripted"))
        }
    }

    fn fast_invoker(max_attempts: u32) -> Invoker {
        Invoker::new(max_attempts).with_base_delay(Duration::from_millis(1))
    }

    fn rate_limited() -> Error {
        Error::api(429, "Too Many Requests")
    }

    fn sample_prompt() -> Prompt {
        Prompt {
            system: "system".to_string(),
            user: "user".to_string(),
        }
    }

    #[test]
    fn test_success_on_first_attempt() {
        let endpoint = ScriptedEndpoint::new(vec![Ok("OK".to_string())]);

        let result = fast_invoker(3).invoke(&endpoint, ModelId::Sonnet, &sample_prompt());

        assert_eq!(result.unwrap(), "OK");
        assert_eq!(endpoint.calls(), 1);
    }

    #[test]
    fn test_rate_limits_then_success() {
        // max_attempts=3, two 429s, third call succeeds with "OK".
        let endpoint = ScriptedEndpoint::new(vec![
            Err(rate_limited()),
            Err(rate_limited()),
            Ok("OK".to_string()),
        ]);

        let result = fast_invoker(3).invoke(&endpoint, ModelId::Sonnet, &sample_prompt());

        assert_eq!(result.unwrap(), "OK");
        assert_eq!(endpoint.calls(), 3);
    }

    #[test]
    fn test_non_rate_limit_error_surfaces_after_one_attempt() {
        let endpoint = ScriptedEndpoint::new(vec![Err(Error::api(401, "Unauthorized"))]);

        let result = fast_invoker(3).invoke(&endpoint, ModelId::Sonnet, &sample_prompt());

        let err = result.unwrap_err();
        assert_eq!(endpoint.calls(), 1);
        // The original error is surfaced unchanged.
        assert!(matches!(err, Error::Api { status: 401, .. }));
        assert!(!err.is_retries_exhausted());
    }

    #[test]
    fn test_all_rate_limited_exhausts_budget() {
        let endpoint = ScriptedEndpoint::new(vec![
            Err(rate_limited()),
            Err(rate_limited()),
            Err(rate_limited()),
        ]);

        let result = fast_invoker(3).invoke(&endpoint, ModelId::Haiku, &sample_prompt());

        let err = result.unwrap_err();
        assert_eq!(endpoint.calls(), 3);
        assert!(err.is_retries_exhausted());
        assert!(!err.is_rate_limited());
    }

    #[test]
    fn test_single_attempt_budget_never_sleeps() {
        let endpoint = ScriptedEndpoint::new(vec![Err(rate_limited())]);
        let invoker = Invoker::new(1).with_base_delay(Duration::from_secs(3600));

        let start = std::time::Instant::now();
        let result = invoker.invoke(&endpoint, ModelId::Sonnet, &sample_prompt());

        assert!(result.unwrap_err().is_retries_exhausted());
        assert_eq!(endpoint.calls(), 1);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_success_stops_further_attempts() {
        let endpoint = ScriptedEndpoint::new(vec![Err(rate_limited()), Ok("done".to_string())]);

        let result = fast_invoker(5).invoke(&endpoint, ModelId::Opus, &sample_prompt());

        assert_eq!(result.unwrap(), "done");
        assert_eq!(endpoint.calls(), 2);
    }

    #[test]
    fn test_transport_error_is_not_retried() {
        let endpoint = ScriptedEndpoint::new(vec![Err(Error::Http {
            message: "connection refused".to_string(),
        })]);

        let result = fast_invoker(3).invoke(&endpoint, ModelId::Sonnet, &sample_prompt());

        assert!(matches!(result.unwrap_err(), Error::Http { .. }));
        assert_eq!(endpoint.calls(), 1);
    }
}
