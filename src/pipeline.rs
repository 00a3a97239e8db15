use crate::{
    client::ModelEndpoint,
    collector::Collector,
    config::Config,
    error::{Error, Result},
    prompt::{self, ReviewKind},
    retry::Invoker,
    token::TokenEstimator as _,
};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Statistics collected during one review run.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewStats {
    /// Files gathered into the corpus
    pub files_collected: usize,

    /// Matching files skipped because they could not be read
    pub files_skipped: usize,

    /// Estimated token weight of the composed prompt
    pub prompt_tokens: usize,

    /// Model that answered
    pub model: String,

    /// Total execution time
    pub duration: Duration,

    /// Time spent collecting files
    pub collect_duration: Duration,

    /// Time spent on the remote call (including backoff waits)
    pub invoke_duration: Duration,
}

impl ReviewStats {
    /// Prints a human-readable summary to stderr.
    pub fn print_summary(&self) {
        eprintln!();
        eprintln!("Review summary");
        eprintln!("  files collected:   {}", self.files_collected);
        eprintln!("  files skipped:     {}", self.files_skipped);
        eprintln!("  prompt tokens (~): {}", self.prompt_tokens);
        eprintln!("  model:             {}", self.model);
        eprintln!(
            "  collect / invoke:  {:.2}s / {:.2}s",
            self.collect_duration.as_secs_f64(),
            self.invoke_duration.as_secs_f64()
        );
        eprintln!("  total:             {:.2}s", self.duration.as_secs_f64());
    }
}

/// Result of a completed review run.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// The model's review text
    pub response: String,
    /// Run statistics
    pub stats: ReviewStats,
}

/// Orchestrates collect → estimate → compose → invoke for one review.
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Executes the review against the given endpoint.
    ///
    /// # Process
    ///
    /// 1. **Collect**: gather matching files under the root directory
    /// 2. **Estimate**: compute the advisory token weight of the corpus
    /// 3. **Compose**: build the system/user prompt pair
    /// 4. **Invoke**: send with bounded retry and backoff
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoFiles`] when nothing was collected, otherwise any
    /// failure of the remote call per the invoker's contract.
    #[instrument(skip_all, fields(root_dir = %self.config.root_dir.display()))]
    pub fn run<E: ModelEndpoint>(
        &self,
        endpoint: &E,
        kind: ReviewKind,
        instruction: &str,
    ) -> Result<ReviewOutcome> {
        let start_time = Instant::now();

        info!("Collecting sources from {}", self.config.root_dir.display());
        let collect_start = Instant::now();
        let corpus = Collector::new(&self.config).collect();
        let collect_duration = collect_start.elapsed();

        if corpus.is_empty() {
            return Err(Error::no_files(&self.config.root_dir));
        }

        info!(
            "Collected {} file(s) ({} skipped) in {:.2}s",
            corpus.file_count(),
            corpus.skipped,
            collect_duration.as_secs_f64()
        );

        let prompt = prompt::compose(kind, instruction, &corpus);
        let estimator = self.config.tokenizer.create();
        let prompt_tokens = estimator.estimate(&prompt.user);

        info!("Prompt weighs ~{prompt_tokens} tokens");
        if prompt_tokens > self.config.token_budget {
            warn!(
                "Prompt estimate ({prompt_tokens} tokens) exceeds the budget of {} tokens; \
                 the model may truncate its context",
                self.config.token_budget
            );
        }

        info!(
            "Requesting {} review from {}",
            kind.id(),
            self.config.model
        );
        let invoke_start = Instant::now();
        let invoker =
            Invoker::new(self.config.max_attempts).with_base_delay(self.config.base_delay);
        let response = invoker.invoke(endpoint, self.config.model, &prompt)?;
        let invoke_duration = invoke_start.elapsed();

        info!("Review completed in {:.2}s", invoke_duration.as_secs_f64());

        Ok(ReviewOutcome {
            response,
            stats: ReviewStats {
                files_collected: corpus.file_count(),
                files_skipped: corpus.skipped,
                prompt_tokens,
                model: self.config.model.to_string(),
                duration: start_time.elapsed(),
                collect_duration,
                invoke_duration,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ModelId;
    use crate::prompt::Prompt;
    use assert_fs::prelude::*;
    use std::cell::RefCell;

    /// Endpoint that records the prompt and answers with a fixed string.
    struct RecordingEndpoint {
        seen: RefCell<Vec<Prompt>>,
    }

    impl RecordingEndpoint {
        fn new() -> Self {
            Self {
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl ModelEndpoint for RecordingEndpoint {
        fn send(&self, _model: ModelId, prompt: &Prompt) -> Result<String> {
            self.seen.borrow_mut().push(prompt.clone());
            Ok("review text".to_string())
        }
    }

    fn config_for(root: &std::path::Path) -> Config {
        Config::builder().root_dir(root).build().unwrap()
    }

    #[test]
    fn test_run_collects_and_invokes() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("index.html").write_str("<html></html>").unwrap();
        temp.child("js/app.js").write_str("let a = 1;").unwrap();

        let endpoint = RecordingEndpoint::new();
        let pipeline = Pipeline::new(config_for(temp.path())).unwrap();
        let outcome = pipeline
            .run(&endpoint, ReviewKind::Architecture, "Review this")
            .unwrap();

        assert_eq!(outcome.response, "review text");
        assert_eq!(outcome.stats.files_collected, 2);
        assert!(outcome.stats.prompt_tokens > 0);

        let seen = endpoint.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].user.contains("Review this"));
        assert!(seen[0].user.contains("==== FILE: index.html ===="));
    }

    #[test]
    fn test_run_fails_when_nothing_collected() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("notes.txt").write_str("no match").unwrap();

        let endpoint = RecordingEndpoint::new();
        let pipeline = Pipeline::new(config_for(temp.path())).unwrap();
        let result = pipeline.run(&endpoint, ReviewKind::Architecture, "Review");

        assert!(matches!(result.unwrap_err(), Error::NoFiles { .. }));
        assert!(endpoint.seen.borrow().is_empty());
    }

    #[test]
    fn test_run_with_missing_root_reports_no_files() {
        let endpoint = RecordingEndpoint::new();
        let pipeline = Pipeline::new(config_for(std::path::Path::new(
            "/nonexistent/front-audit-root",
        )))
        .unwrap();

        let result = pipeline.run(&endpoint, ReviewKind::Security, "Audit");

        assert!(matches!(result.unwrap_err(), Error::NoFiles { .. }));
    }
}
