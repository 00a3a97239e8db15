//! # front-audit
//!
//! Audit a web project's front-end from the command line.
//!
//! ## Features
//!
//! - Corpus collection: walks a directory tree, filters by extension suffix,
//!   skips dependency caches and build output entirely
//! - LLM-assisted review with bounded retry and exponential backoff on rate
//!   limiting
//! - Heuristic token estimation for prompt budgeting
//! - Static HTML structure reports with per-file sizes
//!
//! ## Quick Start
//!
//! ```no_run
//! use front_audit::{AnthropicEndpoint, Config, Pipeline, ReviewKind};
//!
//! # fn main() -> anyhow::Result<()> {
//! let endpoint = AnthropicEndpoint::from_env()?;
//! let config = Config::builder()
//!     .root_dir("./public")
//!     .max_attempts(3)
//!     .build()?;
//!
//! let outcome = Pipeline::new(config)?.run(
//!     &endpoint,
//!     ReviewKind::Architecture,
//!     "Review the overall front-end structure",
//! )?;
//! println!("{}", outcome.response);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The review pipeline runs four synchronous stages:
//! 1. **Collector**: gathers matching files in directory-walk order
//! 2. **Estimator**: computes an advisory token weight
//! 3. **Prompt**: composes the system/user prompt pair
//! 4. **Invoker**: executes the remote call with bounded retry

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod backoff;
mod client;
mod collector;
mod config;
mod error;
mod pipeline;
mod prompt;
mod report;
mod retry;
mod token;

pub use backoff::delay_for_attempt;
pub use client::{AnthropicEndpoint, API_KEY_VAR, ModelEndpoint, ModelId};
pub use collector::{Collector, Corpus, CorpusFile};
pub use config::{Config, ConfigBuilder, DEFAULT_ASSET_DIR, DEFAULT_MAX_ATTEMPTS};
pub use error::{Error, Result};
pub use pipeline::{Pipeline, ReviewOutcome, ReviewStats};
pub use prompt::{Prompt, ReviewKind, compose};
pub use report::{DEFAULT_SECTIONS, StructureReport, format_size};
pub use retry::Invoker;
pub use token::{TokenEstimator, TokenizerKind};

/// Runs a complete review with the given configuration and endpoint.
///
/// This is the main library entry point for the review flow.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - No matching files are found under the root directory
/// - The remote call fails terminally or the retry budget is exhausted
pub fn review<E: ModelEndpoint>(
    config: Config,
    endpoint: &E,
    kind: ReviewKind,
    instruction: &str,
) -> Result<ReviewOutcome> {
    Pipeline::new(config)?.run(endpoint, kind, instruction)
}
