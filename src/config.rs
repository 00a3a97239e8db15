use crate::client::ModelId;
use crate::error::{Error, Result};
use crate::token::TokenizerKind;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Conventional front-end assets directory scanned by default.
pub const DEFAULT_ASSET_DIR: &str = "public";

/// Default attempt budget for the remote call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Base delay of the exponential backoff schedule.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(5);

const DEFAULT_TOKEN_BUDGET: usize = 150_000;

const DEFAULT_EXTENSIONS: &[&str] = &[".html", ".js", ".css"];

/// Directory names that are never descended into.
///
/// Version-control metadata, dependency caches and build output would bloat
/// the corpus with irrelevant (and often unreadable) content.
const DEFAULT_IGNORED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "dist",
    "build",
    "coverage",
    "vendor",
];

/// Configuration for the front-audit review pipeline.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Root directory to collect files from.
    ///
    /// Does not have to exist: a missing root collects zero files, which the
    /// pipeline reports as a no-files condition rather than a config error.
    pub root_dir: PathBuf,

    /// Filename suffixes selecting files for the corpus (plain suffix match)
    pub extensions: Vec<String>,

    /// Directory names excluded from traversal entirely
    pub ignored_dirs: HashSet<String>,

    /// Remote model to query
    pub model: ModelId,

    /// Maximum remote-call attempts before giving up
    pub max_attempts: u32,

    /// Base delay of the backoff schedule (doubled per attempt)
    pub base_delay: Duration,

    /// Tokenizer implementation used for the corpus estimate
    pub tokenizer: TokenizerKind,

    /// Token estimate above which a warning is emitted
    pub token_budget: usize,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use front_audit::Config;
    ///
    /// let config = Config::builder()
    ///     .root_dir("./public")
    ///     .max_attempts(5)
    ///     .build()
    ///     .expect("valid configuration");
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension list is empty, the attempt budget
    /// is zero, or the base delay is zero.
    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(Error::config("extension list must not be empty"));
        }

        if self.extensions.iter().any(String::is_empty) {
            return Err(Error::config("extension suffixes must not be empty strings"));
        }

        if self.max_attempts == 0 {
            return Err(Error::config("max_attempts must be greater than 0"));
        }

        if self.base_delay.is_zero() {
            return Err(Error::config("base_delay must be greater than zero"));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(ToString::to_string).collect(),
            model: ModelId::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            tokenizer: TokenizerKind::Enhanced,
            token_budget: DEFAULT_TOKEN_BUDGET,
        }
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    root_dir: Option<PathBuf>,
    extensions: Option<Vec<String>>,
    ignored_dirs: Option<HashSet<String>>,
    model: Option<ModelId>,
    max_attempts: Option<u32>,
    base_delay: Option<Duration>,
    tokenizer: Option<TokenizerKind>,
    token_budget: Option<usize>,
}

impl ConfigBuilder {
    /// Sets the root directory to collect files from.
    #[must_use]
    pub fn root_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(path.into());
        self
    }

    /// Sets the filename suffixes selecting files for the corpus.
    #[must_use]
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the directory names excluded from traversal.
    #[must_use]
    pub fn ignored_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_dirs = Some(dirs.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the remote model to query.
    #[must_use]
    pub fn model(mut self, model: ModelId) -> Self {
        self.model = Some(model);
        self
    }

    /// Sets the maximum number of remote-call attempts.
    #[must_use]
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Sets the base delay of the backoff schedule.
    ///
    /// Production code keeps the 5 second default; tests shrink it to
    /// milliseconds.
    #[must_use]
    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = Some(delay);
        self
    }

    /// Sets the tokenizer implementation.
    #[must_use]
    pub fn tokenizer(mut self, kind: TokenizerKind) -> Self {
        self.tokenizer = Some(kind);
        self
    }

    /// Sets the token estimate above which a warning is emitted.
    #[must_use]
    pub fn token_budget(mut self, budget: usize) -> Self {
        self.token_budget = Some(budget);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let defaults = Config::default();

        let config = Config {
            root_dir: self.root_dir.unwrap_or(defaults.root_dir),
            extensions: self.extensions.unwrap_or(defaults.extensions),
            ignored_dirs: self.ignored_dirs.unwrap_or(defaults.ignored_dirs),
            model: self.model.unwrap_or(defaults.model),
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            base_delay: self.base_delay.unwrap_or(defaults.base_delay),
            tokenizer: self.tokenizer.unwrap_or(defaults.tokenizer),
            token_budget: self.token_budget.unwrap_or(defaults.token_budget),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::builder().build().unwrap();

        assert_eq!(config.root_dir, PathBuf::from("public"));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.base_delay, Duration::from_secs(5));
        assert!(config.extensions.contains(&".js".to_string()));
        assert!(config.ignored_dirs.contains("node_modules"));
        assert!(config.ignored_dirs.contains(".git"));
    }

    #[test]
    fn test_missing_root_is_not_a_config_error() {
        // A nonexistent root collects zero files later; building must succeed.
        let config = Config::builder()
            .root_dir("/nonexistent/path/that/should/not/exist")
            .build();

        assert!(config.is_ok());
    }

    #[test]
    fn test_empty_extensions_rejected() {
        let result = Config::builder().extensions(Vec::<String>::new()).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = Config::builder().max_attempts(0).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_base_delay_rejected() {
        let result = Config::builder().base_delay(Duration::ZERO).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_overrides() {
        let config = Config::builder()
            .root_dir("./assets")
            .extensions([".vue", ".ts"])
            .max_attempts(5)
            .build()
            .unwrap();

        assert_eq!(config.root_dir, PathBuf::from("./assets"));
        assert_eq!(config.extensions, vec![".vue", ".ts"]);
        assert_eq!(config.max_attempts, 5);
    }
}
