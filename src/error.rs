use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// HTTP status code the remote API uses to signal rate limiting.
pub(crate) const RATE_LIMIT_STATUS: u16 = 429;

/// Error types for the front-audit library.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// Required API credential is absent from the environment.
    #[error("Missing credential: environment variable '{variable}' is not set")]
    MissingCredential {
        /// Name of the missing environment variable
        variable: String,
    },

    /// No matching files found under the scanned directory.
    #[error("No reviewable files found in '{path}'. Check the extension list or directory path.")]
    NoFiles {
        /// Directory that was scanned
        path: PathBuf,
    },

    /// Transport-level HTTP failure (connection refused, timeout, TLS).
    #[error("HTTP transport error: {message}")]
    Http {
        /// Error message
        message: String,
    },

    /// The remote API answered with a non-success status.
    ///
    /// Status 429 is the rate-limit signal and is the only retryable case.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code returned by the API
        status: u16,
        /// Response body or status description
        message: String,
    },

    /// The retry budget was fully consumed without a successful response.
    #[error("Retries exhausted: {attempts} attempt(s) against model '{model}' all rate-limited")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Model that was targeted
        model: String,
    },

    /// Template rendering error.
    #[error("Failed to render template '{template}': {message}")]
    Template {
        /// Template name
        template: String,
        /// Error message
        message: String,
    },

    /// JSON serialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
    },
}

impl Error {
    /// Creates an IO error with path context.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a missing-credential error.
    #[must_use]
    pub fn missing_credential(variable: impl Into<String>) -> Self {
        Self::MissingCredential {
            variable: variable.into(),
        }
    }

    /// Creates a no-files error.
    #[must_use]
    pub fn no_files(path: impl Into<PathBuf>) -> Self {
        Self::NoFiles { path: path.into() }
    }

    /// Creates an API error from a status code and body.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a retries-exhausted error.
    #[must_use]
    pub fn retries_exhausted(attempts: u32, model: impl Into<String>) -> Self {
        Self::RetriesExhausted {
            attempts,
            model: model.into(),
        }
    }

    /// Creates a template error.
    #[must_use]
    pub fn template(template: impl Into<String>, source: tera::Error) -> Self {
        Self::Template {
            template: template.into(),
            message: source.to_string(),
        }
    }

    /// Returns true if this failure is the remote rate-limit signal.
    ///
    /// Only rate-limited failures are eligible for retry; everything else
    /// surfaces immediately.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            Self::Api {
                status: RATE_LIMIT_STATUS,
                ..
            }
        )
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns true if the retry budget was exhausted.
    #[must_use]
    pub const fn is_retries_exhausted(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Http {
            message: e.to_string(),
        }
    }
}

impl From<tera::Error> for Error {
    fn from(e: tera::Error) -> Self {
        Self::Template {
            template: "unknown".to_string(),
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}
