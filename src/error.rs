//! Unified error types for lingopath.
//!
//! Only two error kinds are meant to reach a caller of the core: a malformed
//! lesson sequence and a malformed generation request. Everything that goes
//! wrong while talking to the generative model is absorbed by the content
//! generator and reported through its degradation observer instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for lingopath operations.
#[derive(Error, Debug)]
pub enum LingoError {
    /// The lesson sequence handed to the gating evaluator is malformed.
    #[error("invalid lesson sequence: {message}")]
    InvalidSequence { message: String },

    /// A generation request violated its preconditions.
    #[error("invalid generation request: {message}")]
    InvalidRequest { message: String },

    /// I/O errors from curriculum or config files.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON or TOML parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// Generative model call failures (transport, status, body).
    #[error("model error: {message}")]
    Model { message: String },
}

/// A specialized Result type for lingopath operations.
pub type Result<T> = std::result::Result<T, LingoError>;

impl LingoError {
    /// Create an invalid sequence error.
    pub fn invalid_sequence(message: impl Into<String>) -> Self {
        Self::InvalidSequence {
            message: message.into(),
        }
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a model error.
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model {
            message: message.into(),
        }
    }

    /// Whether this error is a caller bug rather than an infrastructure failure.
    ///
    /// Caller errors must be surfaced; infrastructure errors may be absorbed.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSequence { .. } | Self::InvalidRequest { .. }
        )
    }
}

impl From<io::Error> for LingoError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for LingoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Log-and-default handling for inputs that are allowed to be missing or
/// broken, such as optional config layers.
pub trait FailOpen<T> {
    /// Return the value, or log `err` under `context` and return `T::default()`.
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default;
}

impl<T> FailOpen<T> for Result<T> {
    fn fail_open_default(self, context: &str) -> T
    where
        T: Default,
    {
        self.unwrap_or_else(|err| {
            tracing::warn!(context, error = %err, "ignoring unusable input, using defaults");
            T::default()
        })
    }
}

/// Exit codes for the lingopath CLI.
pub mod exit_codes {
    /// Command completed.
    pub const SUCCESS: i32 = 0;

    /// Command failed (bad input, unreadable files).
    pub const ERROR: i32 = 1;

    /// The process panicked.
    pub const CRASH: i32 = 3;
}
