use std::time::Duration;

use helix_core::NumberingError;
use helix_formats::ParseError;
use thiserror::Error;

/// Failure of the external numbering tool. Never retried.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("numbering tool exited with {status}: {stderr}")]
    NonZeroExit { status: String, stderr: String },
    #[error("numbering tool produced no output")]
    EmptyOutput,
    #[error("numbering tool did not finish within {0:?}")]
    Timeout(Duration),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("cache entry could not be (de)serialized: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("cache directory could not be created: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: String },
    #[error("invalid config in {path}: {message}")]
    ParseError { path: String, message: String },
    #[error("invalid value for {field}: {message}")]
    ValidationFailed { field: String, message: String },
}

/// Anything that can stop one sequence from being annotated.
#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Numbering(#[from] NumberingError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}
