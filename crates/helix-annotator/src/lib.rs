//! Numbering-tool integration: provider, result cache, configuration and the
//! dual-scheme annotation service built on top of them.

pub mod annotator;
pub mod cache;
pub mod config;
pub mod error;
pub mod provider;

pub use annotator::{AnnotatedEntry, Annotator, BatchReport, FailedEntry};
pub use cache::AnnotationCache;
pub use config::HelixConfig;
pub use error::{AnnotateError, CacheError, ConfigError, ProviderError};
pub use provider::{CommandProvider, NumberingProvider, NumberingRequest};
