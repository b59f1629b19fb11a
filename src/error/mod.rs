//! Error types for course-rag.

pub mod unified;

pub use unified::ErrorCategory;

use thiserror::Error;

/// Primary error type for all course-rag operations.
///
/// Only provider failures ever escape the conversation loop, and only from the
/// first model call of a query. Everything a capability or the registry runs
/// into is rendered as result text for the model instead.
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Repository error: {0}")]
    Repository(String),
}

impl RagError {
    /// Create an API error from a status code and body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Authentication(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Network(_) => ErrorCategory::Network,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
            Self::MalformedResponse(_) => ErrorCategory::Provider,
            Self::Repository(_) => ErrorCategory::Repository,
            Self::InvalidArgument(_) => ErrorCategory::InvalidArgument,
            Self::Io(_) => ErrorCategory::Unknown,
        }
    }

    /// Whether this error belongs to a provider-failure category.
    ///
    /// Classifies errors for callers. The orchestrator does not consult it:
    /// every error from a provider call after the first becomes a terminal
    /// answer.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Authentication
                | ErrorCategory::RateLimit
                | ErrorCategory::Network
                | ErrorCategory::Timeout
                | ErrorCategory::Server
                | ErrorCategory::Api
                | ErrorCategory::Serialization
                | ErrorCategory::Provider
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, RagError>;
