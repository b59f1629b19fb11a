//! Error classification.

use serde::{Deserialize, Serialize};

/// Broad error category used for logging and failure routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Timeout,
    Server,
    Api,
    Provider,
    Configuration,
    Serialization,
    Repository,
    InvalidArgument,
    Unknown,
}
