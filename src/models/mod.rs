//! Model definitions.

#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(feature = "anthropic")]
pub use anthropic::AnthropicModel;

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL_ID: &str = "claude-sonnet-4-20250514";
