//! Anthropic model identifiers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Anthropic models known to handle multi-round tool use.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
pub enum AnthropicModel {
    #[strum(serialize = "claude-opus-4-1-20250805")]
    ClaudeOpus41,
    #[strum(serialize = "claude-opus-4-20250514")]
    ClaudeOpus4,
    #[strum(serialize = "claude-sonnet-4-20250514")]
    ClaudeSonnet4,
    #[strum(serialize = "claude-3-7-sonnet-20250219")]
    Claude37Sonnet,
    #[strum(serialize = "claude-3-5-haiku-20241022")]
    Claude35Haiku,
    /// Any other model id, passed through unchanged.
    #[strum(default)]
    Custom(String),
}

impl Default for AnthropicModel {
    fn default() -> Self {
        Self::ClaudeSonnet4
    }
}

impl AnthropicModel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ClaudeOpus41 => "claude-opus-4-1-20250805",
            Self::ClaudeOpus4 => "claude-opus-4-20250514",
            Self::ClaudeSonnet4 => "claude-sonnet-4-20250514",
            Self::Claude37Sonnet => "claude-3-7-sonnet-20250219",
            Self::Claude35Haiku => "claude-3-5-haiku-20241022",
            Self::Custom(s) => s,
        }
    }
}
