//! Model provider trait and implementations.

pub mod http;

#[cfg(feature = "anthropic")]
pub mod anthropic;

use std::sync::Arc;

use async_trait::async_trait;

use crate::capability::CapabilitySchema;
use crate::config::RagConfig;
use crate::error::RagError;
use crate::types::{
    join_text, ContentBlock, ConversationTurn, GenerationSettings, Invocation, StopReason,
    ToolChoice, Usage,
};

/// A request sent to a model provider.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instructions, history already appended.
    pub system: String,
    pub turns: Vec<ConversationTurn>,
    /// Capabilities offered for this call. `None` withholds them entirely.
    pub tools: Option<Vec<CapabilitySchema>>,
    pub tool_choice: Option<ToolChoice>,
    pub settings: GenerationSettings,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, turns: Vec<ConversationTurn>) -> Self {
        Self {
            system: system.into(),
            turns,
            tools: None,
            tool_choice: None,
            settings: GenerationSettings::default(),
        }
    }

    /// Offer capabilities with automatic selection. An empty list offers nothing.
    pub fn with_tools(mut self, tools: Vec<CapabilitySchema>) -> Self {
        if tools.is_empty() {
            self.tools = None;
            self.tool_choice = None;
        } else {
            self.tools = Some(tools);
            self.tool_choice = Some(ToolChoice::Auto);
        }
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Whether any capability is offered to the model.
    pub fn offers_tools(&self) -> bool {
        self.tools.as_ref().is_some_and(|t| !t.is_empty())
    }
}

/// Response from a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub stop_reason: StopReason,
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

impl CompletionResponse {
    /// A natural-stop response holding one text block.
    pub fn text_response(text: impl Into<String>) -> Self {
        Self {
            stop_reason: StopReason::NaturalStop,
            content: vec![ContentBlock::Text { text: text.into() }],
            usage: Usage::default(),
        }
    }

    /// Text blocks joined by single spaces; empty when there are none.
    pub fn text(&self) -> String {
        join_text(&self.content)
    }

    /// Invocation requests, in the order the model emitted them.
    pub fn invocations(&self) -> Vec<&Invocation> {
        crate::types::message::invocations_in(&self.content)
    }

    pub fn requests_invocation(&self) -> bool {
        self.stop_reason == StopReason::ToolInvocationRequested
    }
}

/// Stateless request/response completion service.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "anthropic").
    fn provider_name(&self) -> &str;
    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Run one completion.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, RagError>;
}

/// Create the configured provider.
#[cfg(feature = "anthropic")]
pub fn create_provider(config: &RagConfig) -> Result<Arc<dyn ModelProvider>, RagError> {
    let api_key = config
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| RagError::Authentication("Missing ANTHROPIC_API_KEY".into()))?;
    let model = config
        .model
        .parse::<crate::models::AnthropicModel>()
        .map_err(|e| RagError::Configuration(format!("invalid model '{}': {e}", config.model)))?;
    Ok(Arc::new(anthropic::AnthropicProvider::new(
        model,
        api_key,
        config.base_url.clone(),
    )))
}

/// Create the configured provider.
#[cfg(not(feature = "anthropic"))]
pub fn create_provider(config: &RagConfig) -> Result<Arc<dyn ModelProvider>, RagError> {
    Err(RagError::Configuration(format!(
        "No provider enabled for model '{}'",
        config.model
    )))
}
