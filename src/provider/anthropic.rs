//! Anthropic Messages API provider.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::RagError;
use crate::models::AnthropicModel;
use crate::types::*;

use super::http::{anthropic_headers, shared_client, status_to_error};
use super::{CompletionRequest, CompletionResponse, ModelProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 800;

pub struct AnthropicProvider {
    model: AnthropicModel,
    api_key: String,
    base_url: String,
}

impl AnthropicProvider {
    pub fn new(model: AnthropicModel, api_key: String, base_url: Option<String>) -> Self {
        Self {
            base_url: base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model,
            api_key,
        }
    }

    fn build_headers(&self) -> reqwest::header::HeaderMap {
        anthropic_headers(&self.api_key, API_VERSION)
    }

    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = request
            .turns
            .iter()
            .filter_map(build_anthropic_message)
            .collect();

        let mut body = serde_json::json!({
            "model": self.model.as_str(),
            "messages": messages,
            "max_tokens": request.settings.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        });

        let Some(obj) = body.as_object_mut() else {
            return body;
        };

        if !request.system.is_empty() {
            obj.insert("system".into(), request.system.clone().into());
        }
        if let Some(temp) = request.settings.temperature {
            obj.insert("temperature".into(), temp.into());
        }
        if let Some(top_p) = request.settings.top_p {
            obj.insert("top_p".into(), top_p.into());
        }
        if let Some(ref stops) = request.settings.stop_sequences {
            obj.insert("stop_sequences".into(), serde_json::json!(stops));
        }

        // Tools and tool choice travel together; withholding tools drops both.
        if let Some(ref tools) = request.tools {
            if !tools.is_empty() {
                let tool_defs: Vec<serde_json::Value> = tools
                    .iter()
                    .map(|t| {
                        serde_json::json!({
                            "name": t.name,
                            "description": t.description,
                            "input_schema": t.parameters,
                        })
                    })
                    .collect();
                obj.insert("tools".into(), tool_defs.into());

                let choice = match request.tool_choice.clone().unwrap_or_default() {
                    ToolChoice::Auto => serde_json::json!({"type": "auto"}),
                };
                obj.insert("tool_choice".into(), choice);
            }
        }

        body
    }
}

#[async_trait]
impl ModelProvider for AnthropicProvider {
    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn model_id(&self) -> &str {
        self.model.as_str()
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, RagError> {
        let body = self.build_request_body(request);
        let url = format!("{}/messages", self.base_url);

        debug!(
            model = self.model.as_str(),
            turns = request.turns.len(),
            tools_offered = request.offers_tools(),
            "Anthropic complete"
        );

        let resp = shared_client()
            .post(&url)
            .headers(self.build_headers())
            .json(&body)
            .send()
            .await?;

        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status, &body_text));
        }

        let data: AnthropicResponse = resp.json().await?;
        Ok(data.into_completion())
    }
}

fn build_anthropic_message(turn: &ConversationTurn) -> Option<serde_json::Value> {
    match turn.role {
        Role::User => {
            let results = turn.results();
            if !results.is_empty() {
                let content: Vec<serde_json::Value> = results
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "type": "tool_result",
                            "tool_use_id": r.invocation_id,
                            "content": r.content,
                        })
                    })
                    .collect();
                return Some(serde_json::json!({"role": "user", "content": content}));
            }
            Some(serde_json::json!({"role": "user", "content": turn.text()}))
        }
        Role::Assistant => {
            let content: Vec<serde_json::Value> = turn
                .content
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::Text { text } if !text.is_empty() => {
                        Some(serde_json::json!({"type": "text", "text": text}))
                    }
                    ContentBlock::InvocationRequest(inv) => Some(serde_json::json!({
                        "type": "tool_use",
                        "id": inv.id,
                        "name": inv.name,
                        "input": inv.arguments,
                    })),
                    _ => None,
                })
                .collect();
            if content.is_empty() {
                None
            } else {
                Some(serde_json::json!({"role": "assistant", "content": content}))
            }
        }
    }
}

// Internal Anthropic response types

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    stop_reason: Option<String>,
    #[serde(default)]
    usage: AnthropicUsage,
}

#[derive(Deserialize)]
struct AnthropicContentBlock {
    r#type: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    input: Option<serde_json::Value>,
}

#[derive(Deserialize, Default)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
    #[serde(default)]
    cache_read_input_tokens: Option<u32>,
    #[serde(default)]
    cache_creation_input_tokens: Option<u32>,
}

impl AnthropicResponse {
    fn into_completion(self) -> CompletionResponse {
        let content = self
            .content
            .into_iter()
            .filter_map(|block| match block.r#type.as_str() {
                "text" => block.text.map(|text| ContentBlock::Text { text }),
                "tool_use" => match (block.id, block.name) {
                    (Some(id), Some(name)) => Some(ContentBlock::InvocationRequest(Invocation {
                        id,
                        name,
                        arguments: block.input.unwrap_or_else(|| serde_json::json!({})),
                    })),
                    _ => None,
                },
                _ => None,
            })
            .collect();

        let stop_reason = match self.stop_reason.as_deref() {
            Some("tool_use") => StopReason::ToolInvocationRequested,
            _ => StopReason::NaturalStop,
        };

        CompletionResponse {
            stop_reason,
            content,
            usage: Usage {
                input_tokens: self.usage.input_tokens,
                output_tokens: self.usage.output_tokens,
                total_tokens: self.usage.input_tokens + self.usage.output_tokens,
                cache_read_tokens: self.usage.cache_read_input_tokens,
                cache_creation_tokens: self.usage.cache_creation_input_tokens,
            },
        }
    }
}
