//! Conversation turns exchanged with the model.

use serde::{Deserialize, Serialize};

/// Conversation role. System instructions travel separately from turns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single block of turn content.
///
/// Consumers match on the variant; the `type` discriminant is what goes over
/// the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    InvocationRequest(Invocation),
    InvocationResult(InvocationResult),
}

/// A capability call requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invocation {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// The text a capability produced for one invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvocationResult {
    pub invocation_id: String,
    pub content: String,
}

/// One turn of a conversation: the query, a model response, or an
/// observation carrying every invocation result of a round.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl ConversationTurn {
    /// Create a user turn holding plain text.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// Create an assistant turn from the blocks of a model response.
    pub fn assistant(content: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// Create the observation turn bundling one round of invocation results.
    pub fn observation(results: Vec<InvocationResult>) -> Self {
        Self {
            role: Role::User,
            content: results
                .into_iter()
                .map(ContentBlock::InvocationResult)
                .collect(),
        }
    }

    /// Text blocks joined by single spaces.
    pub fn text(&self) -> String {
        join_text(&self.content)
    }

    /// Invocation requests carried by this turn, in order.
    pub fn invocations(&self) -> Vec<&Invocation> {
        invocations_in(&self.content)
    }

    /// Invocation results carried by this turn, in order.
    pub fn results(&self) -> Vec<&InvocationResult> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::InvocationResult(result) => Some(result),
                _ => None,
            })
            .collect()
    }
}

/// Concatenate the text of every text block, separated by single spaces.
///
/// Yields an empty string when there are no text blocks.
pub fn join_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn invocations_in(blocks: &[ContentBlock]) -> Vec<&Invocation> {
    blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::InvocationRequest(invocation) => Some(invocation),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_text_skips_invocation_blocks() {
        let blocks = vec![
            ContentBlock::Text {
                text: "Let me check.".into(),
            },
            ContentBlock::InvocationRequest(Invocation {
                id: "call_1".into(),
                name: "search_course_content".into(),
                arguments: serde_json::json!({"query": "mcp"}),
            }),
            ContentBlock::Text {
                text: "Done.".into(),
            },
        ];
        assert_eq!(join_text(&blocks), "Let me check. Done.");
    }

    #[test]
    fn join_text_is_empty_without_text_blocks() {
        let blocks = vec![ContentBlock::InvocationRequest(Invocation {
            id: "call_1".into(),
            name: "get_course_outline".into(),
            arguments: serde_json::json!({}),
        })];
        assert_eq!(join_text(&blocks), "");
        assert_eq!(join_text(&[]), "");
    }

    #[test]
    fn content_block_uses_type_discriminant() {
        let block = ContentBlock::InvocationRequest(Invocation {
            id: "call_9".into(),
            name: "get_course_outline".into(),
            arguments: serde_json::json!({"course_name": "MCP"}),
        });
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "invocation_request");
        assert_eq!(value["id"], "call_9");

        let back: ContentBlock = serde_json::from_value(value).unwrap();
        assert_eq!(back, block);
    }

    #[test]
    fn observation_preserves_result_order() {
        let turn = ConversationTurn::observation(vec![
            InvocationResult {
                invocation_id: "a".into(),
                content: "first".into(),
            },
            InvocationResult {
                invocation_id: "b".into(),
                content: "second".into(),
            },
        ]);
        assert_eq!(turn.role, Role::User);
        let ids: Vec<_> = turn.results().iter().map(|r| r.invocation_id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }
}
