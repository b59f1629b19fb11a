//! Citation evidence produced by capability executions.

use serde::{Deserialize, Serialize};

/// One citation shown to the user next to an answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Evidence {
    /// Display text, e.g. `MCP Course - Lesson 5`.
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Evidence {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, link: Option<String>) -> Self {
        self.link = link;
        self
    }
}

/// Single-slot evidence storage for one registered capability.
///
/// Starts empty, is overwritten by every execution, and stays populated until
/// the owner clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceSlot {
    items: Vec<Evidence>,
}

impl EvidenceSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot contents with the evidence of the latest execution.
    pub fn replace(&mut self, items: Vec<Evidence>) {
        self.items = items;
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[Evidence] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
