//! Retrieval capabilities the model may invoke, and the registry that
//! dispatches them.

pub mod arguments;
pub mod outline;
pub mod registry;
pub mod schema;
pub mod search;
pub mod validation;

pub use arguments::CapabilityArguments;
pub use outline::{OutlineCapability, OUTLINE_CAPABILITY_NAME, OUTLINE_FAILED};
pub use registry::CapabilityRegistry;
pub use schema::{CapabilitySchema, ParameterBuilder};
pub use search::{
    ContentSearchCapability, NO_CONTENT_FOUND, SEARCH_CAPABILITY_NAME, SEARCH_FAILED,
};

use async_trait::async_trait;

use crate::evidence::Evidence;

/// Result text for the model plus the evidence backing it.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityOutput {
    pub text: String,
    pub evidence: Vec<Evidence>,
}

impl CapabilityOutput {
    /// Informational text with no evidence (empty results, failures).
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            evidence: Vec::new(),
        }
    }

    pub fn with_evidence(text: impl Into<String>, evidence: Vec<Evidence>) -> Self {
        Self {
            text: text.into(),
            evidence,
        }
    }
}

/// A named, schema-described operation over the content repository.
///
/// `execute` never fails: empty results and repository failures are encoded
/// in the returned text so the model can react to them.
#[async_trait]
pub trait Capability: Send + Sync {
    /// Fixed schema; the name must be unique within a registry.
    fn schema(&self) -> &CapabilitySchema;

    fn name(&self) -> &str {
        &self.schema().name
    }

    /// Check arguments before execution; `Err` carries the reason.
    fn validate(&self, args: &CapabilityArguments) -> Result<(), String> {
        validation::validate_arguments(args.raw(), &self.schema().parameters)
    }

    /// Perform one repository call and format the result.
    async fn execute(&self, args: &CapabilityArguments) -> CapabilityOutput;
}

/// Text returned when arguments do not fit a capability's schema.
pub(crate) fn invalid_arguments(name: &str, reason: impl std::fmt::Display) -> String {
    format!("Invalid arguments for tool '{name}': {reason}")
}
