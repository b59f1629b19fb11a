//! Convenience re-exports for common use.

pub use crate::capability::{Capability, CapabilityRegistry, CapabilitySchema};
pub use crate::config::RagConfig;
pub use crate::error::{RagError, Result};
pub use crate::evidence::Evidence;
pub use crate::orchestrator::{ConversationOrchestrator, OrchestratorConfig};
pub use crate::provider::{CompletionRequest, CompletionResponse, ModelProvider};
pub use crate::repository::ContentRepository;
pub use crate::session::{CourseAssistant, QueryAnswer};
pub use crate::types::{ContentBlock, ConversationTurn, Invocation, StopReason};
