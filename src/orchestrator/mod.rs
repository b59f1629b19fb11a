//! Bounded multi-round tool loop.
//!
//! One query moves through `AwaitingModel -> Deciding -> (Invoking ->
//! AwaitingModel)* -> Done`. Capabilities are offered while rounds remain;
//! once the round budget is spent the last call withholds them, so the model
//! has to answer from what it already gathered.

pub mod prompt;

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, warn};

use crate::capability::{CapabilityRegistry, CapabilitySchema};
use crate::error::RagError;
use crate::provider::{CompletionRequest, CompletionResponse, ModelProvider};
use crate::types::{ConversationTurn, GenerationSettings, Usage};
use crate::util::with_timeout;

pub use prompt::default_instructions;

/// Prefix of the answer produced when a model call fails after tools ran.
pub const TOOL_ERROR_PREFIX: &str = "Error during tool execution";

/// Loop limits and per-call settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Rounds of tool use allowed before the forced final call.
    pub max_rounds: usize,
    pub settings: GenerationSettings,
    /// Deadline for each provider call; `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_rounds: 2,
            settings: GenerationSettings::builder()
                .max_tokens(800)
                .temperature(0.0)
                .build(),
            request_timeout: Some(Duration::from_secs(120)),
        }
    }
}

/// Where a query is in the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum LoopPhase {
    AwaitingModel,
    Deciding,
    Invoking,
    Done,
}

/// Conversation owned by one query.
#[derive(Debug, Clone)]
pub struct ConversationState {
    pub system: String,
    pub turns: Vec<ConversationTurn>,
    /// Completed rounds of tool use.
    pub round: usize,
    pub usage: Usage,
    pub phase: LoopPhase,
}

impl ConversationState {
    fn new(system: String, query: &str) -> Self {
        Self {
            system,
            turns: vec![ConversationTurn::user(query)],
            round: 0,
            usage: Usage::default(),
            phase: LoopPhase::AwaitingModel,
        }
    }

    fn enter(&mut self, phase: LoopPhase) {
        debug!(round = self.round, phase = %phase, "loop phase");
        self.phase = phase;
    }
}

/// Final answer of one query plus loop statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorOutcome {
    pub text: String,
    /// Rounds of tool use performed.
    pub rounds: usize,
    /// Provider calls made, including the forced final one.
    pub calls: usize,
    pub usage: Usage,
}

/// Drives the provider and the capability registry for one query at a time.
pub struct ConversationOrchestrator {
    provider: Arc<dyn ModelProvider>,
    instructions: String,
    config: OrchestratorConfig,
}

impl ConversationOrchestrator {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        instructions: impl Into<String>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            provider,
            instructions: instructions.into(),
            config,
        }
    }

    /// Orchestrator with the default course-assistant instructions.
    pub fn with_defaults(provider: Arc<dyn ModelProvider>, config: OrchestratorConfig) -> Self {
        let instructions = default_instructions(config.max_rounds);
        Self::new(provider, instructions, config)
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Answer `query`, dispatching requested invocations through `registry`.
    ///
    /// Only a failure of the first provider call is returned as an error.
    /// Later failures become the answer text.
    pub async fn answer(
        &self,
        query: &str,
        history: Option<&str>,
        registry: &mut CapabilityRegistry,
    ) -> Result<String, RagError> {
        self.run(query, history, registry).await.map(|o| o.text)
    }

    /// Like [`answer`](Self::answer), also reporting rounds, calls and usage.
    pub async fn run(
        &self,
        query: &str,
        history: Option<&str>,
        registry: &mut CapabilityRegistry,
    ) -> Result<OrchestratorOutcome, RagError> {
        let schemas = registry.schemas();
        let max_rounds = self.config.max_rounds;
        let mut state = ConversationState::new(
            prompt::with_history(&self.instructions, history),
            query,
        );
        let mut calls = 1;

        let mut response = self.call(&mut state, &schemas).await?;

        while state.round < max_rounds {
            state.enter(LoopPhase::Deciding);
            if !response.requests_invocation() {
                return Ok(finish(&mut state, &response, calls));
            }

            let invocations = response.invocations();
            if invocations.is_empty() {
                let err = RagError::MalformedResponse(
                    "tool use requested without any invocation blocks".into(),
                );
                if state.round == 0 {
                    return Err(err);
                }
                warn!(round = state.round, error = %err, "malformed provider response");
                return Ok(failed(&mut state, &err, calls));
            }

            state.enter(LoopPhase::Invoking);
            let mut results = Vec::with_capacity(invocations.len());
            for invocation in invocations {
                results.push(registry.invoke(invocation).await);
            }
            state
                .turns
                .push(ConversationTurn::assistant(response.content.clone()));
            state.turns.push(ConversationTurn::observation(results));
            state.round += 1;

            calls += 1;
            response = match self.call(&mut state, &schemas).await {
                Ok(next) => next,
                Err(e) => {
                    warn!(round = state.round, error = %e, "provider call failed after tool use");
                    return Ok(failed(&mut state, &e, calls));
                }
            };
        }

        Ok(finish(&mut state, &response, calls))
    }

    /// One provider call. Capabilities are offered only while rounds remain.
    async fn call(
        &self,
        state: &mut ConversationState,
        schemas: &[CapabilitySchema],
    ) -> Result<CompletionResponse, RagError> {
        state.enter(LoopPhase::AwaitingModel);
        let mut request = CompletionRequest::new(state.system.clone(), state.turns.clone())
            .with_settings(self.config.settings.clone());
        if state.round < self.config.max_rounds {
            request = request.with_tools(schemas.to_vec());
        }

        debug!(
            model = self.provider.model_id(),
            round = state.round,
            tools_offered = request.offers_tools(),
            "calling provider"
        );
        let response =
            with_timeout(self.config.request_timeout, self.provider.complete(&request)).await?;
        state.usage.merge(&response.usage);
        Ok(response)
    }
}

fn finish(
    state: &mut ConversationState,
    response: &CompletionResponse,
    calls: usize,
) -> OrchestratorOutcome {
    state.enter(LoopPhase::Done);
    OrchestratorOutcome {
        text: response.text(),
        rounds: state.round,
        calls,
        usage: state.usage.clone(),
    }
}

fn failed(state: &mut ConversationState, err: &RagError, calls: usize) -> OrchestratorOutcome {
    state.enter(LoopPhase::Done);
    OrchestratorOutcome {
        text: format!("{TOOL_ERROR_PREFIX}: {err}"),
        rounds: state.round,
        calls,
        usage: state.usage.clone(),
    }
}
