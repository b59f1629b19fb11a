//! Per-query binding of history, orchestrator and evidence.

pub mod store;

pub use store::SessionStore;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::capability::CapabilityRegistry;
use crate::config::RagConfig;
use crate::error::RagError;
use crate::evidence::Evidence;
use crate::orchestrator::ConversationOrchestrator;
use crate::provider::create_provider;
use crate::repository::{ContentRepository, HttpContentRepository};

/// Answer to one user turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub answer: String,
    pub sources: Vec<Evidence>,
    pub session_id: String,
}

/// Catalog summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseAnalytics {
    pub total_courses: usize,
    pub course_titles: Vec<String>,
}

/// Course question answering over one repository.
///
/// Every query gets its own [`CapabilityRegistry`], so concurrent queries
/// never see each other's evidence.
pub struct CourseAssistant {
    orchestrator: ConversationOrchestrator,
    repository: Arc<dyn ContentRepository>,
    sessions: SessionStore,
}

impl CourseAssistant {
    pub fn new(
        orchestrator: ConversationOrchestrator,
        repository: Arc<dyn ContentRepository>,
        sessions: SessionStore,
    ) -> Self {
        Self {
            orchestrator,
            repository,
            sessions,
        }
    }

    /// Anthropic provider plus HTTP repository, both from `config`.
    pub fn from_config(config: &RagConfig) -> Result<Self, RagError> {
        let provider = create_provider(config)?;
        let repository = Arc::new(HttpContentRepository::new(config.require_repository_url()?));
        Ok(Self::new(
            ConversationOrchestrator::with_defaults(provider, config.orchestrator_config()),
            repository,
            SessionStore::new(config.max_history),
        ))
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn orchestrator(&self) -> &ConversationOrchestrator {
        &self.orchestrator
    }

    /// Answer text and the evidence gathered while producing it.
    pub async fn answer(
        &self,
        query: &str,
        history: Option<&str>,
    ) -> Result<(String, Vec<Evidence>), RagError> {
        let mut registry = CapabilityRegistry::course_tools(self.repository.clone());
        let outcome = self.orchestrator.run(query, history, &mut registry).await?;
        let evidence = registry.collect_evidence();
        registry.clear_evidence();
        debug!(
            rounds = outcome.rounds,
            calls = outcome.calls,
            sources = evidence.len(),
            total_tokens = outcome.usage.total_tokens,
            "query answered"
        );
        Ok((outcome.text, evidence))
    }

    /// Answer within a session, creating one when `session_id` is `None`.
    pub async fn query(
        &self,
        query: &str,
        session_id: Option<&str>,
    ) -> Result<QueryAnswer, RagError> {
        let session_id = match session_id {
            Some(id) => id.to_string(),
            None => {
                let id = self.sessions.create_session();
                info!(session_id = id.as_str(), "session created");
                id
            }
        };
        let history = self.sessions.history(&session_id);

        let (answer, sources) = self.answer(query, history.as_deref()).await?;
        self.sessions.add_exchange(&session_id, query, &answer);

        Ok(QueryAnswer {
            answer,
            sources,
            session_id,
        })
    }

    pub async fn course_titles(&self) -> Result<Vec<String>, RagError> {
        self.repository.course_titles().await
    }

    pub async fn course_analytics(&self) -> Result<CourseAnalytics, RagError> {
        let course_titles = self.course_titles().await?;
        Ok(CourseAnalytics {
            total_courses: course_titles.len(),
            course_titles,
        })
    }
}
