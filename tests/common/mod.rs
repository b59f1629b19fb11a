//! Shared test helpers: scripted provider and in-memory repository.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use course_rag::error::RagError;
use course_rag::provider::{CompletionRequest, CompletionResponse, ModelProvider};
use course_rag::repository::{
    ChunkMetadata, ContentRepository, CourseOutline, LessonOutline, SearchQuery, SearchResults,
};
use course_rag::types::*;

/// Provider that replays queued responses and records every request.
///
/// Once the queue runs dry it answers "Mock response".
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<CompletionResponse, RagError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a natural-stop text response.
    pub fn queue_text(&self, text: &str) -> &Self {
        self.queue(Ok(text_response(text)))
    }

    /// Queue a response requesting one invocation.
    pub fn queue_tool_call(&self, id: &str, name: &str, args: serde_json::Value) -> &Self {
        self.queue(Ok(tool_call_response(&[(id, name, args)])))
    }

    /// Queue a response requesting several invocations in one round.
    pub fn queue_tool_calls(&self, calls: &[(&str, &str, serde_json::Value)]) -> &Self {
        self.queue(Ok(tool_call_response(calls)))
    }

    pub fn queue_error(&self, error: RagError) -> &Self {
        self.queue(Err(error))
    }

    pub fn queue(&self, response: Result<CompletionResponse, RagError>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Every request received so far, in call order.
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_id(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, RagError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(text_response("Mock response")))
    }
}

/// Provider that searches the course named by the query, then answers.
///
/// Stateless across requests, so concurrent queries can share it.
pub struct SearchThenAnswerProvider;

#[async_trait]
impl ModelProvider for SearchThenAnswerProvider {
    fn provider_name(&self) -> &str {
        "search-then-answer"
    }

    fn model_id(&self) -> &str {
        "search-then-answer"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, RagError> {
        tokio::task::yield_now().await;
        let query = request.turns[0].text();
        if request.turns.len() == 1 {
            return Ok(tool_call_response(&[(
                "toolu_search",
                "search_course_content",
                serde_json::json!({"query": "overview", "course_name": query}),
            )]));
        }
        Ok(text_response(&format!("Answer about {query}")))
    }
}

pub fn text_response(text: &str) -> CompletionResponse {
    CompletionResponse {
        stop_reason: StopReason::NaturalStop,
        content: vec![ContentBlock::Text {
            text: text.to_string(),
        }],
        usage: Usage {
            input_tokens: 10,
            output_tokens: 20,
            total_tokens: 30,
            ..Default::default()
        },
    }
}

pub fn tool_call_response(calls: &[(&str, &str, serde_json::Value)]) -> CompletionResponse {
    CompletionResponse {
        stop_reason: StopReason::ToolInvocationRequested,
        content: calls
            .iter()
            .map(|(id, name, args)| {
                ContentBlock::InvocationRequest(Invocation {
                    id: id.to_string(),
                    name: name.to_string(),
                    arguments: args.clone(),
                })
            })
            .collect(),
        usage: Usage {
            input_tokens: 10,
            output_tokens: 5,
            total_tokens: 15,
            ..Default::default()
        },
    }
}

pub const LESSON_LINK: &str = "https://example.com/lesson/5";

/// In-memory repository with fixed course data.
///
/// Queries containing "empty" match nothing, queries containing "error"
/// report a repository error, queries containing "unlabeled" match two
/// fragments without metadata, and everything else matches two fragments of
/// lesson 5. A course filter replaces the course title of the matches.
pub struct MockRepository {
    search_calls: AtomicUsize,
    searches: Mutex<Vec<SearchQuery>>,
}

impl MockRepository {
    pub fn new() -> Self {
        Self {
            search_calls: AtomicUsize::new(0),
            searches: Mutex::new(Vec::new()),
        }
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn searches(&self) -> Vec<SearchQuery> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentRepository for MockRepository {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, RagError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.searches.lock().unwrap().push(query.clone());
        tokio::task::yield_now().await;

        let text = query.query.to_lowercase();
        if text.contains("empty") {
            return Ok(SearchResults::default());
        }
        if text.contains("error") {
            return Ok(SearchResults::failed("Search error occurred"));
        }
        if text.contains("unlabeled") {
            return Ok(SearchResults {
                documents: vec!["First fragment.".into(), "Second fragment.".into()],
                ..Default::default()
            });
        }

        let course = query
            .course_name
            .clone()
            .unwrap_or_else(|| "MCP Course".to_string());
        Ok(SearchResults {
            documents: vec![
                "This is content from lesson 5 about MCP client.".into(),
                "The lesson covers client setup and connection.".into(),
            ],
            metadata: vec![
                ChunkMetadata {
                    course_title: course.clone(),
                    lesson_number: Some(5),
                    chunk_index: 0,
                },
                ChunkMetadata {
                    course_title: course,
                    lesson_number: Some(5),
                    chunk_index: 1,
                },
            ],
            distances: vec![0.1, 0.2],
            error: None,
        })
    }

    async fn course_outline(&self, course: &str) -> Result<Option<CourseOutline>, RagError> {
        if course.eq_ignore_ascii_case("nonexistent") {
            return Ok(None);
        }
        Ok(Some(sample_outline()))
    }

    async fn lesson_link(
        &self,
        _course_title: &str,
        _lesson_number: u32,
    ) -> Result<Option<String>, RagError> {
        Ok(Some(LESSON_LINK.to_string()))
    }

    async fn course_titles(&self) -> Result<Vec<String>, RagError> {
        Ok(vec![
            "MCP: Build Rich-Context AI Apps".to_string(),
            "Computer Use".to_string(),
        ])
    }
}

pub fn sample_outline() -> CourseOutline {
    CourseOutline {
        title: "MCP: Build Rich-Context AI Apps".into(),
        link: Some("https://example.com/mcp-course".into()),
        instructor: Some("Test Instructor".into()),
        lessons: vec![
            LessonOutline {
                number: 0,
                title: "Introduction".into(),
                link: Some("https://example.com/lesson/0".into()),
            },
            LessonOutline {
                number: 1,
                title: "Why MCP".into(),
                link: Some("https://example.com/lesson/1".into()),
            },
            LessonOutline {
                number: 5,
                title: "Creating An MCP Client".into(),
                link: Some(LESSON_LINK.into()),
            },
        ],
    }
}
