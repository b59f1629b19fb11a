//! Content repository boundary: semantic search and course outlines.
//!
//! Search itself happens elsewhere; this crate only consumes results through
//! [`ContentRepository`].

pub mod http;

pub use http::HttpContentRepository;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RagError;

/// A semantic search request with optional scoping filters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_number: Option<u32>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn in_course(mut self, course_name: impl Into<String>) -> Self {
        self.course_name = Some(course_name.into());
        self
    }

    pub fn in_lesson(mut self, lesson_number: u32) -> Self {
        self.lesson_number = Some(lesson_number);
        self
    }
}

/// Where a matched fragment came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(alias = "course")]
    pub course_title: String,
    #[serde(default)]
    pub lesson_number: Option<u32>,
    #[serde(default)]
    pub chunk_index: u32,
}

/// Parallel vectors of matched fragments, their metadata, and distances.
///
/// `error` is set when the repository itself failed to search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    pub metadata: Vec<ChunkMetadata>,
    #[serde(default)]
    pub distances: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResults {
    /// Results carrying only a repository error.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Whether every document has exactly one metadata entry.
    pub fn is_aligned(&self) -> bool {
        self.documents.len() == self.metadata.len()
    }

    /// Matched fragments paired with their metadata, in rank order.
    pub fn fragments(&self) -> impl Iterator<Item = (&str, &ChunkMetadata)> {
        self.documents
            .iter()
            .map(String::as_str)
            .zip(self.metadata.iter())
    }
}

/// One lesson entry of a course outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonOutline {
    #[serde(alias = "lesson_number")]
    pub number: u32,
    #[serde(alias = "lesson_title")]
    pub title: String,
    #[serde(default, alias = "lesson_link")]
    pub link: Option<String>,
}

/// Course title, link, instructor, and ordered lesson list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseOutline {
    #[serde(alias = "course_title")]
    pub title: String,
    #[serde(default, alias = "course_link")]
    pub link: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub lessons: Vec<LessonOutline>,
}

/// Searchable store of course material.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Semantic search over content fragments.
    ///
    /// Zero matches is `Ok` with empty results; a failed search may be
    /// reported either as `Err` or through [`SearchResults::error`].
    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, RagError>;

    /// Look up the outline of the course best matching `course`.
    async fn course_outline(&self, course: &str) -> Result<Option<CourseOutline>, RagError>;

    /// Link to a lesson, when the repository knows one.
    async fn lesson_link(
        &self,
        course_title: &str,
        lesson_number: u32,
    ) -> Result<Option<String>, RagError>;

    /// Titles of every course in the repository.
    async fn course_titles(&self) -> Result<Vec<String>, RagError>;
}
