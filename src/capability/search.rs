//! Semantic search over course content.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::{invalid_arguments, Capability, CapabilityArguments, CapabilityOutput, CapabilitySchema};
use crate::evidence::Evidence;
use crate::repository::{ContentRepository, SearchQuery, SearchResults};

pub const SEARCH_CAPABILITY_NAME: &str = "search_course_content";

/// Prefix of the result text when nothing matched.
pub const NO_CONTENT_FOUND: &str = "No relevant content found";

/// Prefix of the result text when the repository failed.
pub const SEARCH_FAILED: &str = "Search failed";

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
    #[serde(default)]
    course_name: Option<String>,
    #[serde(default)]
    lesson_number: Option<u32>,
}

/// Searches fragments with optional course and lesson filters.
///
/// Records one evidence item per matched fragment. Results are never widened
/// when a filtered search comes back empty.
pub struct ContentSearchCapability {
    repository: Arc<dyn ContentRepository>,
    schema: CapabilitySchema,
}

impl ContentSearchCapability {
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        let parameters = CapabilitySchema::object()
            .string("query", "What to search for in the course content", true)
            .string(
                "course_name",
                "Course title (partial matches work, e.g. 'MCP', 'Introduction')",
                false,
            )
            .integer(
                "lesson_number",
                "Specific lesson number to search within (e.g. 1, 2, 3)",
                false,
            )
            .build();
        Self {
            repository,
            schema: CapabilitySchema::new(
                SEARCH_CAPABILITY_NAME,
                "Search course materials with smart course name matching and lesson filtering",
                parameters,
            ),
        }
    }

    async fn format_results(&self, results: &SearchResults) -> CapabilityOutput {
        let mut blocks = Vec::with_capacity(results.documents.len());
        let mut evidence = Vec::with_capacity(results.documents.len());

        for (document, meta) in results.fragments() {
            let (header, source, link) = match meta.lesson_number {
                Some(lesson) => {
                    let link = match self.repository.lesson_link(&meta.course_title, lesson).await {
                        Ok(link) => link,
                        Err(e) => {
                            warn!(course = meta.course_title.as_str(), lesson, error = %e, "lesson link lookup failed");
                            None
                        }
                    };
                    (
                        format!("[{} — Lesson {}]", meta.course_title, lesson),
                        format!("{} - Lesson {}", meta.course_title, lesson),
                        link,
                    )
                }
                None => (
                    format!("[{}]", meta.course_title),
                    meta.course_title.clone(),
                    None,
                ),
            };
            blocks.push(format!("{header}\n{document}"));
            evidence.push(Evidence::new(source).with_link(link));
        }

        CapabilityOutput::with_evidence(blocks.join("\n\n"), evidence)
    }
}

fn no_content_message(query: &SearchQuery) -> String {
    let mut message = NO_CONTENT_FOUND.to_string();
    if let Some(course) = &query.course_name {
        message.push_str(&format!(" in course '{course}'"));
    }
    if let Some(lesson) = query.lesson_number {
        message.push_str(&format!(" in lesson {lesson}"));
    }
    message.push('.');
    message
}

#[async_trait]
impl Capability for ContentSearchCapability {
    fn schema(&self) -> &CapabilitySchema {
        &self.schema
    }

    async fn execute(&self, args: &CapabilityArguments) -> CapabilityOutput {
        let params: SearchParams = match args.deserialize() {
            Ok(params) => params,
            Err(e) => return CapabilityOutput::text_only(invalid_arguments(SEARCH_CAPABILITY_NAME, e)),
        };
        let query = SearchQuery {
            query: params.query,
            course_name: params.course_name,
            lesson_number: params.lesson_number,
        };

        let results = match self.repository.search(&query).await {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "content search failed");
                return CapabilityOutput::text_only(format!("{SEARCH_FAILED}: {e}"));
            }
        };
        if let Some(error) = &results.error {
            warn!(error = error.as_str(), "repository reported a search error");
            return CapabilityOutput::text_only(format!("{SEARCH_FAILED}: {error}"));
        }
        if results.is_empty() {
            return CapabilityOutput::text_only(no_content_message(&query));
        }
        if !results.is_aligned() {
            warn!(
                documents = results.documents.len(),
                metadata = results.metadata.len(),
                "search results are missing metadata"
            );
            return CapabilityOutput::text_only(format!(
                "{SEARCH_FAILED}: {} documents but {} metadata entries",
                results.documents.len(),
                results.metadata.len()
            ));
        }

        self.format_results(&results).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_content_message_names_active_filters() {
        assert_eq!(
            no_content_message(&SearchQuery::new("x")),
            "No relevant content found."
        );
        assert_eq!(
            no_content_message(&SearchQuery::new("x").in_course("MCP").in_lesson(4)),
            "No relevant content found in course 'MCP' in lesson 4."
        );
    }
}
