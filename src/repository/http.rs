//! JSON-over-HTTP client for an external content search service.
//!
//! Endpoints, relative to the base URL:
//! - `POST /search` with a [`SearchQuery`] body, answering [`SearchResults`]
//! - `GET /courses/outline?course_name=..` answering a [`CourseOutline`], 404 when unknown
//! - `GET /courses/lesson-link?course_title=..&lesson_number=..` answering `{"link": ..}`
//! - `GET /courses` answering `{"course_titles": [..]}`

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{ContentRepository, CourseOutline, SearchQuery, SearchResults};
use crate::error::RagError;
use crate::provider::http::shared_client;

pub struct HttpContentRepository {
    base_url: String,
}

impl HttpContentRepository {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, RagError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(RagError::Repository(format!(
            "status {}: {}",
            status.as_u16(),
            body
        )))
    }
}

#[derive(Deserialize)]
struct LessonLinkResponse {
    #[serde(default)]
    link: Option<String>,
}

#[derive(Deserialize)]
struct CatalogResponse {
    #[serde(default)]
    course_titles: Vec<String>,
}

#[async_trait]
impl ContentRepository for HttpContentRepository {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, RagError> {
        debug!(
            query = query.query.as_str(),
            course = ?query.course_name,
            lesson = ?query.lesson_number,
            "repository search"
        );
        let resp = shared_client()
            .post(format!("{}/search", self.base_url))
            .json(query)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        Ok(resp.json().await?)
    }

    async fn course_outline(&self, course: &str) -> Result<Option<CourseOutline>, RagError> {
        let resp = shared_client()
            .get(format!("{}/courses/outline", self.base_url))
            .query(&[("course_name", course)])
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = Self::check(resp).await?;
        Ok(Some(resp.json().await?))
    }

    async fn lesson_link(
        &self,
        course_title: &str,
        lesson_number: u32,
    ) -> Result<Option<String>, RagError> {
        let lesson = lesson_number.to_string();
        let resp = shared_client()
            .get(format!("{}/courses/lesson-link", self.base_url))
            .query(&[("course_title", course_title), ("lesson_number", lesson.as_str())])
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = Self::check(resp).await?;
        let body: LessonLinkResponse = resp.json().await?;
        Ok(body.link)
    }

    async fn course_titles(&self) -> Result<Vec<String>, RagError> {
        let resp = shared_client()
            .get(format!("{}/courses", self.base_url))
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let body: CatalogResponse = resp.json().await?;
        Ok(body.course_titles)
    }
}
