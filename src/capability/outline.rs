//! Course outline lookup.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use super::validation::validate_arguments;
use super::{invalid_arguments, Capability, CapabilityArguments, CapabilityOutput, CapabilitySchema};
use crate::evidence::Evidence;
use crate::repository::{ContentRepository, CourseOutline};

pub const OUTLINE_CAPABILITY_NAME: &str = "get_course_outline";

/// Prefix of the result text when the repository failed.
pub const OUTLINE_FAILED: &str = "Outline lookup failed";

#[derive(Debug, Deserialize)]
struct OutlineParams {
    #[serde(alias = "course")]
    course_name: String,
}

/// Returns title, link, instructor, and lesson list of one course.
///
/// Records exactly one evidence item, for the course itself.
pub struct OutlineCapability {
    repository: Arc<dyn ContentRepository>,
    schema: CapabilitySchema,
}

impl OutlineCapability {
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        let parameters = CapabilitySchema::object()
            .string(
                "course_name",
                "Course title or partial name (e.g. 'MCP', 'Computer Use')",
                true,
            )
            .build();
        Self {
            repository,
            schema: CapabilitySchema::new(
                OUTLINE_CAPABILITY_NAME,
                "Get a course outline: title, course link, instructor, and the complete numbered lesson list",
                parameters,
            ),
        }
    }
}

/// Human and model readable rendering of an outline.
pub fn format_outline(outline: &CourseOutline) -> String {
    let mut lines = vec![format!("Course: {}", outline.title)];
    if let Some(link) = &outline.link {
        lines.push(format!("Course Link: {link}"));
    }
    if let Some(instructor) = &outline.instructor {
        lines.push(format!("Instructor: {instructor}"));
    }
    lines.push(String::new());
    lines.push(format!("Lessons ({} total):", outline.lessons.len()));
    for lesson in &outline.lessons {
        lines.push(format!("Lesson {}: {}", lesson.number, lesson.title));
    }
    lines.join("\n")
}

#[async_trait]
impl Capability for OutlineCapability {
    fn schema(&self) -> &CapabilitySchema {
        &self.schema
    }

    /// Accepts `course` in place of `course_name`.
    fn validate(&self, args: &CapabilityArguments) -> Result<(), String> {
        let mut value = args.raw().clone();
        if let Some(obj) = value.as_object_mut() {
            if !obj.contains_key("course_name") {
                if let Some(course) = obj.remove("course") {
                    obj.insert("course_name".into(), course);
                }
            }
        }
        validate_arguments(&value, &self.schema.parameters)
    }

    async fn execute(&self, args: &CapabilityArguments) -> CapabilityOutput {
        let params: OutlineParams = match args.deserialize() {
            Ok(params) => params,
            Err(e) => return CapabilityOutput::text_only(invalid_arguments(OUTLINE_CAPABILITY_NAME, e)),
        };

        match self.repository.course_outline(&params.course_name).await {
            Ok(Some(outline)) => {
                let evidence = Evidence::new(outline.title.clone()).with_link(outline.link.clone());
                CapabilityOutput::with_evidence(format_outline(&outline), vec![evidence])
            }
            Ok(None) => CapabilityOutput::text_only(format!(
                "No course found matching '{}'",
                params.course_name
            )),
            Err(e) => {
                warn!(course = params.course_name.as_str(), error = %e, "outline lookup failed");
                CapabilityOutput::text_only(format!("{OUTLINE_FAILED}: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::LessonOutline;

    #[test]
    fn format_outline_skips_missing_fields() {
        let outline = CourseOutline {
            title: "Intro".into(),
            link: None,
            instructor: None,
            lessons: vec![LessonOutline {
                number: 1,
                title: "Start".into(),
                link: None,
            }],
        };
        assert_eq!(
            format_outline(&outline),
            "Course: Intro\n\nLessons (1 total):\nLesson 1: Start"
        );
    }
}
