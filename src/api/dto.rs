use serde::Deserialize;

use crate::models::{CourseId, InstanceId, InstanceView};

/// Error body returned by the catalog API on non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddedCourse {
    pub id: CourseId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// The API has served instances both with a nested `course` object and with
/// flattened `course_*` fields; both normalize to [`InstanceView`].
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InstanceResponse {
    Nested {
        id: InstanceId,
        #[serde(default)]
        course_id: Option<CourseId>,
        course: EmbeddedCourse,
        year: i32,
        semester: i32,
        instructor: String,
    },
    Flat(InstanceView),
}

impl From<InstanceResponse> for InstanceView {
    fn from(response: InstanceResponse) -> Self {
        match response {
            InstanceResponse::Nested {
                id,
                course_id,
                course,
                year,
                semester,
                instructor,
            } => InstanceView {
                id,
                course_id: course_id.unwrap_or(course.id),
                course_name: course.name,
                course_code: course.code,
                course_description: course.description,
                year,
                semester,
                instructor,
            },
            InstanceResponse::Flat(view) => view,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_and_flat_shapes_normalize_to_same_view() {
        let nested = r#"{"id":4,"course":{"id":1,"code":"CS101","name":"Intro","description":"Basics"},
            "year":2024,"semester":2,"instructor":"Dr. Rao"}"#;
        let flat = r#"{"id":4,"course_id":1,"course_name":"Intro","course_code":"CS101",
            "course_description":"Basics","year":2024,"semester":2,"instructor":"Dr. Rao"}"#;

        let a: InstanceView = serde_json::from_str::<InstanceResponse>(nested).unwrap().into();
        let b: InstanceView = serde_json::from_str::<InstanceResponse>(flat).unwrap().into();
        assert_eq!(a, b);
        assert_eq!(a.course_id, 1);
    }
}
