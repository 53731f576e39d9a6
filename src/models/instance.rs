use serde::{Deserialize, Serialize};

use super::CourseId;

pub type InstanceId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstancePayload {
    pub course_id: CourseId,
    pub year: i32,
    pub semester: i32,
    pub instructor: String,
}

/// Read model: an instance joined with its parent course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceView {
    pub id: InstanceId,
    pub course_id: CourseId,
    pub course_name: String,
    pub course_code: String,
    #[serde(default)]
    pub course_description: String,
    pub year: i32,
    pub semester: i32,
    pub instructor: String,
}

