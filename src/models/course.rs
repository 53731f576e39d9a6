use serde::{Deserialize, Serialize};

pub type CourseId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prerequisites: Vec<CourseId>,
}

impl Course {
    pub fn requires(&self, id: CourseId) -> bool {
        self.prerequisites.contains(&id)
    }
}

/// Body of a create or update request; the server assigns `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoursePayload {
    pub code: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub prerequisites: Vec<CourseId>,
}
