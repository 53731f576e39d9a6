use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::models::CourseId;

/// Field name to the list of human-readable problems found in that field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(value)` when no field collected an error.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Network,
    Invariant,
    Config,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid data provided: {0}")]
    Validation(FieldErrors),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("This course is a prerequisite for other courses. Remove it from those courses before deleting.")]
    PrerequisiteInUse {
        course_id: CourseId,
        dependents: Vec<CourseId>,
    },

    #[error("A course cannot be its own prerequisite")]
    SelfPrerequisite(CourseId),

    #[error("Please create courses first before adding instances.")]
    NoCourses,

    #[error("Configuration error: {0}")]
    Config(String),

    /// The id is not among the rows loaded by the page; no request was made.
    #[error("No loaded record has id {0}")]
    NotLoaded(i64),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Api { .. }
            | AppError::Transport(_)
            | AppError::Decode(_) => ErrorKind::Network,
            AppError::PrerequisiteInUse { .. }
            | AppError::SelfPrerequisite(_)
            | AppError::NoCourses
            | AppError::NotLoaded(_) => ErrorKind::Invariant,
            AppError::Config(_) => ErrorKind::Config,
        }
    }

    /// Status-code fallback used when the server gives no message of its own.
    pub fn status(status: u16) -> Self {
        AppError::Api {
            status,
            message: format!("API request failed with status {}", status),
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Validation(errors)
    }
}
