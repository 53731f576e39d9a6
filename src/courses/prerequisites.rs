//! Prerequisite graph queries over the currently loaded course list.

use std::fmt;

use crate::error::AppError;
use crate::models::{Course, CourseId};

/// Courses selectable as prerequisites: everything except the course being edited.
pub fn candidates(all: &[Course], editing: Option<CourseId>) -> Vec<&Course> {
    all.iter().filter(|c| Some(c.id) != editing).collect()
}

/// Courses (other than `id` itself) that list `id` as a prerequisite.
pub fn dependents_of(all: &[Course], id: CourseId) -> Vec<&Course> {
    all.iter().filter(|c| c.id != id && c.requires(id)).collect()
}

/// Local guard run before any delete request. The API does not enforce this.
pub fn ensure_deletable(all: &[Course], id: CourseId) -> Result<(), AppError> {
    let dependents: Vec<CourseId> = dependents_of(all, id).iter().map(|c| c.id).collect();
    if dependents.is_empty() {
        Ok(())
    } else {
        Err(AppError::PrerequisiteInUse {
            course_id: id,
            dependents,
        })
    }
}

/// A prerequisite id resolved against the loaded list. Dangling ids are expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrerequisiteRef<'a> {
    Known(&'a Course),
    Unknown(CourseId),
}

impl PrerequisiteRef<'_> {
    pub fn is_known(&self) -> bool {
        matches!(self, PrerequisiteRef::Known(_))
    }
}

impl fmt::Display for PrerequisiteRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrerequisiteRef::Known(course) => write!(f, "{} - {}", course.code, course.name),
            PrerequisiteRef::Unknown(id) => write!(f, "unknown course ({})", id),
        }
    }
}

/// Resolves ids in the order given, keeping one entry per id.
pub fn resolve<'a>(all: &'a [Course], ids: &[CourseId]) -> Vec<PrerequisiteRef<'a>> {
    ids.iter()
        .map(|id| match all.iter().find(|c| c.id == *id) {
            Some(course) => PrerequisiteRef::Known(course),
            None => PrerequisiteRef::Unknown(*id),
        })
        .collect()
}
