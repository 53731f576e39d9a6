//! Shape and range checks applied to raw form input before anything is sent.
//!
//! Every validator is all-or-nothing: it returns the normalized payload or the
//! full set of field errors, never a partially accepted value.

use crate::error::FieldErrors;
use crate::models::{CourseId, CoursePayload, InstancePayload};

pub const CODE_MAX: usize = 10;
pub const NAME_MAX: usize = 100;
pub const INSTRUCTOR_MAX: usize = 100;
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 2000..=2100;
pub const SEMESTER_RANGE: std::ops::RangeInclusive<i32> = 1..=8;

/// Values as entered in the course form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseInput {
    pub code: String,
    pub name: String,
    pub description: String,
    pub prerequisites: Vec<CourseId>,
}

/// Values as entered in the instance form; numbers arrive as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceInput {
    pub course_id: String,
    pub year: String,
    pub semester: String,
    pub instructor: String,
}

/// Raw filter fields; an empty string means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterInput {
    pub year: String,
    pub semester: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstanceFilter {
    pub year: Option<i32>,
    pub semester: Option<i32>,
}

pub fn validate_course(input: &CourseInput) -> Result<CoursePayload, FieldErrors> {
    let mut errors = FieldErrors::new();

    let code = input.code.trim();
    if code.is_empty() {
        errors.push("code", "Course code is required.");
    } else if code.chars().count() > CODE_MAX {
        errors.push("code", "Code must be 10 characters or less.");
    }

    let name = input.name.trim();
    if name.is_empty() {
        errors.push("name", "Course name is required.");
    } else if name.chars().count() > NAME_MAX {
        errors.push("name", "Course name must be 100 characters or less.");
    }

    if input.description.trim().is_empty() {
        errors.push("description", "Description is required.");
    }

    let mut prerequisites: Vec<CourseId> = Vec::with_capacity(input.prerequisites.len());
    for id in &input.prerequisites {
        if !prerequisites.contains(id) {
            prerequisites.push(*id);
        }
    }

    errors.into_result(CoursePayload {
        code: code.to_string(),
        name: name.to_string(),
        description: input.description.clone(),
        prerequisites,
    })
}

pub fn validate_instance(input: &InstanceInput) -> Result<InstancePayload, FieldErrors> {
    let mut errors = FieldErrors::new();

    let course_id = match input.course_id.trim().parse::<CourseId>() {
        Ok(id) if id >= 1 => id,
        _ => {
            errors.push("course_id", "Please select a course.");
            0
        }
    };

    let year = match input.year.trim().parse::<i32>() {
        Ok(year) if year < *YEAR_RANGE.start() => {
            errors.push("year", "Year must be 2000 or later.");
            year
        }
        Ok(year) if year > *YEAR_RANGE.end() => {
            errors.push("year", "Year must be 2100 or earlier.");
            year
        }
        Ok(year) => year,
        Err(_) => {
            errors.push("year", "Year must be a number.");
            0
        }
    };

    let raw_semester = input.semester.trim();
    let semester = if raw_semester.is_empty() {
        errors.push("semester", "Semester is required (e.g., 1 for Spring, 2 for Fall).");
        0
    } else {
        match raw_semester.parse::<i32>() {
            Ok(s) if SEMESTER_RANGE.contains(&s) => s,
            Ok(s) => {
                errors.push("semester", "Semester must be between 1 and 8.");
                s
            }
            Err(_) => {
                errors.push("semester", "Semester must be a number.");
                0
            }
        }
    };

    let instructor = input.instructor.trim();
    if instructor.is_empty() {
        errors.push("instructor", "Instructor name is required.");
    } else if instructor.chars().count() > INSTRUCTOR_MAX {
        errors.push("instructor", "Instructor name must be 100 characters or less.");
    }

    errors.into_result(InstancePayload {
        course_id,
        year,
        semester,
        instructor: instructor.to_string(),
    })
}

pub fn validate_filter(input: &FilterInput) -> Result<InstanceFilter, FieldErrors> {
    let mut errors = FieldErrors::new();
    let year = parse_filter_field(&input.year, "year", "Year must be a number.", &mut errors);
    let semester = parse_filter_field(
        &input.semester,
        "semester",
        "Semester must be a number.",
        &mut errors,
    );

    let in_range = year.is_none_or(|y| YEAR_RANGE.contains(&y))
        && semester.is_none_or(|s| SEMESTER_RANGE.contains(&s));
    if errors.is_empty() && !in_range {
        errors.push("filter", "Invalid filter values");
    }

    errors.into_result(InstanceFilter { year, semester })
}

fn parse_filter_field(
    raw: &str,
    field: &str,
    message: &str,
    errors: &mut FieldErrors,
) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if !raw.chars().all(|c| c.is_ascii_digit()) {
        errors.push(field, message);
        return None;
    }
    match raw.parse::<i32>() {
        Ok(value) => Some(value),
        Err(_) => {
            errors.push(field, message);
            None
        }
    }
}
