use tracing::{debug, info, warn};

use crate::api::CatalogApi;
use crate::courses::prerequisites::{self, PrerequisiteRef};
use crate::error::{AppError, FieldErrors};
use crate::events::{Refresh, RefreshSender};
use crate::models::{Course, CourseId};
use crate::notice::{Notice, Notices};
use crate::validation::{self, CourseInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(CourseId),
}

impl EditorMode {
    fn verb(self) -> &'static str {
        match self {
            EditorMode::Create => "create",
            EditorMode::Edit(_) => "update",
        }
    }
}

/// Create/edit surface for one course, including its prerequisite selection.
pub struct CourseEditor {
    open: bool,
    editing: Option<Course>,
    all_courses: Vec<Course>,
    values: CourseInput,
    field_errors: FieldErrors,
    submitting: bool,
    notices: Notices,
    refresh: RefreshSender,
}

impl CourseEditor {
    pub fn new(refresh: RefreshSender) -> Self {
        Self {
            open: false,
            editing: None,
            all_courses: Vec::new(),
            values: CourseInput::default(),
            field_errors: FieldErrors::new(),
            submitting: false,
            notices: Notices::default(),
            refresh,
        }
    }

    /// Opens the editor; `editing: None` means create mode.
    pub fn open(&mut self, editing: Option<Course>, all_courses: Vec<Course>) {
        self.values = match &editing {
            Some(course) => CourseInput {
                code: course.code.clone(),
                name: course.name.clone(),
                description: course.description.clone(),
                prerequisites: course
                    .prerequisites
                    .iter()
                    .copied()
                    .filter(|p| *p != course.id)
                    .collect(),
            },
            None => CourseInput::default(),
        };
        debug!("course editor opened in {:?} mode", mode_of(editing.as_ref()));
        self.editing = editing;
        self.all_courses = all_courses;
        self.field_errors = FieldErrors::new();
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.field_errors = FieldErrors::new();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn mode(&self) -> EditorMode {
        mode_of(self.editing.as_ref())
    }

    pub fn editing(&self) -> Option<&Course> {
        self.editing.as_ref()
    }

    /// Replaces the known course list, e.g. after the page reloads it.
    pub fn set_all_courses(&mut self, all_courses: Vec<Course>) {
        self.all_courses = all_courses;
    }

    pub fn candidates(&self) -> Vec<&Course> {
        prerequisites::candidates(&self.all_courses, self.editing.as_ref().map(|c| c.id))
    }

    pub fn values(&self) -> &CourseInput {
        &self.values
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.values.code = code.into();
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.values.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.values.description = description.into();
    }

    pub fn is_selected(&self, id: CourseId) -> bool {
        self.values.prerequisites.contains(&id)
    }

    /// Flips `id` in the selection and returns whether it is now selected.
    pub fn toggle_prerequisite(&mut self, id: CourseId) -> Result<bool, AppError> {
        if let EditorMode::Edit(own) = self.mode() {
            if own == id {
                return Err(AppError::SelfPrerequisite(id));
            }
        }

        if let Some(pos) = self.values.prerequisites.iter().position(|p| *p == id) {
            self.values.prerequisites.remove(pos);
            Ok(false)
        } else {
            self.values.prerequisites.push(id);
            Ok(true)
        }
    }

    /// Current selection in the order it was made.
    pub fn selected(&self) -> Vec<PrerequisiteRef<'_>> {
        prerequisites::resolve(&self.all_courses, &self.values.prerequisites)
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Validates and sends the form. On success the editor closes and exactly one
    /// course refresh is requested; on failure the entered values stay as they were.
    pub async fn submit(&mut self, api: &dyn CatalogApi) -> Result<Course, AppError> {
        let payload = match validation::validate_course(&self.values) {
            Ok(payload) => payload,
            Err(errors) => {
                debug!("course form rejected: {}", errors);
                self.field_errors = errors.clone();
                return Err(AppError::Validation(errors));
            }
        };
        self.field_errors = FieldErrors::new();

        let mode = self.mode();
        if let EditorMode::Edit(own) = mode {
            if payload.prerequisites.contains(&own) {
                return Err(AppError::SelfPrerequisite(own));
            }
        }

        self.submitting = true;
        let result = match mode {
            EditorMode::Create => api.create_course(&payload).await,
            EditorMode::Edit(id) => api.update_course(id, &payload).await,
        };
        self.submitting = false;

        match result {
            Ok(course) => {
                info!("course {} {}d", course.id, mode.verb());
                self.notices.push(Notice::success(format!(
                    "Course {}d successfully.",
                    mode.verb()
                )));
                self.refresh.request(Refresh::Courses);
                self.close();
                Ok(course)
            }
            Err(e) => {
                warn!("failed to {} course: {}", mode.verb(), e);
                self.notices.push(Notice::error(
                    "Error",
                    format!("Failed to {} course: {}", mode.verb(), e),
                ));
                Err(e)
            }
        }
    }
}

fn mode_of(editing: Option<&Course>) -> EditorMode {
    match editing {
        Some(course) => EditorMode::Edit(course.id),
        None => EditorMode::Create,
    }
}
