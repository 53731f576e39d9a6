use tracing::{debug, info, warn};

use crate::api::CatalogApi;
use crate::error::{AppError, FieldErrors};
use crate::events::{Refresh, RefreshSender};
use crate::instances::filter::FetchScope;
use crate::models::{Course, CourseId, InstanceView};
use crate::notice::{Notice, Notices};
use crate::validation::{self, InstanceInput};

/// Create/edit surface for a course instance.
pub struct InstanceEditor {
    open: bool,
    editing: Option<InstanceView>,
    courses: Vec<Course>,
    values: InstanceInput,
    field_errors: FieldErrors,
    submitting: bool,
    notices: Notices,
    refresh: RefreshSender,
}

impl InstanceEditor {
    pub fn new(refresh: RefreshSender) -> Self {
        Self {
            open: false,
            editing: None,
            courses: Vec::new(),
            values: InstanceInput::default(),
            field_errors: FieldErrors::new(),
            submitting: false,
            notices: Notices::default(),
            refresh,
        }
    }

    /// Create mode. Defaults follow the active scope, else `current_year` and semester 1.
    pub fn open_create(
        &mut self,
        courses: Vec<Course>,
        scope: FetchScope,
        current_year: i32,
    ) -> Result<(), AppError> {
        let first = courses.first().map(|c| c.id).ok_or(AppError::NoCourses)?;
        let (year, semester) = scope.period().unwrap_or((current_year, 1));

        self.values = InstanceInput {
            course_id: first.to_string(),
            year: year.to_string(),
            semester: semester.to_string(),
            instructor: String::new(),
        };
        self.editing = None;
        self.courses = courses;
        self.field_errors = FieldErrors::new();
        self.open = true;
        debug!("instance editor opened for create ({}/{})", year, semester);
        Ok(())
    }

    pub fn open_edit(&mut self, instance: InstanceView, courses: Vec<Course>) {
        self.values = InstanceInput {
            course_id: instance.course_id.to_string(),
            year: instance.year.to_string(),
            semester: instance.semester.to_string(),
            instructor: instance.instructor.clone(),
        };
        debug!("instance editor opened for instance {}", instance.id);
        self.editing = Some(instance);
        self.courses = courses;
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

    pub fn editing(&self) -> Option<&InstanceView> {
        self.editing.as_ref()
    }

    pub fn values(&self) -> &InstanceInput {
        &self.values
    }

    pub fn set_course(&mut self, id: CourseId) {
        self.values.course_id = id.to_string();
    }

    pub fn set_year(&mut self, year: impl Into<String>) {
        self.values.year = year.into();
    }

    pub fn set_semester(&mut self, semester: impl Into<String>) {
        self.values.semester = semester.into();
    }

    pub fn set_instructor(&mut self, instructor: impl Into<String>) {
        self.values.instructor = instructor.into();
    }

    /// Selectable courses as `(id, "Name (CODE)")`.
    pub fn course_options(&self) -> Vec<(CourseId, String)> {
        self.courses
            .iter()
            .map(|c| (c.id, format!("{} ({})", c.name, c.code)))
            .collect()
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Validates and sends the form; success closes the editor and requests one
    /// instance refresh, failure keeps the entered values.
    pub async fn submit(&mut self, api: &dyn CatalogApi) -> Result<InstanceView, AppError> {
        let payload = match validation::validate_instance(&self.values) {
            Ok(payload) => payload,
            Err(errors) => {
                debug!("instance form rejected: {}", errors);
                self.field_errors = errors.clone();
                return Err(AppError::Validation(errors));
            }
        };
        self.field_errors = FieldErrors::new();

        let verb = if self.editing.is_some() { "update" } else { "create" };
        self.submitting = true;
        let result = match &self.editing {
            // addressed by where the instance was listed, not by the edited values
            Some(original) => {
                api.update_instance(original.year, original.semester, original.id, &payload)
                    .await
            }
            None => api.create_instance(&payload).await,
        };
        self.submitting = false;

        match result {
            Ok(instance) => {
                info!("instance {} {}d", instance.id, verb);
                self.notices
                    .push(Notice::success(format!("Instance {}d successfully.", verb)));
                self.refresh.request(Refresh::Instances);
                self.close();
                Ok(instance)
            }
            Err(e) => {
                warn!("failed to {} instance: {}", verb, e);
                self.notices.push(Notice::error(
                    "Error",
                    format!("Failed to {} instance: {}", verb, e),
                ));
                Err(e)
            }
        }
    }
}
