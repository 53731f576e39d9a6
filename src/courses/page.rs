use std::sync::Arc;

use tracing::{error, info, warn};

use crate::api::CatalogApi;
use crate::courses::editor::CourseEditor;
use crate::courses::prerequisites::{self, PrerequisiteRef};
use crate::error::AppError;
use crate::events::{Refresh, RefreshReceiver, RefreshSender, refresh_channel};
use crate::models::{Course, CourseId};
use crate::notice::{Notice, Notices};

/// The course list together with its editor, details view and delete flow.
pub struct CoursesPage {
    api: Arc<dyn CatalogApi>,
    courses: Vec<Course>,
    loading: bool,
    error: Option<String>,
    details: Option<Course>,
    editor: CourseEditor,
    notices: Notices,
    refresh_tx: RefreshSender,
    refresh_rx: RefreshReceiver,
}

impl CoursesPage {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        let (refresh_tx, refresh_rx) = refresh_channel();
        Self {
            api,
            courses: Vec::new(),
            loading: false,
            error: None,
            details: None,
            editor: CourseEditor::new(refresh_tx.clone()),
            notices: Notices::default(),
            refresh_tx,
            refresh_rx,
        }
    }

    /// Refetches the list. On failure the previous list is kept.
    pub async fn load(&mut self) -> Result<(), AppError> {
        self.loading = true;
        self.error = None;
        let result = self.api.list_courses().await;
        self.loading = false;

        match result {
            Ok(courses) => {
                info!("loaded {} courses", courses.len());
                self.editor.set_all_courses(courses.clone());
                self.courses = courses;
                Ok(())
            }
            Err(e) => {
                error!("failed to load courses: {}", e);
                let message = format!("Failed to load courses: {}", e);
                self.notices.push(Notice::error("Error", message.clone()));
                self.error = Some(message);
                Err(e)
            }
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn find(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn prerequisites_of<'a>(&'a self, course: &Course) -> Vec<PrerequisiteRef<'a>> {
        prerequisites::resolve(&self.courses, &course.prerequisites)
    }

    pub fn editor(&self) -> &CourseEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut CourseEditor {
        &mut self.editor
    }

    pub fn open_create(&mut self) {
        self.editor.open(None, self.courses.clone());
    }

    pub fn open_edit(&mut self, id: CourseId) -> Result<(), AppError> {
        let course = self.find(id).cloned().ok_or(AppError::NotLoaded(id))?;
        self.editor.open(Some(course), self.courses.clone());
        Ok(())
    }

    pub async fn submit_editor(&mut self) -> Result<Course, AppError> {
        let api = Arc::clone(&self.api);
        let result = self.editor.submit(api.as_ref()).await;
        for notice in self.editor.take_notices() {
            self.notices.push(notice);
        }
        self.process_refreshes().await;
        result
    }

    /// Deletes a course unless another loaded course still requires it.
    pub async fn delete(&mut self, id: CourseId) -> Result<(), AppError> {
        if let Err(e) = prerequisites::ensure_deletable(&self.courses, id) {
            warn!("refusing to delete course {}: {}", id, e);
            self.notices.push(Notice::error("Cannot Delete Course", e.to_string()));
            return Err(e);
        }

        match self.api.delete_course(id).await {
            Ok(()) => {
                info!("course {} deleted", id);
                self.notices.push(Notice::success("Course deleted successfully."));
                self.refresh_tx.request(Refresh::Courses);
                self.process_refreshes().await;
                Ok(())
            }
            Err(e) => {
                error!("failed to delete course {}: {}", id, e);
                self.notices.push(Notice::error(
                    "Error",
                    format!("Failed to delete course: {}", e),
                ));
                Err(e)
            }
        }
    }

    /// Fetches one course for the details view. A failure closes the view.
    pub async fn view_details(&mut self, id: CourseId) -> Result<Option<&Course>, AppError> {
        match self.api.get_course(id).await {
            Ok(course) => {
                self.details = course;
                Ok(self.details.as_ref())
            }
            Err(e) => {
                self.details = None;
                self.notices.push(Notice::error(
                    "Error",
                    format!("Failed to fetch course details: {}", e),
                ));
                Err(e)
            }
        }
    }

    pub fn details(&self) -> Option<&Course> {
        self.details.as_ref()
    }

    pub fn close_details(&mut self) {
        self.details = None;
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Handles queued refresh requests, one list fetch per request.
    pub async fn process_refreshes(&mut self) -> usize {
        let mut fetches = 0;
        while let Some(refresh) = self.refresh_rx.try_next() {
            if refresh != Refresh::Courses {
                continue;
            }
            fetches += 1;
            // load() records its own failure
            let _ = self.load().await;
        }
        fetches
    }
}
