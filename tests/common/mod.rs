#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use course_admin::api::CatalogApi;
use course_admin::error::AppError;
use course_admin::models::{Course, CourseId, CoursePayload, InstanceId, InstancePayload, InstanceView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListCourses,
    GetCourse(CourseId),
    CreateCourse(CoursePayload),
    UpdateCourse(CourseId, CoursePayload),
    DeleteCourse(CourseId),
    ListInstances,
    ListInstancesByPeriod(i32, i32),
    GetInstance(i32, i32, InstanceId),
    CreateInstance(InstancePayload),
    UpdateInstance(i32, i32, InstanceId, InstancePayload),
    DeleteInstance(i32, i32, InstanceId),
}

/// In-memory catalog that records every call and can be told to fail.
#[derive(Default)]
pub struct RecordingCatalog {
    courses: Mutex<Vec<Course>>,
    instances: Mutex<Vec<InstanceView>>,
    calls: Mutex<Vec<Call>>,
    failure: Mutex<Option<(u16, String)>>,
}

impl RecordingCatalog {
    pub fn new(courses: Vec<Course>, instances: Vec<InstanceView>) -> Self {
        Self {
            courses: Mutex::new(courses),
            instances: Mutex::new(instances),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Every following call fails with this status and message.
    pub fn fail_with(&self, status: u16, message: &str) {
        *self.failure.lock().unwrap() = Some((status, message.to_string()));
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    fn record(&self, call: Call) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().clone() {
            Some((status, message)) => Err(AppError::Api { status, message }),
            None => Ok(()),
        }
    }

    fn view(&self, id: InstanceId, payload: &InstancePayload) -> InstanceView {
        let courses = self.courses.lock().unwrap();
        let course = courses.iter().find(|c| c.id == payload.course_id);
        InstanceView {
            id,
            course_id: payload.course_id,
            course_name: course.map(|c| c.name.clone()).unwrap_or_default(),
            course_code: course.map(|c| c.code.clone()).unwrap_or_default(),
            course_description: course.map(|c| c.description.clone()).unwrap_or_default(),
            year: payload.year,
            semester: payload.semester,
            instructor: payload.instructor.clone(),
        }
    }
}

#[async_trait]
impl CatalogApi for RecordingCatalog {
    async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        self.record(Call::ListCourses)?;
        Ok(self.courses.lock().unwrap().clone())
    }

    async fn get_course(&self, id: CourseId) -> Result<Option<Course>, AppError> {
        self.record(Call::GetCourse(id))?;
        Ok(self.courses.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn create_course(&self, payload: &CoursePayload) -> Result<Course, AppError> {
        self.record(Call::CreateCourse(payload.clone()))?;
        let mut courses = self.courses.lock().unwrap();
        let id = courses.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let course = Course {
            id,
            code: payload.code.clone(),
            name: payload.name.clone(),
            description: payload.description.clone(),
            prerequisites: payload.prerequisites.clone(),
        };
        courses.push(course.clone());
        Ok(course)
    }

    async fn update_course(&self, id: CourseId, payload: &CoursePayload) -> Result<Course, AppError> {
        self.record(Call::UpdateCourse(id, payload.clone()))?;
        let mut courses = self.courses.lock().unwrap();
        let course = courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::status(404))?;
        course.code = payload.code.clone();
        course.name = payload.name.clone();
        course.description = payload.description.clone();
        course.prerequisites = payload.prerequisites.clone();
        Ok(course.clone())
    }

    async fn delete_course(&self, id: CourseId) -> Result<(), AppError> {
        self.record(Call::DeleteCourse(id))?;
        self.courses.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }

    async fn list_instances(&self) -> Result<Vec<InstanceView>, AppError> {
        self.record(Call::ListInstances)?;
        Ok(self.instances.lock().unwrap().clone())
    }

    async fn list_instances_by_period(
        &self,
        year: i32,
        semester: i32,
    ) -> Result<Vec<InstanceView>, AppError> {
        self.record(Call::ListInstancesByPeriod(year, semester))?;
        Ok(self
            .instances
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.year == year && i.semester == semester)
            .cloned()
            .collect())
    }

    async fn get_instance(
        &self,
        year: i32,
        semester: i32,
        id: InstanceId,
    ) -> Result<Option<InstanceView>, AppError> {
        self.record(Call::GetInstance(year, semester, id))?;
        Ok(self
            .instances
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id && i.year == year && i.semester == semester)
            .cloned())
    }

    async fn create_instance(&self, payload: &InstancePayload) -> Result<InstanceView, AppError> {
        self.record(Call::CreateInstance(payload.clone()))?;
        let id = self.instances.lock().unwrap().iter().map(|i| i.id).max().unwrap_or(0) + 1;
        let view = self.view(id, payload);
        self.instances.lock().unwrap().push(view.clone());
        Ok(view)
    }

    async fn update_instance(
        &self,
        year: i32,
        semester: i32,
        id: InstanceId,
        payload: &InstancePayload,
    ) -> Result<InstanceView, AppError> {
        self.record(Call::UpdateInstance(year, semester, id, payload.clone()))?;
        let view = self.view(id, payload);
        let mut instances = self.instances.lock().unwrap();
        let slot = instances
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| AppError::status(404))?;
        *slot = view.clone();
        Ok(view)
    }

    async fn delete_instance(&self, year: i32, semester: i32, id: InstanceId) -> Result<(), AppError> {
        self.record(Call::DeleteInstance(year, semester, id))?;
        self.instances.lock().unwrap().retain(|i| i.id != id);
        Ok(())
    }
}

pub fn course(id: CourseId, code: &str, prerequisites: Vec<CourseId>) -> Course {
    Course {
        id,
        code: code.to_string(),
        name: format!("{} course", code),
        description: format!("All about {}", code),
        prerequisites,
    }
}

pub fn instance(id: InstanceId, course: &Course, year: i32, semester: i32) -> InstanceView {
    InstanceView {
        id,
        course_id: course.id,
        course_name: course.name.clone(),
        course_code: course.code.clone(),
        course_description: course.description.clone(),
        year,
        semester,
        instructor: "Dr. Gangadhar Sashtri".to_string(),
    }
}
