pub mod course;
pub mod instance;

pub use course::{Course, CourseId, CoursePayload};
pub use instance::{InstanceId, InstancePayload, InstanceView};
