pub mod editor;
pub mod page;
pub mod prerequisites;

pub use editor::{CourseEditor, EditorMode};
pub use page::CoursesPage;
pub use prerequisites::{PrerequisiteRef, candidates, dependents_of, ensure_deletable, resolve};
