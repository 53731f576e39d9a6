mod common;

use std::sync::Arc;

use common::{Call, RecordingCatalog, course};
use course_admin::courses::{CoursesPage, EditorMode, PrerequisiteRef};
use course_admin::error::{AppError, ErrorKind};

async fn loaded_page(catalog: &Arc<RecordingCatalog>) -> CoursesPage {
    let mut page = CoursesPage::new(catalog.clone());
    page.load().await.expect("Failed to load courses");
    catalog.clear_calls();
    page
}

fn two_courses() -> Arc<RecordingCatalog> {
    Arc::new(RecordingCatalog::new(
        vec![course(1, "CS101", vec![]), course(2, "CS201", vec![1])],
        vec![],
    ))
}

#[tokio::test]
async fn test_candidates_exclude_course_being_edited() {
    let catalog = Arc::new(RecordingCatalog::new(
        vec![
            course(1, "CS101", vec![]),
            course(2, "CS201", vec![]),
            course(3, "CS301", vec![]),
        ],
        vec![],
    ));
    let mut page = loaded_page(&catalog).await;

    for id in [1, 2, 3] {
        page.open_edit(id).expect("course should be loaded");
        let candidates: Vec<_> = page.editor().candidates().iter().map(|c| c.id).collect();
        assert!(!candidates.contains(&id), "course {} offered as its own prerequisite", id);
        assert_eq!(candidates.len(), 2);
    }

    page.open_create();
    assert_eq!(page.editor().candidates().len(), 3);
}

#[tokio::test]
async fn test_toggle_twice_restores_selection() {
    let catalog = Arc::new(RecordingCatalog::new(
        vec![
            course(1, "CS101", vec![]),
            course(2, "CS201", vec![]),
            course(3, "CS301", vec![1]),
        ],
        vec![],
    ));
    let mut page = loaded_page(&catalog).await;
    page.open_edit(3).unwrap();

    let editor = page.editor_mut();
    let before = editor.values().prerequisites.clone();

    assert!(editor.toggle_prerequisite(2).unwrap());
    assert!(editor.is_selected(2));
    assert!(!editor.toggle_prerequisite(2).unwrap());
    assert_eq!(editor.values().prerequisites, before);

    // already-selected id: off then on again
    assert!(!editor.toggle_prerequisite(1).unwrap());
    assert!(editor.toggle_prerequisite(1).unwrap());
    assert_eq!(editor.values().prerequisites, before);
}

#[tokio::test]
async fn test_selecting_self_is_rejected() {
    let catalog = two_courses();
    let mut page = loaded_page(&catalog).await;
    page.open_edit(2).unwrap();

    let err = page.editor_mut().toggle_prerequisite(2).unwrap_err();
    assert!(matches!(err, AppError::SelfPrerequisite(2)));
    assert_eq!(err.kind(), ErrorKind::Invariant);
    assert!(!page.editor().is_selected(2));
}

#[tokio::test]
async fn test_delete_of_required_course_is_blocked_locally() {
    let catalog = two_courses();
    let mut page = loaded_page(&catalog).await;

    let err = page.delete(1).await.unwrap_err();
    match err {
        AppError::PrerequisiteInUse { course_id, ref dependents } => {
            assert_eq!(course_id, 1);
            assert_eq!(dependents, &vec![2]);
        }
        other => panic!("expected PrerequisiteInUse, got {:?}", other),
    }
    assert!(catalog.calls().is_empty(), "no request may be sent");

    let notices = page.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, "Cannot Delete Course");
    assert_eq!(page.courses().len(), 2);
}

#[tokio::test]
async fn test_delete_of_unreferenced_course_refreshes_once() {
    let catalog = two_courses();
    let mut page = loaded_page(&catalog).await;

    page.delete(2).await.expect("Failed to delete course");

    assert_eq!(catalog.calls(), vec![Call::DeleteCourse(2), Call::ListCourses]);
    assert_eq!(page.courses().len(), 1);
    assert_eq!(page.take_notices()[0].description, "Course deleted successfully.");
}

#[tokio::test]
async fn test_dangling_prerequisite_renders_unknown_marker() {
    let catalog = Arc::new(RecordingCatalog::new(
        vec![course(1, "CS101", vec![]), course(5, "CS500", vec![1, 99])],
        vec![],
    ));
    let page = loaded_page(&catalog).await;

    let course = page.find(5).unwrap().clone();
    let refs = page.prerequisites_of(&course);
    assert_eq!(refs.len(), 2);
    assert!(refs[0].is_known());
    assert_eq!(refs[1], PrerequisiteRef::Unknown(99));
    assert_eq!(refs[1].to_string(), "unknown course (99)");
}

#[tokio::test]
async fn test_failed_create_keeps_values_and_server_message() {
    let catalog = two_courses();
    let mut page = loaded_page(&catalog).await;
    page.open_create();
    {
        let editor = page.editor_mut();
        editor.set_code("CS999");
        editor.set_name("Compilers");
        editor.set_description("Parsing and code generation.");
        editor.toggle_prerequisite(2).unwrap();
    }
    let before = page.editor().values().clone();
    catalog.fail_with(409, "Course code already exists");

    let err = page.submit_editor().await.unwrap_err();
    assert_eq!(err.to_string(), "Course code already exists");
    assert_eq!(err.kind(), ErrorKind::Network);

    assert!(page.editor().is_open());
    assert!(!page.editor().is_submitting());
    assert_eq!(page.editor().values(), &before);
    assert_eq!(catalog.calls().len(), 1, "a failed submit must not refresh");

    let notices = page.take_notices();
    assert_eq!(
        notices[0].description,
        "Failed to create course: Course code already exists"
    );
}

#[tokio::test]
async fn test_successful_create_closes_and_refreshes_once() {
    let catalog = two_courses();
    let mut page = loaded_page(&catalog).await;
    page.open_create();
    {
        let editor = page.editor_mut();
        assert_eq!(editor.mode(), EditorMode::Create);
        editor.set_code("CS301");
        editor.set_name("Operating Systems");
        editor.set_description("Processes and memory.");
        editor.toggle_prerequisite(2).unwrap();
        editor.toggle_prerequisite(1).unwrap();
    }

    let created = page.submit_editor().await.expect("Failed to create course");
    assert_eq!(created.prerequisites, vec![2, 1]);

    let calls = catalog.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(calls[0], Call::CreateCourse(_)));
    assert_eq!(calls[1], Call::ListCourses);

    assert!(!page.editor().is_open());
    assert_eq!(page.courses().len(), 3);
    assert_eq!(page.take_notices()[0].description, "Course created successfully.");
}

#[tokio::test]
async fn test_invalid_form_never_reaches_network() {
    let catalog = two_courses();
    let mut page = loaded_page(&catalog).await;
    page.open_create();
    page.editor_mut().set_code("WAY-TOO-LONG-CODE");

    let err = page.submit_editor().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(catalog.calls().is_empty());

    let errors = page.editor().field_errors();
    assert_eq!(errors.get("code"), ["Code must be 10 characters or less."]);
    assert_eq!(errors.get("name"), ["Course name is required."]);
    assert!(page.editor().is_open());
}

#[tokio::test]
async fn test_update_sends_edited_course_id() {
    let catalog = two_courses();
    let mut page = loaded_page(&catalog).await;
    page.open_edit(2).unwrap();
    assert_eq!(page.editor().mode(), EditorMode::Edit(2));

    page.editor_mut().set_name("Data Structures");
    page.editor_mut().toggle_prerequisite(1).unwrap();
    page.submit_editor().await.expect("Failed to update course");

    match &catalog.calls()[0] {
        Call::UpdateCourse(id, payload) => {
            assert_eq!(*id, 2);
            assert_eq!(payload.name, "Data Structures");
            assert!(payload.prerequisites.is_empty());
        }
        other => panic!("expected update, got {:?}", other),
    }
    assert_eq!(page.find(2).unwrap().name, "Data Structures");
    assert!(page.find(2).unwrap().prerequisites.is_empty());
}

#[tokio::test]
async fn test_failed_load_keeps_previous_list() {
    let catalog = two_courses();
    let mut page = loaded_page(&catalog).await;
    catalog.fail_with(503, "Service unavailable");

    assert!(page.load().await.is_err());
    assert_eq!(page.courses().len(), 2);
    assert_eq!(page.error(), Some("Failed to load courses: Service unavailable"));
}

#[tokio::test]
async fn test_details_failure_closes_view() {
    let catalog = two_courses();
    let mut page = loaded_page(&catalog).await;

    let shown = page.view_details(1).await.expect("Failed to fetch details");
    assert_eq!(shown.map(|c| c.id), Some(1));

    catalog.fail_with(500, "boom");
    assert!(page.view_details(1).await.is_err());
    assert!(page.details().is_none());
    let notices = page.take_notices();
    assert_eq!(notices.last().unwrap().description, "Failed to fetch course details: boom");
}
