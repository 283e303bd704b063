use taskstore_core::{Task, TaskValidationError};

#[test]
fn task_new_starts_unsaved() {
    let task = Task::new("hello", "open");

    assert_eq!(task.id, None);
    assert_eq!(task.title, "hello");
    assert_eq!(task.description, None);
    assert_eq!(task.status, "open");
    assert!(!task.is_persisted());
}

#[test]
fn with_id_rejects_non_positive_ids() {
    assert_eq!(
        Task::with_id(0, "zero", "open").unwrap_err(),
        TaskValidationError::NonPositiveId(0)
    );
    assert_eq!(
        Task::with_id(-7, "negative", "open").unwrap_err(),
        TaskValidationError::NonPositiveId(-7)
    );
    assert!(Task::with_id(1, "one", "open").unwrap().is_persisted());
}

#[test]
fn status_is_free_form() {
    for status in ["", "open", "Done", "waiting on review"] {
        assert!(Task::new("t", status).validate().is_ok());
    }
}

#[test]
fn task_serialization_uses_expected_wire_fields() {
    let task = Task::with_id(9, "ship release", "in_progress")
        .unwrap()
        .with_description("tag and publish");

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["id"], 9);
    assert_eq!(json["title"], "ship release");
    assert_eq!(json["description"], "tag and publish");
    assert_eq!(json["status"], "in_progress");

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn deserialize_without_id_yields_unsaved_task() {
    let task: Task = serde_json::from_str(r#"{ "title": "new", "status": "open" }"#).unwrap();
    assert_eq!(task, Task::new("new", "open"));
}
