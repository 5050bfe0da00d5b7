use intake_storage::error::StorageError;
use intake_storage::objects::is_conditional_write_conflict;

#[test]
fn conditional_write_codes() {
    assert!(is_conditional_write_conflict(Some("PreconditionFailed")));
    assert!(is_conditional_write_conflict(Some("ConditionalRequestConflict")));
    assert!(!is_conditional_write_conflict(Some("AccessDenied")));
    assert!(!is_conditional_write_conflict(None));
}

#[test]
fn error_messages_name_the_key() {
    let err = StorageError::AlreadyExists {
        key: "forms/abc.json".to_string(),
    };
    assert_eq!(err.to_string(), "object already exists: forms/abc.json");
}
