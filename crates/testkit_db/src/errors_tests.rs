use super::*;
use std::error::Error as StdError;

#[test]
fn test_empty_schema_name_error() {
    let error = Error::EmptySchemaName;

    assert_eq!(error.to_string(), "Schema name must not be empty");
    assert!(error.source().is_none());
}

#[test]
fn test_schema_error_names_action_and_schema() {
    let error = Error::Schema {
        action: SchemaAction::Create,
        schema: "tenant_1".to_string(),
        source: sqlx::Error::PoolClosed,
    };

    let message = error.to_string();
    assert!(message.starts_with("Could not create schema tenant_1: "));
    assert!(error.source().is_some());
}

#[test]
fn test_read_file_error_includes_path() {
    let error = Error::ReadFile {
        path: PathBuf::from("testdata/init.sql"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
    };

    assert_eq!(
        error.to_string(),
        "Could not read file testdata/init.sql: missing"
    );
}

#[test]
fn test_timeout_error() {
    let error = Error::Timeout {
        path: PathBuf::from("slow.sql"),
        timeout: Duration::from_secs(2),
    };

    assert_eq!(error.to_string(), "Executing file slow.sql timed out after 2s");
    assert!(error.source().is_none());
}

#[test]
fn test_schema_action_display() {
    assert_eq!(SchemaAction::Set.to_string(), "set");
    assert_eq!(SchemaAction::Create.to_string(), "create");
    assert_eq!(SchemaAction::Drop.to_string(), "drop");
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
}
