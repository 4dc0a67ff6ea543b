use super::*;
use std::error::Error as StdError;

#[test]
fn test_invalid_image_error() {
    let error = Error::InvalidImage(":latest".to_string());

    assert_eq!(error.to_string(), "Invalid image reference: \":latest\"");
    assert!(error.source().is_none());
}

#[test]
fn test_not_managed_error() {
    let error = Error::NotManaged("postgres");
    assert_eq!(error.to_string(), "postgres is not running in a managed container");
}

#[test]
fn test_snapshot_error_has_source() {
    let error = Error::Snapshot {
        action: "restore",
        source: sqlx::Error::PoolClosed,
    };

    assert!(error.to_string().starts_with("Could not restore postgres snapshot: "));
    assert!(error.source().is_some());
}

#[test]
fn test_kafka_error_is_transparent() {
    let error = Error::from(testkit_kafka::Error::NoBrokers);
    assert_eq!(
        error.to_string(),
        testkit_kafka::Error::NoBrokers.to_string()
    );
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Error>();
}
