//! Tests for test utilities.

use super::*;
use serial_test::serial;

#[test]
fn test_workflow_context_pr() {
    assert_eq!(workflow_context_from(Some("refs/pull/456/merge")), "pr456");
}

#[test]
fn test_workflow_context_main_branch() {
    assert_eq!(workflow_context_from(Some("refs/heads/main")), "main");
}

#[test]
fn test_workflow_context_master_branch() {
    assert_eq!(workflow_context_from(Some("refs/heads/master")), "main");
}

#[test]
fn test_workflow_context_feature_branch() {
    assert_eq!(
        workflow_context_from(Some("refs/heads/feature/new-feature")),
        "feature-new-feature"
    );
}

#[test]
fn test_workflow_context_unknown_ref() {
    assert_eq!(workflow_context_from(Some("refs/tags/v1.0.0")), "local");
    assert_eq!(workflow_context_from(Some("refs/pull/")), "local");
    assert_eq!(workflow_context_from(None), "local");
}

#[test]
#[serial]
fn test_workflow_context_reads_environment() {
    unsafe {
        std::env::set_var("GITHUB_REF", "refs/pull/7/merge");
    }
    assert_eq!(workflow_context(), "pr7");
    unsafe {
        std::env::remove_var("GITHUB_REF");
    }
    assert_eq!(workflow_context(), "local");
}

#[test]
fn test_must_returns_value() {
    let value: i32 = must(Ok::<_, String>(7));
    assert_eq!(value, 7);
}

#[test]
#[should_panic(expected = "boom")]
fn test_must_panics_with_error_message() {
    let _: i32 = must(Err::<i32, _>("boom"));
}

#[test]
fn test_init_logging_is_idempotent() {
    init_logging();
    init_logging();
}
