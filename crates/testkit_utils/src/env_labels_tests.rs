use super::*;
use serial_test::serial;

#[test]
fn test_labels_from_vars_strips_prefix_and_rewrites_key() {
    let labels = labels_from_vars([
        ("TEST_LABEL_TEAM_NAME", "payments"),
        ("TEST_LABEL_OWNER", "Alice_B"),
    ]);

    assert_eq!(labels.len(), 2);
    assert_eq!(labels.get("team.name").map(String::as_str), Some("payments"));
    // Values are passed through untouched
    assert_eq!(labels.get("owner").map(String::as_str), Some("Alice_B"));
}

#[test]
fn test_labels_from_vars_ignores_other_variables() {
    let labels = labels_from_vars([
        ("PATH", "/usr/bin"),
        ("TEST_LABELS", "x"),
        ("test_label_lower", "y"),
        ("TEST_LABEL_", "empty"),
    ]);

    assert!(labels.is_empty());
}

#[test]
fn test_labels_from_vars_keeps_empty_values() {
    let labels = labels_from_vars([("TEST_LABEL_CI", "")]);
    assert_eq!(labels.get("ci").map(String::as_str), Some(""));
}

#[test]
#[serial]
fn test_env_to_labels_reads_process_environment() {
    unsafe {
        std::env::set_var("TEST_LABEL_BUILD_ID", "1234");
    }
    let labels = env_to_labels();
    unsafe {
        std::env::remove_var("TEST_LABEL_BUILD_ID");
    }

    assert_eq!(labels.get("build.id").map(String::as_str), Some("1234"));
}

#[test]
fn test_docker_host_prefers_override() {
    assert_eq!(
        docker_host_from(Some("10.0.0.5"), Some("tcp://docker:2375")),
        "10.0.0.5"
    );
}

#[test]
fn test_docker_host_ignores_empty_override() {
    assert_eq!(
        docker_host_from(Some(""), Some("tcp://docker:2375")),
        "docker"
    );
}

#[test]
fn test_docker_host_from_tcp_url() {
    assert_eq!(
        docker_host_from(None, Some("tcp://192.168.99.100:2376")),
        "192.168.99.100"
    );
}

#[test]
fn test_docker_host_local_sockets() {
    assert_eq!(
        docker_host_from(None, Some("unix:///var/run/docker.sock")),
        "localhost"
    );
    assert_eq!(
        docker_host_from(None, Some("npipe:////./pipe/docker_engine")),
        "localhost"
    );
}

#[test]
fn test_docker_host_defaults_to_localhost() {
    assert_eq!(docker_host_from(None, None), "localhost");
    assert_eq!(docker_host_from(None, Some("")), "localhost");
    assert_eq!(docker_host_from(None, Some("not a url")), "localhost");
}

#[test]
#[serial]
fn test_docker_host_reads_environment() {
    unsafe {
        std::env::set_var("TESTCONTAINERS_HOST_OVERRIDE", "ci-host");
    }
    let host = docker_host();
    unsafe {
        std::env::remove_var("TESTCONTAINERS_HOST_OVERRIDE");
    }

    assert_eq!(host, "ci-host");
}
