use super::*;
use serial_test::serial;

fn config(vars: &[(&str, &str)]) -> TestkitConfig {
    TestkitConfig::from_vars(vars.iter().copied()).expect("config should load")
}

#[test]
fn test_image_ref_with_tag() {
    let image = ImageRef::parse("docker.io/postgres:14.19-alpine").unwrap();
    assert_eq!(image.name, "docker.io/postgres");
    assert_eq!(image.tag, "14.19-alpine");
    assert_eq!(image.to_string(), "docker.io/postgres:14.19-alpine");
}

#[test]
fn test_image_ref_without_tag_defaults_to_latest() {
    let image = ImageRef::parse("redis").unwrap();
    assert_eq!(image.name, "redis");
    assert_eq!(image.tag, "latest");
}

#[test]
fn test_image_ref_registry_port_is_not_a_tag() {
    let image = ImageRef::parse("localhost:5000/team/pg").unwrap();
    assert_eq!(image.name, "localhost:5000/team/pg");
    assert_eq!(image.tag, "latest");

    let image = ImageRef::parse("localhost:5000/team/pg:16").unwrap();
    assert_eq!(image.name, "localhost:5000/team/pg");
    assert_eq!(image.tag, "16");
}

#[test]
fn test_image_ref_rejects_malformed() {
    assert!(matches!(ImageRef::parse(""), Err(Error::InvalidImage(_))));
    assert!(matches!(ImageRef::parse(":14"), Err(Error::InvalidImage(_))));
    assert!(matches!(ImageRef::parse("postgres:"), Err(Error::InvalidImage(_))));
    assert!(matches!(ImageRef::parse("registry/"), Err(Error::InvalidImage(_))));
}

#[test]
fn test_defaults() {
    let config = config(&[]);

    assert_eq!(config.postgres_image.to_string(), DEFAULT_POSTGRES_IMAGE);
    assert_eq!(config.redis_image.to_string(), DEFAULT_REDIS_IMAGE);
    assert_eq!(config.kafka_image.to_string(), DEFAULT_KAFKA_IMAGE);
    assert!(config.postgres_host.is_none());
    assert!(config.kafka_brokers.is_empty());
    assert_eq!(config.kafka_client_id, "testkit");
    assert_eq!(config.announce_host, "localhost");
    assert_eq!(config.context, "local");
    assert!(config.labels.is_empty());
}

#[test]
fn test_image_overrides() {
    let config = config(&[
        ("TEST_IMAGE_POSTGRES", "postgres:16-alpine"),
        ("TEST_IMAGE_KAFKA", "bitnami/kafka:3.9.0"),
        ("TEST_IMAGE_REDIS", "redis:7"),
    ]);

    assert_eq!(config.postgres_image.tag, "16-alpine");
    assert_eq!(
        config.kafka_image,
        ImageRef {
            name: "bitnami/kafka".to_string(),
            tag: "3.9.0".to_string(),
        }
    );
    assert_eq!(config.redis_image.name, "redis");
}

#[test]
fn test_blank_values_are_ignored() {
    let config = config(&[("TEST_IMAGE_POSTGRES", "  "), ("POSTGRES_HOST", "")]);

    assert_eq!(config.postgres_image.to_string(), DEFAULT_POSTGRES_IMAGE);
    assert!(config.postgres_host.is_none());
}

#[test]
fn test_invalid_image_override_fails() {
    let result = TestkitConfig::from_vars([("TEST_IMAGE_REDIS", ":7")]);
    assert!(matches!(result, Err(Error::InvalidImage(_))));
}

#[test]
fn test_external_services() {
    let config = config(&[
        ("POSTGRES_HOST", "db.internal:5432"),
        ("KAFKA_BROKER", "k1:9092,k2:9092 k3:9092"),
    ]);

    assert_eq!(config.postgres_host.as_deref(), Some("db.internal:5432"));
    assert_eq!(config.kafka_brokers, vec!["k1:9092", "k2:9092", "k3:9092"]);
}

#[test]
fn test_announce_host_and_context() {
    let config = config(&[
        ("DOCKER_HOST", "tcp://10.1.2.3:2375"),
        ("GITHUB_REF", "refs/pull/42/merge"),
    ]);

    assert_eq!(config.announce_host, "10.1.2.3");
    assert_eq!(config.context, "pr42");
}

#[test]
fn test_container_labels_include_bookkeeping() {
    let config = config(&[
        ("TEST_LABEL_TEAM", "payments"),
        ("TEST_LABEL_TESTKIT_MANAGED", "false"),
        ("GITHUB_REF", "refs/heads/main"),
    ]);

    let labels = config.container_labels();
    assert_eq!(labels.get("team").map(String::as_str), Some("payments"));
    assert_eq!(labels.get(MANAGED_LABEL).map(String::as_str), Some("true"));
    assert_eq!(labels.get(CONTEXT_LABEL).map(String::as_str), Some("main"));
}

#[test]
#[serial]
fn test_from_env_reads_process_environment() {
    unsafe {
        std::env::set_var("TEST_IMAGE_POSTGRES", "postgres:15");
    }
    let config = TestkitConfig::from_env();
    unsafe {
        std::env::remove_var("TEST_IMAGE_POSTGRES");
    }

    assert_eq!(config.unwrap().postgres_image.tag, "15");
}
