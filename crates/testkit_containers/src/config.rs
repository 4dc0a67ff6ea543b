//! Container configuration loaded from the environment.

use std::collections::{BTreeMap, HashMap};
use std::env;
use std::fmt;

use testkit_kafka::{DEFAULT_CLIENT_ID, parse_brokers};
use testkit_utils::{docker_host_from, labels_from_vars, workflow_context_from};

use crate::{Error, Result};

/// Default Postgres image.
pub const DEFAULT_POSTGRES_IMAGE: &str = "postgres:14.19-alpine";

/// Default Kafka image.
pub const DEFAULT_KAFKA_IMAGE: &str = "docker.io/bitnami/kafka:3.8.1";

/// Default Redis-compatible image.
pub const DEFAULT_REDIS_IMAGE: &str = "docker.dragonflydb.io/dragonflydb/dragonfly:v1.27.1";

/// Label marking containers started by testkit.
pub const MANAGED_LABEL: &str = "testkit.managed";

/// Label carrying the CI workflow context that started the container.
pub const CONTEXT_LABEL: &str = "testkit.context";

/// A container image split into repository name and tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub name: String,
    pub tag: String,
}

impl ImageRef {
    /// Parse `name[:tag]`. The tag defaults to `latest`; a colon that belongs
    /// to a registry port (`localhost:5000/pg`) is not taken as a tag.
    pub fn parse(reference: &str) -> Result<Self> {
        let reference = reference.trim();
        let last_slash = reference.rfind('/').map_or(0, |i| i + 1);

        let (name, tag) = match reference[last_slash..].rfind(':') {
            Some(i) => {
                let split = last_slash + i;
                (&reference[..split], &reference[split + 1..])
            }
            None => (reference, "latest"),
        };

        if name.is_empty() || name.ends_with('/') || tag.is_empty() {
            return Err(Error::InvalidImage(reference.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            tag: tag.to_string(),
        })
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.tag)
    }
}

/// Settings shared by all testkit containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestkitConfig {
    /// Image for [`crate::PostgresContainer`] (`TEST_IMAGE_POSTGRES`).
    pub postgres_image: ImageRef,

    /// Image for [`crate::KafkaContainer`] (`TEST_IMAGE_KAFKA`).
    pub kafka_image: ImageRef,

    /// Image for [`crate::RedisContainer`] (`TEST_IMAGE_REDIS`).
    pub redis_image: ImageRef,

    /// Existing Postgres at `host:port` (`POSTGRES_HOST`); no container is
    /// started when set.
    pub postgres_host: Option<String>,

    /// Existing Kafka brokers (`KAFKA_BROKER`); no container is started when
    /// non-empty.
    pub kafka_brokers: Vec<String>,

    /// Client id for the Kafka client (`TEST_KAFKA_CLIENT_ID`).
    pub kafka_client_id: String,

    /// Host advertised by Kafka and announced by Redis
    /// (`TESTCONTAINERS_HOST_OVERRIDE`, else the `DOCKER_HOST` host).
    pub announce_host: String,

    /// CI workflow context, see [`testkit_utils::workflow_context`].
    pub context: String,

    /// Extra labels from `TEST_LABEL_*` variables.
    pub labels: BTreeMap<String, String>,
}

impl TestkitConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env::vars())
    }

    /// Load configuration from an explicit set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let get = |key: &str| vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let postgres_image = ImageRef::parse(get("TEST_IMAGE_POSTGRES").unwrap_or(DEFAULT_POSTGRES_IMAGE))?;
        let redis_image = ImageRef::parse(get("TEST_IMAGE_REDIS").unwrap_or(DEFAULT_REDIS_IMAGE))?;
        let kafka_image =
            ImageRef::parse(get("TEST_IMAGE_KAFKA").unwrap_or(DEFAULT_KAFKA_IMAGE))?;

        Ok(Self {
            postgres_image,
            kafka_image,
            redis_image,
            postgres_host: get("POSTGRES_HOST").map(str::to_string),
            kafka_brokers: get("KAFKA_BROKER").map(parse_brokers).unwrap_or_default(),
            kafka_client_id: get("TEST_KAFKA_CLIENT_ID")
                .unwrap_or(DEFAULT_CLIENT_ID)
                .to_string(),
            announce_host: docker_host_from(
                get("TESTCONTAINERS_HOST_OVERRIDE"),
                get("DOCKER_HOST"),
            ),
            context: workflow_context_from(get("GITHUB_REF")),
            labels: labels_from_vars(vars.iter().map(|(k, v)| (k.as_str(), v.clone()))),
        })
    }

    /// Labels attached to every container started with this configuration.
    ///
    /// `TEST_LABEL_*` labels cannot override the testkit bookkeeping labels.
    pub fn container_labels(&self) -> BTreeMap<String, String> {
        let mut labels = self.labels.clone();
        labels.insert(MANAGED_LABEL.to_string(), "true".to_string());
        labels.insert(CONTEXT_LABEL.to_string(), self.context.clone());
        labels
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
