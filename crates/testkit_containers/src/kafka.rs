//! Kafka test container.
//!
//! A single KRaft node acting as controller and broker. The client listener
//! advertises the announce host, so the container port is published on the
//! same host port and only one instance can run per Docker host.

use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::{ContainerAsync, GenericImage, ImageExt, runners::AsyncRunner};
use testkit_kafka::{Kafka, KafkaConfig};
use tracing::info;

use crate::{Error, Result, TestkitConfig};

const SERVICE: &str = "kafka";

/// Client listener port, inside the container and on the host.
pub const KAFKA_PORT: u16 = 9092;

const READY_MESSAGE: &str = "Kafka Server started";

/// A Kafka broker with a connected [`Kafka`] client.
///
/// Either a container started by this process or, when `KAFKA_BROKER` is
/// set, an existing cluster.
pub struct KafkaContainer {
    container: Option<ContainerAsync<GenericImage>>,
    brokers: Vec<String>,
    kafka: Kafka,
}

impl KafkaContainer {
    /// Start Kafka (or attach to the configured brokers) and connect.
    pub async fn start(config: &TestkitConfig) -> Result<Self> {
        let (container, brokers) = if config.kafka_brokers.is_empty() {
            let container = start_container(config).await?;
            let host = container.get_host().await.map_err(|source| Error::Address {
                service: SERVICE,
                source,
            })?;
            (Some(container), vec![format!("{}:{}", host, KAFKA_PORT)])
        } else {
            info!(brokers = ?config.kafka_brokers, "Using existing kafka");
            (None, config.kafka_brokers.clone())
        };

        info!(brokers = ?brokers, "Kafka ready");

        let kafka = Kafka::connect(
            KafkaConfig::new(brokers.iter().cloned()).with_client_id(config.kafka_client_id.clone()),
        )
        .await?;

        Ok(Self {
            container,
            brokers,
            kafka,
        })
    }

    /// Bootstrap broker addresses.
    pub fn address(&self) -> &[String] {
        &self.brokers
    }

    pub fn kafka(&self) -> &Kafka {
        &self.kafka
    }

    /// Whether this process started the container.
    pub fn is_managed(&self) -> bool {
        self.container.is_some()
    }

    /// Stop and remove the container if this process started it.
    pub async fn stop(self) -> Result<()> {
        if let Some(container) = self.container {
            info!(id = %container.id(), "Stopping kafka container");
            container.stop().await.map_err(|source| Error::Stop {
                service: SERVICE,
                source,
            })?;
            container.rm().await.map_err(|source| Error::Stop {
                service: SERVICE,
                source,
            })?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for KafkaContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KafkaContainer")
            .field("brokers", &self.brokers)
            .field("managed", &self.is_managed())
            .finish_non_exhaustive()
    }
}

/// Broker settings for a single-node KRaft cluster whose client listener is
/// advertised as `{announce_host}:9092`.
pub(crate) fn broker_env(announce_host: &str) -> Vec<(&'static str, String)> {
    vec![
        ("ALLOW_PLAINTEXT_LISTENER", "yes".to_string()),
        ("KAFKA_CFG_NODE_ID", "0".to_string()),
        ("KAFKA_CFG_PROCESS_ROLES", "controller,broker".to_string()),
        ("KAFKA_CFG_CONTROLLER_QUORUM_VOTERS", "0@:9093".to_string()),
        (
            "KAFKA_CFG_LISTENERS",
            "PLAINTEXT://:9092,CONTROLLER://:9093,INTERNAL://:9094".to_string(),
        ),
        (
            "KAFKA_CFG_ADVERTISED_LISTENERS",
            format!(
                "PLAINTEXT://{}:{},INTERNAL://kafka:9094",
                announce_host, KAFKA_PORT
            ),
        ),
        (
            "KAFKA_CFG_LISTENER_SECURITY_PROTOCOL_MAP",
            "CONTROLLER:PLAINTEXT,PLAINTEXT:PLAINTEXT,INTERNAL:PLAINTEXT".to_string(),
        ),
        ("KAFKA_CFG_CONTROLLER_LISTENER_NAMES", "CONTROLLER".to_string()),
    ]
}

async fn start_container(config: &TestkitConfig) -> Result<ContainerAsync<GenericImage>> {
    info!(
        image = %config.kafka_image,
        announce = %config.announce_host,
        "Starting kafka container"
    );

    let mut request = GenericImage::new(
        config.kafka_image.name.clone(),
        config.kafka_image.tag.clone(),
    )
    .with_exposed_port(KAFKA_PORT.tcp())
    .with_wait_for(WaitFor::message_on_either_std(READY_MESSAGE))
    .with_mapped_port(KAFKA_PORT, KAFKA_PORT.tcp())
    .with_labels(config.container_labels());

    for (key, value) in broker_env(&config.announce_host) {
        request = request.with_env_var(key, value);
    }

    request.start().await.map_err(|source| Error::Start {
        service: SERVICE,
        source,
    })
}

#[cfg(test)]
#[path = "kafka_tests.rs"]
mod tests;
