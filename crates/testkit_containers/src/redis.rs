//! Redis-compatible test container.
//!
//! Runs Dragonfly in emulated cluster mode. Cluster clients follow the
//! announced address, so the container port is published on the same host
//! port and only one instance can run per Docker host.

use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::{ContainerAsync, GenericImage, ImageExt, runners::AsyncRunner};
use tracing::info;

use crate::{Error, Result, TestkitConfig};

const SERVICE: &str = "redis";

/// Port the server listens on, inside the container and on the host.
pub const REDIS_PORT: u16 = 6379;

const READY_MESSAGE: &str = "listening on port 6379";

/// A running Redis-compatible server.
pub struct RedisContainer {
    container: ContainerAsync<GenericImage>,
    addresses: Vec<String>,
}

impl RedisContainer {
    pub async fn start(config: &TestkitConfig) -> Result<Self> {
        info!(image = %config.redis_image, announce = %config.announce_host, "Starting redis container");

        let container = GenericImage::new(
            config.redis_image.name.clone(),
            config.redis_image.tag.clone(),
        )
        .with_exposed_port(REDIS_PORT.tcp())
        .with_wait_for(WaitFor::message_on_either_std(READY_MESSAGE))
        .with_cmd(server_args(&config.announce_host))
        .with_mapped_port(REDIS_PORT, REDIS_PORT.tcp())
        .with_labels(config.container_labels())
        .start()
        .await
        .map_err(|source| Error::Start {
            service: SERVICE,
            source,
        })?;

        let host = container.get_host().await.map_err(|source| Error::Address {
            service: SERVICE,
            source,
        })?;
        let addresses = vec![format!("{}:{}", host, REDIS_PORT)];
        info!(addresses = ?addresses, "Redis ready");

        Ok(Self {
            container,
            addresses,
        })
    }

    /// Seed addresses for a cluster client.
    pub fn address(&self) -> &[String] {
        &self.addresses
    }

    pub async fn stop(self) -> Result<()> {
        info!(id = %self.container.id(), "Stopping redis container");
        self.container.stop().await.map_err(|source| Error::Stop {
            service: SERVICE,
            source,
        })?;
        self.container.rm().await.map_err(|source| Error::Stop {
            service: SERVICE,
            source,
        })
    }
}

impl std::fmt::Debug for RedisContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisContainer")
            .field("id", &self.container.id())
            .field("addresses", &self.addresses)
            .finish()
    }
}

/// Command line for the server, announcing `announce_host` to cluster
/// clients.
pub(crate) fn server_args(announce_host: &str) -> Vec<String> {
    vec![
        "dragonfly".to_string(),
        "--logtostderr".to_string(),
        "--cluster_mode=emulated".to_string(),
        format!("--cluster_announce_ip={}", announce_host),
    ]
}

#[cfg(test)]
#[path = "redis_tests.rs"]
mod tests;
