//! Error types for container lifecycle operations.

use testcontainers::TestcontainersError;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur while starting, using or stopping test containers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An image reference from the environment could not be parsed.
    ///
    /// The contained string is the offending value.
    #[error("Invalid image reference: {0:?}")]
    InvalidImage(String),

    /// The container runtime failed to create or start a container.
    ///
    /// This usually means Docker is not running, the image cannot be pulled
    /// or the readiness check never succeeded.
    #[error("Could not create {service} container: {source}")]
    Start {
        service: &'static str,
        #[source]
        source: TestcontainersError,
    },

    /// The host or mapped port of a running container could not be resolved.
    #[error("Could not resolve address of {service} container: {source}")]
    Address {
        service: &'static str,
        #[source]
        source: TestcontainersError,
    },

    /// Connecting or pinging Postgres failed.
    #[error("Could not connect to postgres: {0}")]
    Connect(#[source] sqlx::Error),

    /// Creating or restoring a database snapshot failed.
    #[error("Could not {action} postgres snapshot: {source}")]
    Snapshot {
        action: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// The operation needs a container started by this process, but the
    /// service was configured to use an existing instance.
    #[error("{0} is not running in a managed container")]
    NotManaged(&'static str),

    /// Setting up the Kafka client failed.
    #[error(transparent)]
    Kafka(#[from] testkit_kafka::Error),

    /// Stopping or removing a container failed.
    #[error("Could not stop {service} container: {source}")]
    Stop {
        service: &'static str,
        #[source]
        source: TestcontainersError,
    },
}
