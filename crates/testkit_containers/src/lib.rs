//! Ephemeral service containers for integration tests.
//!
//! Each service is started through [`testcontainers`] and labelled so that
//! leftovers can be found by the cleanup tools:
//!
//! - [`PostgresContainer`] with a connected [`testkit_db::Database`] and
//!   template based snapshots
//! - [`KafkaContainer`] with a connected [`testkit_kafka::Kafka`] client
//! - [`RedisContainer`] running Dragonfly in emulated cluster mode
//!
//! Postgres and Kafka attach to existing servers instead when
//! `POSTGRES_HOST` or `KAFKA_BROKER` are set. See [`TestkitConfig`] for the
//! full list of variables.
//!
//! ```no_run
//! use testkit_containers::{PostgresContainer, TestkitConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TestkitConfig::from_env()?;
//! let postgres = PostgresContainer::start(&config).await?;
//!
//! postgres.db().create_schema("orders").await?;
//! postgres.create_snapshot().await?;
//!
//! // ... run a test ...
//!
//! postgres.restore_snapshot().await?;
//! postgres.stop().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod errors;
mod kafka;
mod postgres;
mod redis;

pub use config::{
    CONTEXT_LABEL, DEFAULT_KAFKA_IMAGE, DEFAULT_POSTGRES_IMAGE, DEFAULT_REDIS_IMAGE, ImageRef,
    MANAGED_LABEL, TestkitConfig,
};
pub use errors::Error;
pub use kafka::{KAFKA_PORT, KafkaContainer};
pub use postgres::{
    DATABASE_NAME, POSTGRES_PORT, PostgresContainer, SNAPSHOT_NAME, connection_string,
};
pub use redis::{REDIS_PORT, RedisContainer};

/// Result type for container operations.
pub type Result<T> = std::result::Result<T, Error>;
