//! Integration test support.
//!
//! Re-exports the testkit crates under one roof and adds the suite harness:
//!
//! - [`containers`]: Postgres, Kafka and Redis containers
//! - [`db`]: schema and SQL file helpers
//! - [`kafka`]: topic, publish and fetch helpers
//! - [`utils`]: labels, Docker host, workflow context, pair assertions
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use testkit::containers::{PostgresContainer, TestkitConfig};
//! use testkit::{Fixture, run_suite};
//!
//! struct Services {
//!     postgres: PostgresContainer,
//! }
//!
//! #[async_trait]
//! impl Fixture for Services {
//!     async fn setup() -> anyhow::Result<Self> {
//!         let config = TestkitConfig::from_env()?;
//!         Ok(Self {
//!             postgres: PostgresContainer::start(&config).await?,
//!         })
//!     }
//!
//!     async fn teardown(self: Arc<Self>) -> anyhow::Result<()> {
//!         if let Ok(services) = Arc::try_unwrap(self) {
//!             services.postgres.stop().await?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # async fn example() -> anyhow::Result<()> {
//! run_suite::<Services, _, _, _>(|services| async move {
//!     services.postgres.db().create_schema("orders").await?;
//!     Ok(())
//! })
//! .await
//! # }
//! ```

pub mod suite;

pub use suite::{Fixture, run_suite};

pub use testkit_containers as containers;
pub use testkit_db as db;
pub use testkit_kafka as kafka;
pub use testkit_utils as utils;
