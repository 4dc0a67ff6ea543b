//! Kafka helpers for integration tests.
//!
//! Wraps an `rskafka` client with the operations test suites need: creating
//! and deleting topics, publishing raw / JSON / fully specified records,
//! reading them back for assertions and deleting consumer groups left behind
//! by the code under test.
//!
//! ```no_run
//! use serde_json::json;
//! use testkit_kafka::{Kafka, KafkaConfig, KafkaRecord, Message, Topic};
//!
//! # async fn example() -> Result<(), testkit_kafka::Error> {
//! let kafka = Kafka::connect(KafkaConfig::new(["localhost:9092"])).await?;
//! kafka.create_topics(&[Topic::new("orders").with_partitions(3)]).await?;
//!
//! kafka
//!     .publish(
//!         "orders",
//!         [
//!             Message::from(json!({"id": 1})),
//!             Message::from(b"raw".to_vec()),
//!             Message::from(KafkaRecord::new("pinned").with_partition(2)),
//!         ],
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod errors;
mod groups;
mod message;

pub use client::{Kafka, Topic};
pub use config::{DEFAULT_CLIENT_ID, KafkaConfig, parse_brokers};
pub use errors::{Error, GroupError};
pub use message::{ConsumedRecord, KafkaRecord, Message, SERVICE_HEADER};

/// Result alias for Kafka helpers.
pub type Result<T> = std::result::Result<T, Error>;
