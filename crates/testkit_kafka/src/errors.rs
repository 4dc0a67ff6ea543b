//! Error types for the Kafka test client.

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur when working with the Kafka test client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No broker address was configured.
    #[error("at least one Kafka broker address is required")]
    NoBrokers,

    /// Failed to connect to Kafka brokers.
    #[error("failed to connect to Kafka brokers: {0}")]
    Connection(#[source] rskafka::client::error::Error),

    /// Failed to read cluster metadata.
    #[error("failed to fetch Kafka metadata: {0}")]
    Metadata(#[source] rskafka::client::error::Error),

    /// Failed to create a topic.
    #[error("failed to create topic {topic}: {source}")]
    CreateTopic {
        topic: String,
        #[source]
        source: rskafka::client::error::Error,
    },

    /// Failed to delete a topic.
    #[error("failed to delete topic {topic}: {source}")]
    DeleteTopic {
        topic: String,
        #[source]
        source: rskafka::client::error::Error,
    },

    /// The topic does not exist in cluster metadata.
    #[error("topic {0} does not exist")]
    UnknownTopic(String),

    /// A record asked for a partition the topic does not have.
    #[error("topic {topic} has no partition {partition}")]
    UnknownPartition { topic: String, partition: i32 },

    /// Failed to get a partition client.
    #[error("failed to get partition client for {topic}/{partition}: {source}")]
    PartitionClient {
        topic: String,
        partition: i32,
        #[source]
        source: rskafka::client::error::Error,
    },

    /// Failed to produce records.
    #[error("failed to produce messages to {topic}/{partition}: {source}")]
    Produce {
        topic: String,
        partition: i32,
        #[source]
        source: rskafka::client::error::Error,
    },

    /// Failed to fetch records.
    #[error("failed to fetch messages from {topic}/{partition}: {source}")]
    Fetch {
        topic: String,
        partition: i32,
        #[source]
        source: rskafka::client::error::Error,
    },

    /// Failed to delete a consumer group.
    #[error("failed to delete consumer group {group}: {source}")]
    DeleteGroup {
        group: String,
        #[source]
        source: GroupError,
    },

    /// Failed to marshal a message to JSON.
    #[error("failed to marshal message: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures of consumer group requests, which bypass the rskafka client.
#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    /// Connecting to or talking with a broker failed.
    #[error("I/O error with broker {broker}: {source}")]
    Io {
        broker: String,
        #[source]
        source: std::io::Error,
    },

    /// A request could not be encoded or a response could not be decoded.
    #[error("Kafka protocol error: {0}")]
    Protocol(String),

    /// The broker answered with a non-zero error code.
    #[error("broker returned error code {0}")]
    Broker(i16),
}
