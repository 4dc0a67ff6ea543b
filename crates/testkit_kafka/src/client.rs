//! Kafka client wrapper used by test suites.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Utc;
use rskafka::client::partition::{Compression, OffsetAt, UnknownTopicHandling};
use rskafka::client::{Client, ClientBuilder};
use rskafka::record::Record;
use serde::Serialize;
use tracing::{debug, info};

use crate::groups;
use crate::message::{ConsumedRecord, KafkaRecord, Message, SERVICE_HEADER, route_records};
use crate::{Error, KafkaConfig, Result};

/// Timeout handed to the broker for topic administration requests.
const ADMIN_TIMEOUT_MS: i32 = 10_000;

/// Largest fetch response accepted by [`Kafka::fetch`].
const MAX_FETCH_BYTES: i32 = 10 * 1024 * 1024;

/// Topic to create with [`Kafka::create_topics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub name: String,
    /// Number of partitions. `None` means the broker default.
    pub partitions: Option<i32>,
    /// Replication factor. `None` means the broker default.
    pub replication_factor: Option<i16>,
}

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            partitions: None,
            replication_factor: None,
        }
    }

    pub fn with_partitions(mut self, partitions: i32) -> Self {
        self.partitions = Some(partitions);
        self
    }

    pub fn with_replication_factor(mut self, replication_factor: i16) -> Self {
        self.replication_factor = Some(replication_factor);
        self
    }

    /// Partition count and replication factor as sent to the broker, where
    /// `-1` asks for the broker default.
    pub(crate) fn request_settings(&self) -> (i32, i16) {
        (
            self.partitions.filter(|p| *p > 0).unwrap_or(-1),
            self.replication_factor.filter(|r| *r > 0).unwrap_or(-1),
        )
    }
}

/// Connected Kafka client with topic administration and publishing helpers.
///
/// The client is cheap to share across tasks via `Arc`.
pub struct Kafka {
    client: Arc<Client>,
    config: KafkaConfig,
    next_partition: AtomicUsize,
}

impl Kafka {
    /// Connect to the configured brokers.
    pub async fn connect(config: KafkaConfig) -> Result<Self> {
        if config.brokers.is_empty() {
            return Err(Error::NoBrokers);
        }

        info!(brokers = ?config.brokers, client_id = %config.client_id, "Connecting to Kafka");

        let client = ClientBuilder::new(config.brokers.clone())
            .build()
            .await
            .map_err(Error::Connection)?;

        Ok(Self {
            client: Arc::new(client),
            config,
            next_partition: AtomicUsize::new(0),
        })
    }

    pub fn config(&self) -> &KafkaConfig {
        &self.config
    }

    /// The underlying rskafka client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Create topics one after another, returning the names created.
    pub async fn create_topics(&self, topics: &[Topic]) -> Result<Vec<String>> {
        let controller = self.client.controller_client().map_err(Error::Metadata)?;

        let mut created = Vec::with_capacity(topics.len());
        for topic in topics {
            let (partitions, replication_factor) = topic.request_settings();
            info!(
                topic = %topic.name,
                partitions = partitions,
                replication_factor = replication_factor,
                "Creating topic"
            );

            controller
                .create_topic(&topic.name, partitions, replication_factor, ADMIN_TIMEOUT_MS)
                .await
                .map_err(|source| Error::CreateTopic {
                    topic: topic.name.clone(),
                    source,
                })?;

            created.push(topic.name.clone());
        }

        Ok(created)
    }

    /// Delete topics one after another.
    pub async fn delete_topics(&self, topics: &[&str]) -> Result<()> {
        let controller = self.client.controller_client().map_err(Error::Metadata)?;

        for topic in topics {
            info!(topic = %topic, "Deleting topic");

            controller
                .delete_topic(*topic, ADMIN_TIMEOUT_MS)
                .await
                .map_err(|source| Error::DeleteTopic {
                    topic: topic.to_string(),
                    source,
                })?;
        }

        Ok(())
    }

    /// Delete consumer groups one after another. Groups that do not exist
    /// are skipped.
    pub async fn delete_groups(&self, groups: &[&str]) -> Result<()> {
        for group in groups {
            info!(group = %group, "Deleting consumer group");

            groups::delete_group(&self.config.brokers, &self.config.client_id, group)
                .await
                .map_err(|source| Error::DeleteGroup {
                    group: group.to_string(),
                    source,
                })?;
        }

        Ok(())
    }

    /// Partition ids of `topic` from cluster metadata, sorted ascending.
    pub async fn partitions(&self, topic: &str) -> Result<Vec<i32>> {
        let topics = self.client.list_topics().await.map_err(Error::Metadata)?;

        topics
            .into_iter()
            .find(|t| t.name == topic)
            .map(|t| t.partitions.into_iter().collect())
            .ok_or_else(|| Error::UnknownTopic(topic.to_string()))
    }

    /// Publish messages to `topic`.
    ///
    /// Every record carries a `service` header set to the client id unless
    /// the record already defines one. Keyed records without an explicit
    /// partition are placed by key hash. Unkeyed ones all land on one
    /// partition per call; successive calls rotate through the topic's
    /// partitions.
    pub async fn publish<I, M>(&self, topic: &str, messages: I) -> Result<()>
    where
        I: IntoIterator<Item = M>,
        M: Into<Message>,
    {
        let records = messages
            .into_iter()
            .map(|m| m.into().into_record())
            .collect::<Result<Vec<_>>>()?;
        if records.is_empty() {
            return Ok(());
        }

        let partitions = self.partitions(topic).await?;
        let cursor = self.next_partition.fetch_add(1, Ordering::Relaxed);
        let routed = route_records(topic, records, &partitions, cursor)?;

        for (partition, batch) in routed {
            let partition_client = self
                .client
                .partition_client(topic, partition, UnknownTopicHandling::Retry)
                .await
                .map_err(|source| Error::PartitionClient {
                    topic: topic.to_string(),
                    partition,
                    source,
                })?;

            let count = batch.len();
            let records: Vec<Record> = batch
                .into_iter()
                .map(|record| self.to_wire_record(record))
                .collect();

            partition_client
                .produce(records, Compression::NoCompression)
                .await
                .map_err(|source| Error::Produce {
                    topic: topic.to_string(),
                    partition,
                    source,
                })?;

            debug!(topic = %topic, partition = partition, count = count, "Published messages");
        }

        Ok(())
    }

    /// Publish serializable values as JSON messages.
    pub async fn publish_json<T: Serialize>(&self, topic: &str, values: &[T]) -> Result<()> {
        let messages = values
            .iter()
            .map(Message::json)
            .collect::<Result<Vec<_>>>()?;
        self.publish(topic, messages).await
    }

    /// Read records from one partition starting at `offset`.
    ///
    /// Waits up to `max_wait` for data; an empty result means nothing was
    /// available in that window.
    pub async fn fetch(
        &self,
        topic: &str,
        partition: i32,
        offset: i64,
        max_wait: Duration,
    ) -> Result<Vec<ConsumedRecord>> {
        let partition_client = self
            .client
            .partition_client(topic, partition, UnknownTopicHandling::Error)
            .await
            .map_err(|source| Error::PartitionClient {
                topic: topic.to_string(),
                partition,
                source,
            })?;

        let max_wait_ms = i32::try_from(max_wait.as_millis()).unwrap_or(i32::MAX);
        let (records, _high_watermark) = partition_client
            .fetch_records(offset, 1..MAX_FETCH_BYTES, max_wait_ms)
            .await
            .map_err(|source| Error::Fetch {
                topic: topic.to_string(),
                partition,
                source,
            })?;

        Ok(records
            .into_iter()
            .map(|r| ConsumedRecord {
                offset: r.offset,
                key: r.record.key,
                value: r.record.value,
                headers: r.record.headers,
                timestamp: r.record.timestamp,
            })
            .collect())
    }

    /// Offset of the next record to be written to the partition.
    pub async fn latest_offset(&self, topic: &str, partition: i32) -> Result<i64> {
        let partition_client = self
            .client
            .partition_client(topic, partition, UnknownTopicHandling::Error)
            .await
            .map_err(|source| Error::PartitionClient {
                topic: topic.to_string(),
                partition,
                source,
            })?;

        partition_client
            .get_offset(OffsetAt::Latest)
            .await
            .map_err(|source| Error::Fetch {
                topic: topic.to_string(),
                partition,
                source,
            })
    }

    fn to_wire_record(&self, record: KafkaRecord) -> Record {
        let mut headers = record.headers;
        headers
            .entry(SERVICE_HEADER.to_string())
            .or_insert_with(|| self.config.client_id.clone().into_bytes());

        Record {
            key: record.key,
            value: record.value,
            headers,
            timestamp: Utc::now(),
        }
    }
}

impl std::fmt::Debug for Kafka {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Kafka")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
