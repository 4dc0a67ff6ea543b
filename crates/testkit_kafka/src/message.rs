//! Messages accepted by [`crate::Kafka::publish`] and their partition routing.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::Error;

/// Header added to every published record, carrying the client id.
pub const SERVICE_HEADER: &str = "service";

/// A record with full control over key, headers and target partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KafkaRecord {
    pub key: Option<Vec<u8>>,
    pub value: Option<Vec<u8>>,
    pub headers: BTreeMap<String, Vec<u8>>,
    /// Target partition. `None` lets the publisher pick one: by key hash
    /// when a key is set, round-robin otherwise.
    pub partition: Option<i32>,
}

impl KafkaRecord {
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn with_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_partition(mut self, partition: i32) -> Self {
        self.partition = Some(partition);
        self
    }
}

/// A message to publish.
///
/// - `Raw` bytes are sent as is.
/// - `Json` values are serialized to JSON bytes.
/// - `Record` keeps its key, headers and partition.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Raw(Vec<u8>),
    Json(serde_json::Value),
    Record(KafkaRecord),
}

impl Message {
    /// Build a JSON message from any serializable value.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, Error> {
        Ok(Message::Json(serde_json::to_value(value)?))
    }

    pub(crate) fn into_record(self) -> Result<KafkaRecord, Error> {
        match self {
            Message::Raw(bytes) => Ok(KafkaRecord::new(bytes)),
            Message::Json(value) => Ok(KafkaRecord::new(serde_json::to_vec(&value)?)),
            Message::Record(record) => Ok(record),
        }
    }
}

impl From<Vec<u8>> for Message {
    fn from(bytes: Vec<u8>) -> Self {
        Message::Raw(bytes)
    }
}

impl From<&[u8]> for Message {
    fn from(bytes: &[u8]) -> Self {
        Message::Raw(bytes.to_vec())
    }
}

impl From<serde_json::Value> for Message {
    fn from(value: serde_json::Value) -> Self {
        Message::Json(value)
    }
}

impl From<KafkaRecord> for Message {
    fn from(record: KafkaRecord) -> Self {
        Message::Record(record)
    }
}

/// A record read back from a partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumedRecord {
    pub offset: i64,
    pub key: Option<Vec<u8>>,
    pub value: Option<Vec<u8>>,
    pub headers: BTreeMap<String, Vec<u8>>,
    pub timestamp: DateTime<Utc>,
}

impl ConsumedRecord {
    /// Deserialize the value as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(self.value.as_deref().unwrap_or_default())?)
    }
}

/// Group records by target partition.
///
/// Records with an explicit partition must name one of `partitions`. Keyed
/// records without a partition are placed by the murmur2 hash of the key, as
/// the Java client does, so a key always lands on the same partition. All
/// remaining records go to the same partition, picked as
/// `partitions[cursor % len]`, so consecutive publish calls rotate through the
/// topic batch by batch. Order within a partition is preserved.
pub(crate) fn route_records(
    topic: &str,
    records: Vec<KafkaRecord>,
    partitions: &[i32],
    cursor: usize,
) -> Result<BTreeMap<i32, Vec<KafkaRecord>>, Error> {
    if partitions.is_empty() {
        return Err(Error::UnknownTopic(topic.to_string()));
    }

    let sticky = partitions[cursor % partitions.len()];
    let mut routed: BTreeMap<i32, Vec<KafkaRecord>> = BTreeMap::new();

    for record in records {
        let partition = match record.partition {
            Some(p) if partitions.contains(&p) => p,
            Some(p) => {
                return Err(Error::UnknownPartition {
                    topic: topic.to_string(),
                    partition: p,
                });
            }
            None => match &record.key {
                Some(key) => partitions[key_partition(key, partitions.len())],
                None => sticky,
            },
        };
        routed.entry(partition).or_default().push(record);
    }

    Ok(routed)
}

/// Index into a partition list of length `count` for a record key.
pub(crate) fn key_partition(key: &[u8], count: usize) -> usize {
    (murmur2(key) & 0x7fff_ffff) as usize % count
}

/// Kafka's murmur2 variant (seed `0x9747b28c`), as used by the default
/// partitioner of the Java client.
pub(crate) fn murmur2(data: &[u8]) -> u32 {
    const SEED: u32 = 0x9747_b28c;
    const M: u32 = 0x5bd1_e995;
    const R: u32 = 24;

    let mut h = SEED ^ data.len() as u32;

    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        let mut k = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);
        h = h.wrapping_mul(M);
        h ^= k;
    }

    let tail = chunks.remainder();
    if !tail.is_empty() {
        if tail.len() >= 3 {
            h ^= u32::from(tail[2]) << 16;
        }
        if tail.len() >= 2 {
            h ^= u32::from(tail[1]) << 8;
        }
        h ^= u32::from(tail[0]);
        h = h.wrapping_mul(M);
    }

    h ^= h >> 13;
    h = h.wrapping_mul(M);
    h ^= h >> 15;
    h
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
