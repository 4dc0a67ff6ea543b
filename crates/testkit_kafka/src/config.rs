//! Kafka connection settings.

/// Client id used when none is configured.
pub const DEFAULT_CLIENT_ID: &str = "testkit";

/// Connection settings for [`crate::Kafka`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KafkaConfig {
    /// Bootstrap broker addresses as `host:port`.
    pub brokers: Vec<String>,

    /// Identifies this client; also sent as the `service` header on every
    /// published record.
    pub client_id: String,
}

impl KafkaConfig {
    pub fn new<I, S>(brokers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            brokers: brokers.into_iter().map(Into::into).collect(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }
}

/// Split a broker list such as `"a:9092, b:9092 c:9092"` on commas and
/// whitespace, dropping empty entries.
pub fn parse_brokers(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
