//! Consumer group administration over the Kafka wire protocol.
//!
//! rskafka has no group requests, so these talk to the brokers directly:
//! find the group coordinator, then send `DeleteGroups` to it.

use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};
use kafka_protocol::messages::{
    ApiKey, DeleteGroupsRequest, DeleteGroupsResponse, FindCoordinatorRequest,
    FindCoordinatorResponse, GroupId, RequestHeader, ResponseHeader,
};
use kafka_protocol::protocol::{Decodable, Encodable, StrBytes};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, trace};

use crate::errors::GroupError;

const FIND_COORDINATOR_VERSION: i16 = 1;
const DELETE_GROUPS_VERSION: i16 = 1;

/// `key_type` of a group coordinator lookup.
const GROUP_KEY_TYPE: i8 = 0;

const COORDINATOR_LOAD_IN_PROGRESS: i16 = 14;
const COORDINATOR_NOT_AVAILABLE: i16 = 15;
const NOT_COORDINATOR: i16 = 16;
pub(crate) const GROUP_ID_NOT_FOUND: i16 = 69;

const COORDINATOR_ATTEMPTS: u32 = 10;
const COORDINATOR_BACKOFF: Duration = Duration::from_millis(500);

/// A single request/response connection to one broker.
struct BrokerConnection {
    broker: String,
    stream: TcpStream,
    client_id: String,
    correlation_id: i32,
}

impl BrokerConnection {
    async fn connect(broker: &str, client_id: &str) -> Result<Self, GroupError> {
        let stream = TcpStream::connect(broker)
            .await
            .map_err(|source| GroupError::Io {
                broker: broker.to_string(),
                source,
            })?;

        Ok(Self {
            broker: broker.to_string(),
            stream,
            client_id: client_id.to_string(),
            correlation_id: 0,
        })
    }

    async fn send<Req, Resp>(
        &mut self,
        api_key: ApiKey,
        version: i16,
        request: &Req,
    ) -> Result<Resp, GroupError>
    where
        Req: Encodable,
        Resp: Decodable,
    {
        self.correlation_id += 1;
        let frame = encode_request(api_key, version, self.correlation_id, &self.client_id, request)?;
        trace!(broker = %self.broker, api_key = ?api_key, len = frame.len(), "Sending request");

        let io_err = |source| GroupError::Io {
            broker: self.broker.clone(),
            source,
        };
        self.stream.write_all(&frame).await.map_err(io_err)?;

        let mut len_buf = [0u8; 4];
        self.stream.read_exact(&mut len_buf).await.map_err(io_err)?;
        let len = usize::try_from(i32::from_be_bytes(len_buf))
            .map_err(|_| GroupError::Protocol("negative response length".to_string()))?;

        let mut body = vec![0u8; len];
        self.stream.read_exact(&mut body).await.map_err(io_err)?;

        let (correlation_id, response) = decode_response(api_key, version, Bytes::from(body))?;
        if correlation_id != self.correlation_id {
            return Err(GroupError::Protocol(format!(
                "correlation id mismatch: sent {}, got {}",
                self.correlation_id, correlation_id
            )));
        }

        Ok(response)
    }
}

/// Frame a request: length prefix, request header, body.
pub(crate) fn encode_request<Req: Encodable>(
    api_key: ApiKey,
    version: i16,
    correlation_id: i32,
    client_id: &str,
    request: &Req,
) -> Result<BytesMut, GroupError> {
    let header = RequestHeader::default()
        .with_request_api_key(api_key as i16)
        .with_request_api_version(version)
        .with_correlation_id(correlation_id)
        .with_client_id(Some(StrBytes::from_string(client_id.to_string())));

    let mut buf = BytesMut::new();
    buf.put_i32(0);
    header
        .encode(&mut buf, api_key.request_header_version(version))
        .map_err(|e| GroupError::Protocol(format!("failed to encode header: {:?}", e)))?;
    request
        .encode(&mut buf, version)
        .map_err(|e| GroupError::Protocol(format!("failed to encode request: {:?}", e)))?;

    let len = i32::try_from(buf.len() - 4)
        .map_err(|_| GroupError::Protocol("request too large".to_string()))?;
    buf[0..4].copy_from_slice(&len.to_be_bytes());

    Ok(buf)
}

/// Decode a response body (without the length prefix), returning its
/// correlation id.
pub(crate) fn decode_response<Resp: Decodable>(
    api_key: ApiKey,
    version: i16,
    mut body: Bytes,
) -> Result<(i32, Resp), GroupError> {
    let header = ResponseHeader::decode(&mut body, api_key.response_header_version(version))
        .map_err(|e| GroupError::Protocol(format!("failed to decode response header: {:?}", e)))?;
    let response = Resp::decode(&mut body, version)
        .map_err(|e| GroupError::Protocol(format!("failed to decode response: {:?}", e)))?;

    Ok((header.correlation_id, response))
}

/// Outcome for `group` in a `DeleteGroups` response. A group that does not
/// exist counts as deleted.
pub(crate) fn group_result(response: &DeleteGroupsResponse, group: &str) -> Result<(), GroupError> {
    let result = response
        .results
        .iter()
        .find(|r| r.group_id.to_string() == group)
        .ok_or_else(|| GroupError::Protocol(format!("no result for group {}", group)))?;

    match result.error_code {
        0 | GROUP_ID_NOT_FOUND => Ok(()),
        code => Err(GroupError::Broker(code)),
    }
}

/// Whether a coordinator lookup error is worth retrying.
pub(crate) fn is_retriable(error_code: i16) -> bool {
    matches!(
        error_code,
        COORDINATOR_LOAD_IN_PROGRESS | COORDINATOR_NOT_AVAILABLE | NOT_COORDINATOR
    )
}

/// Delete one consumer group, bootstrapping from the first reachable broker.
pub(crate) async fn delete_group(
    brokers: &[String],
    client_id: &str,
    group: &str,
) -> Result<(), GroupError> {
    let mut bootstrap = connect_any(brokers, client_id).await?;
    let coordinator = find_coordinator(&mut bootstrap, group).await?;
    debug!(group = group, coordinator = %coordinator, "Found group coordinator");

    let mut connection = if coordinator == bootstrap.broker {
        bootstrap
    } else {
        BrokerConnection::connect(&coordinator, client_id).await?
    };

    let request = DeleteGroupsRequest::default()
        .with_groups_names(vec![GroupId(StrBytes::from_string(group.to_string()))]);
    let response: DeleteGroupsResponse = connection
        .send(ApiKey::DeleteGroups, DELETE_GROUPS_VERSION, &request)
        .await?;

    group_result(&response, group)
}

async fn connect_any(brokers: &[String], client_id: &str) -> Result<BrokerConnection, GroupError> {
    let mut last_err = GroupError::Protocol("no brokers configured".to_string());
    for broker in brokers {
        match BrokerConnection::connect(broker, client_id).await {
            Ok(connection) => return Ok(connection),
            Err(err) => {
                debug!(broker = %broker, error = %err, "Broker unreachable, trying next");
                last_err = err;
            }
        }
    }
    Err(last_err)
}

/// `host:port` of the coordinator for `group`.
async fn find_coordinator(
    connection: &mut BrokerConnection,
    group: &str,
) -> Result<String, GroupError> {
    let request = FindCoordinatorRequest::default()
        .with_key(StrBytes::from_string(group.to_string()))
        .with_key_type(GROUP_KEY_TYPE);

    let mut attempt = 1;
    loop {
        let response: FindCoordinatorResponse = connection
            .send(ApiKey::FindCoordinator, FIND_COORDINATOR_VERSION, &request)
            .await?;

        match response.error_code {
            0 => return Ok(format!("{}:{}", response.host, response.port)),
            code if is_retriable(code) && attempt < COORDINATOR_ATTEMPTS => {
                debug!(group = group, error_code = code, attempt = attempt, "Coordinator not ready");
                attempt += 1;
                tokio::time::sleep(COORDINATOR_BACKOFF).await;
            }
            code => return Err(GroupError::Broker(code)),
        }
    }
}

#[cfg(test)]
#[path = "groups_tests.rs"]
mod tests;
