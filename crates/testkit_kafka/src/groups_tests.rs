use super::*;
use kafka_protocol::messages::delete_groups_response::DeletableGroupResult;

fn deletable(group: &'static str, error_code: i16) -> DeletableGroupResult {
    DeletableGroupResult::default()
        .with_group_id(GroupId(StrBytes::from_static_str(group)))
        .with_error_code(error_code)
}

#[test]
fn test_encode_request_frames_header() {
    let request = FindCoordinatorRequest::default()
        .with_key(StrBytes::from_static_str("billing"))
        .with_key_type(GROUP_KEY_TYPE);

    let frame = encode_request(ApiKey::FindCoordinator, 1, 42, "testkit", &request).unwrap();

    let len = i32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]);
    assert_eq!(len as usize, frame.len() - 4);
    assert_eq!(i16::from_be_bytes([frame[4], frame[5]]), ApiKey::FindCoordinator as i16);
    assert_eq!(i16::from_be_bytes([frame[6], frame[7]]), 1);
    assert_eq!(i32::from_be_bytes([frame[8], frame[9], frame[10], frame[11]]), 42);
}

#[test]
fn test_decode_response_reads_correlation_id_and_body() {
    let version = FIND_COORDINATOR_VERSION;
    let mut body = BytesMut::new();
    ResponseHeader::default()
        .with_correlation_id(7)
        .encode(&mut body, ApiKey::FindCoordinator.response_header_version(version))
        .unwrap();
    FindCoordinatorResponse::default()
        .with_host(StrBytes::from_static_str("10.1.2.3"))
        .with_port(9092)
        .encode(&mut body, version)
        .unwrap();

    let (correlation_id, response): (i32, FindCoordinatorResponse) =
        decode_response(ApiKey::FindCoordinator, version, body.freeze()).unwrap();

    assert_eq!(correlation_id, 7);
    assert_eq!(response.error_code, 0);
    assert_eq!(format!("{}:{}", response.host, response.port), "10.1.2.3:9092");
}

#[test]
fn test_group_result_deleted() {
    let response = DeleteGroupsResponse::default().with_results(vec![deletable("billing", 0)]);
    assert!(group_result(&response, "billing").is_ok());
}

#[test]
fn test_group_result_missing_group_counts_as_deleted() {
    let response = DeleteGroupsResponse::default()
        .with_results(vec![deletable("billing", GROUP_ID_NOT_FOUND)]);
    assert!(group_result(&response, "billing").is_ok());
}

#[test]
fn test_group_result_non_empty_group_fails() {
    let response = DeleteGroupsResponse::default()
        .with_results(vec![deletable("other", 0), deletable("billing", 68)]);

    assert!(matches!(
        group_result(&response, "billing"),
        Err(GroupError::Broker(68))
    ));
}

#[test]
fn test_group_result_without_entry_is_protocol_error() {
    let response = DeleteGroupsResponse::default().with_results(vec![deletable("other", 0)]);

    assert!(matches!(
        group_result(&response, "billing"),
        Err(GroupError::Protocol(_))
    ));
}

#[test]
fn test_coordinator_errors_are_retriable() {
    assert!(is_retriable(COORDINATOR_LOAD_IN_PROGRESS));
    assert!(is_retriable(COORDINATOR_NOT_AVAILABLE));
    assert!(is_retriable(NOT_COORDINATOR));
    assert!(!is_retriable(0));
    assert!(!is_retriable(GROUP_ID_NOT_FOUND));
}

#[tokio::test]
async fn test_delete_group_without_reachable_broker_fails() {
    let result = delete_group(&["127.0.0.1:1".to_string()], "testkit", "billing").await;
    assert!(matches!(result, Err(GroupError::Io { .. })));
}

#[tokio::test]
async fn test_delete_group_without_brokers_fails() {
    let result = delete_group(&[], "testkit", "billing").await;
    assert!(matches!(result, Err(GroupError::Protocol(_))));
}
