use super::*;

#[test]
fn test_server_args_announce_host() {
    let args = server_args("10.1.2.3");

    assert_eq!(args[0], "dragonfly");
    assert!(args.contains(&"--cluster_mode=emulated".to_string()));
    assert_eq!(args.last().map(String::as_str), Some("--cluster_announce_ip=10.1.2.3"));
}
