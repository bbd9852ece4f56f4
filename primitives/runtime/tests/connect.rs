use std::io::Write;

use rpcli_runtime::auth::AuthOptions;
use rpcli_runtime::connect::ConnectOptions;
use rpcli_runtime::RunError;
use tempfile::NamedTempFile;

#[test]
fn test_tls_rejects_insecure_skip_verify() {
    let options = ConnectOptions { tls: true, insecure_skip_verify: true, ..ConnectOptions::new("h:1") };
    assert!(matches!(options.tls_config(), Err(RunError::Config(_))));
}

#[test]
fn test_cert_without_key_is_config_error() {
    let mut cert = NamedTempFile::new().unwrap();
    writeln!(cert, "-----BEGIN CERTIFICATE-----").unwrap();
    let options = ConnectOptions {
        tls: true,
        cert_file: Some(cert.path().to_path_buf()),
        ..ConnectOptions::new("h:1")
    };
    let err = options.tls_config().unwrap_err();
    assert!(err.to_string().contains("--key-file"));
}

#[test]
fn test_unreadable_ca_is_config_error() {
    let options = ConnectOptions {
        tls: true,
        ca_cert_file: Some("/definitely/not/here.pem".into()),
        ..ConnectOptions::new("h:1")
    };
    assert!(matches!(options.tls_config(), Err(RunError::Config(_))));
}

#[test]
fn test_endpoint_for_plaintext() {
    let endpoint = ConnectOptions::new("localhost:50051").endpoint().unwrap();
    assert!(endpoint.uri().to_string().starts_with("http://localhost:50051"));
}

#[test]
fn test_missing_jwt_key_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let options = AuthOptions { jwt_key_file: Some(dir.path().join("absent.json")), ..Default::default() };
    let err = options.header_value().unwrap_err();
    assert!(matches!(err, RunError::Config(ref msg) if msg.contains("failed to read JWT key file")));
}

#[tokio::test]
async fn test_connect_refused_is_transport_error() {
    let options = ConnectOptions {
        timeout: std::time::Duration::from_millis(200),
        ..ConnectOptions::new("127.0.0.1:1")
    };
    assert!(matches!(options.connect().await, Err(RunError::Transport(_))));
}
