use assert_cmd::Command;
use predicates::prelude::*;
use prost::Message;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use prost_types::{FileDescriptorProto, FileDescriptorSet, MethodDescriptorProto, ServiceDescriptorProto};
use tempfile::tempdir;

fn plugin() -> Command { Command::new(assert_cmd::cargo::cargo_bin!("protoc-gen-rpcli")) }

fn bank_proto() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("bank/v1/bank.proto".to_string()),
        package: Some("bank.v1".to_string()),
        service: vec![ServiceDescriptorProto {
            name: Some("Bank".to_string()),
            method: vec![MethodDescriptorProto {
                name: Some("Deposit".to_string()),
                input_type: Some(".bank.v1.DepositRequest".to_string()),
                output_type: Some(".bank.v1.DepositResponse".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn request(parameter: Option<&str>) -> Vec<u8> {
    CodeGeneratorRequest {
        file_to_generate: vec!["bank/v1/bank.proto".to_string()],
        parameter: parameter.map(str::to_string),
        proto_file: vec![bank_proto()],
        ..Default::default()
    }
    .encode_to_vec()
}

fn respond(input: Vec<u8>) -> CodeGeneratorResponse {
    let output = plugin().write_stdin(input).assert().success().get_output().stdout.clone();
    CodeGeneratorResponse::decode(output.as_slice()).unwrap()
}

#[test]
fn plugin_round_trips_a_request() {
    let response = respond(request(None));
    assert_eq!(response.error, None);
    assert_eq!(response.supported_features, Some(1));
    assert_eq!(response.file.len(), 1);
    assert_eq!(response.file[0].name(), "bank/v1/bank.cli.rs");
    assert!(response.file[0].content().contains("pub fn run_bank_client_command("));
}

#[test]
fn plugin_reports_bad_parameters_in_response() {
    let response = respond(request(Some("strict_imports=maybe")));
    assert!(response.file.is_empty());
    assert!(response.error.unwrap().contains("strict_imports"));
}

#[test]
fn plugin_rejects_garbage_input() {
    plugin()
        .write_stdin(vec![0xff, 0xff, 0xff])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to decode CodeGeneratorRequest"));
}

#[test]
fn version_flag_prints_version() {
    plugin().arg("--version").assert().success().stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn descriptor_set_generates_into_out_dir() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("bank.pb");
    std::fs::write(&input, FileDescriptorSet { file: vec![bank_proto()] }.encode_to_vec()).unwrap();
    let out = tmp.path().join("gen");

    plugin()
        .arg("--descriptor-set")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .args(["--parameter", "default_server_addr=bank:443"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bank.cli.rs"));

    let content = std::fs::read_to_string(out.join("bank/v1/bank.cli.rs")).unwrap();
    assert!(content.contains(".default_value(\"bank:443\")"));
}

#[test]
fn descriptor_set_without_output_is_usage_error() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("bank.pb");
    std::fs::write(&input, FileDescriptorSet { file: vec![bank_proto()] }.encode_to_vec()).unwrap();

    plugin()
        .arg("--descriptor-set")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--out or --dump-model"));
}

#[test]
fn dump_model_writes_json() {
    let tmp = tempdir().unwrap();
    let input = tmp.path().join("bank.pb");
    std::fs::write(&input, FileDescriptorSet { file: vec![bank_proto()] }.encode_to_vec()).unwrap();
    let model = tmp.path().join("model.json");

    plugin().arg("--descriptor-set").arg(&input).arg("--dump-model").arg(&model).assert().success();
    let json = std::fs::read_to_string(&model).unwrap();
    assert!(json.contains("\"bank/v1/bank.proto\""));
}

#[test]
fn dump_config_writes_defaults() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("conf/config.toml");
    plugin().arg("--dump-config").arg(&path).assert().success();

    let config = config::GeneratorConfig::from_file(&path).unwrap();
    assert_eq!(config, config::GeneratorConfig::default());
}
