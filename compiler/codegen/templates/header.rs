// @generated by protoc-gen-rpcli {{VERSION}}. DO NOT EDIT.
// source: {{SOURCE}}
//
// Include this file in the same module as the prost and tonic output for
// package `{{PACKAGE}}`. Request and response messages must implement
// serde's Serialize and Deserialize, for example through
// `prost_build::Config::type_attribute(".", "#[derive(serde::Serialize, serde::Deserialize)]")`.
// The including crate depends on clap (with the `env` feature), tonic and
// {{RUNTIME_CRATE}}.

