#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! High-level pipeline that turns a protoc request into generated
//! command-line client sources.
//!
//! ## Module Organization
//!
//! - `generator` - the plugin driver: request in, response out
//! - `orchestration` - offline entry points working from a serialized
//!   `FileDescriptorSet` instead of a protoc request

use thiserror::Error;

/// Convenient result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while running the generation pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The plugin parameter or configuration file was rejected.
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    /// The descriptors could not be projected.
    #[error(transparent)]
    Descriptor(#[from] descriptor::DescriptorError),
    /// Error propagated from the codegen crate.
    #[error(transparent)]
    Codegen(#[from] codegen::CodegenError),
    /// The input was not a valid protobuf encoding.
    #[error("failed to decode descriptors: {0}")]
    Decode(#[from] prost::DecodeError),
    /// A file to generate was not among the request's descriptors.
    #[error("file to generate '{0}' has no descriptor")]
    MissingFile(String),
    /// I/O error while reading input or writing files.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub mod generator;
pub mod orchestration;

pub use generator::{error_response, Generator};
pub use orchestration::{compile_descriptor_set, dump_model, load_descriptor_set};
