#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! rpcli Descriptor Model
//!
//! This crate defines the normalized, read-only view of protobuf file
//! descriptors that the generator consumes: files, their services and the
//! methods of each service, in declared order. It is a pure projection of
//! `prost_types::FileDescriptorProto`; nothing here outlives one generation
//! run.

pub mod set;
pub mod units;

use thiserror::Error;

// Re-export the main model types for convenience
pub use set::DescriptorSet;
pub use units::*;

/// Errors raised while projecting raw descriptors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    /// A descriptor lacked a field the model cannot do without.
    #[error("{context}: missing {field}")]
    MissingField {
        /// Where the field was expected (file or service name)
        context: String,
        /// Name of the missing field
        field: &'static str,
    },
    /// A service or method name is not a valid identifier after case normalization.
    #[error("invalid {kind} name '{name}' in {file}")]
    InvalidIdentifier {
        /// `service` or `method`
        kind: &'static str,
        /// The offending name
        name: String,
        /// File declaring it
        file: String,
    },
    /// A file with services has no package but its type references need one.
    #[error("{0}: file declares services but no package, cannot resolve input types")]
    MissingPackage(String),
    /// The same file name appeared twice in one descriptor set.
    #[error("duplicate file descriptor: {0}")]
    DuplicateFile(String),
}

/// Result type for descriptor projection.
pub type Result<T> = std::result::Result<T, DescriptorError>;
