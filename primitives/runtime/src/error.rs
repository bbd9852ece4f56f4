use std::path::PathBuf;

use crate::codec::CodecError;

/// Result alias for a command run.
pub type Result<T> = std::result::Result<T, RunError>;

/// Everything that can make a generated command fail.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The flags or environment describe an unusable configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request file could not be opened.
    #[error("failed to open request file {path}: {source}")]
    RequestFile {
        /// Path given with `--request-file`
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A single-request call found no request in its input.
    #[error("no request found in input")]
    EmptyInput,

    /// Decoding a request or encoding a response failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The channel could not be established.
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// The server answered with a non-OK status.
    #[error("rpc failed: {0}")]
    Status(#[from] tonic::Status),

    /// Any other I/O failure, such as starting the async runtime.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
