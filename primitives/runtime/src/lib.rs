#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `rpcli-runtime`
//!
//! Support library linked by every command-line client that
//! `protoc-gen-rpcli` generates. Generated code never talks to serde,
//! tonic's transport or the terminal directly; it goes through the
//! modules here:
//!
//! - [`codec`]: reading requests from and writing responses to a byte
//!   stream in JSON, pretty JSON, YAML or XML.
//! - [`connect`]: turning the connection flags into a tonic channel,
//!   optionally over TLS.
//! - [`auth`]: attaching the `authorization` header to every call.
//! - [`env`]: small parsers for flag and environment values.
//!
//! Failures of a single command run are reported through [`RunError`].

pub mod auth;
pub mod codec;
pub mod connect;
pub mod env;
mod error;

pub use error::{Result, RunError};

/// Drive `future` to completion on a fresh current-thread runtime.
///
/// Generated commands are synchronous entry points; each one performs a
/// single call and then exits, so no runtime outlives the call.
pub fn block_on<F, T>(future: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(future)
}
