// SPDX-License-Identifier: CC0-1.0

//! rpcli umbrella crate.
//!
//! This crate primarily serves as the workspace root.
//!
//! All functional code lives in the workspace member crates under
//! `primitives/`, `compiler/` and `cli/`: the descriptor model, the naming
//! and import resolver, the code synthesizer, the plugin driver and the
//! runtime consumed by generated clients.

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![warn(deprecated_in_future)]
#![doc(test(attr(warn(unused))))]

/// Miscellaneous metadata about the rpcli workspace.
pub mod rpcli_meta {
    /// Version string for the umbrella crate, as reported by Cargo.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// Name of the protoc plugin binary; protoc derives `--rpcli_out` from it.
    pub const PLUGIN_NAME: &str = "protoc-gen-rpcli";
}
