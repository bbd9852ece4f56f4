#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Code synthesis for gRPC command-line clients.
//!
//! For every protocol file that declares services this crate produces one
//! Rust source file, `<proto path without .proto>.cli.rs`, meant to be
//! included next to the prost and tonic output of the same package. It
//! holds a clap command per service with one subcommand per method, and
//! the glue that reads requests, makes the call and prints the responses.
//!
//! Text comes from the templates under `templates/`; the naming decisions
//! come from the `naming` crate.

mod emit;
pub mod render;

use std::fs;
use std::path::Path;

use config::GeneratorConfig;
use descriptor::{DescriptorSet, FileUnit};
use naming::{FileNames, NamingError};
use thiserror::Error;

pub use emit::shape_template;

/// Error type for code generation operations in this crate.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Underlying I/O error while writing files.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Formatting error when building generated source.
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),
    /// A name could not be decided.
    #[error(transparent)]
    Naming(#[from] NamingError),
    /// A method input type has no resolved spelling.
    #[error("input type '{0}' was not resolved")]
    UnresolvedInput(String),
}

/// Convenient result type for codegen functions in this crate.
pub type Result<T> = std::result::Result<T, CodegenError>;

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to the output directory
    pub name: String,
    /// File contents
    pub content: String,
}

/// Produces the command-line client source of a protocol file.
pub trait CodeGenerator {
    /// Generate the file for `file`, or `None` when it declares no services.
    fn generate(&self, file: &FileUnit, set: &DescriptorSet) -> Result<Option<GeneratedFile>>;
}

/// The generator behind `protoc-gen-rpcli`.
#[derive(Debug, Clone)]
pub struct CliGenerator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> CliGenerator<'a> {
    /// Generator using `config`.
    pub fn new(config: &'a GeneratorConfig) -> Self { Self { config } }
}

impl CodeGenerator for CliGenerator<'_> {
    fn generate(&self, file: &FileUnit, set: &DescriptorSet) -> Result<Option<GeneratedFile>> {
        if !file.has_services() {
            tracing::debug!("{}: no services, nothing to generate", file.name);
            return Ok(None);
        }
        let names = FileNames::resolve(file, set, self.config)?;

        let mut code = String::new();
        emit::emit_header(&mut code, file, self.config);
        emit::emit_support_imports(&mut code, &names)?;
        emit::emit_cross_imports(&mut code, &names)?;
        for (service, service_names) in file.services().iter().zip(names.services()) {
            emit::emit_service(&mut code, service, service_names, &names, self.config)?;
        }

        let name = output_name(&file.name);
        tracing::info!("generated {name} ({} services)", file.services().len());
        Ok(Some(GeneratedFile { name, content: clean_generated_source(&code) }))
    }
}

/// `bank/v1/bank.proto` -> `bank/v1/bank.cli.rs`.
pub fn output_name(proto: &str) -> String {
    let stem = proto.strip_suffix(".proto").unwrap_or(proto);
    format!("{stem}.cli.rs")
}

/// Trim trailing whitespace from each line and drop trailing blank lines.
/// Always ensures the returned string ends with a single newline when not empty.
pub fn clean_generated_source(src: &str) -> String {
    let mut lines: Vec<&str> = src.lines().map(str::trim_end).collect();

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    }
}

/// Persist generated files under `out_dir`, creating any necessary
/// subdirectories.
pub fn write_generated<P: AsRef<Path>>(out_dir: P, files: &[GeneratedFile]) -> std::io::Result<()> {
    fs::create_dir_all(&out_dir)?;
    for file in files {
        let path = out_dir.as_ref().join(&file.name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, clean_generated_source(&file.content).as_bytes())?;
    }
    Ok(())
}
