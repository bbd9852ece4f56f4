//! `protoc-gen-rpcli`
//!
//! Run by protoc as `--rpcli_out=<dir>`: reads a `CodeGeneratorRequest` on
//! stdin and answers with a `CodeGeneratorResponse` on stdout. Generation
//! errors travel inside the response, as protoc expects.
//!
//! The same binary can generate from a serialized `FileDescriptorSet`
//! without protoc, and write out the default configuration file.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use std::io::{Read, Write};
use std::path::PathBuf;

use clap::Parser;
use config::GeneratorConfig;
use pipeline::Generator;
use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode CodeGeneratorRequest: {0}")]
    Decode(#[from] prost::DecodeError),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Pipeline(#[from] pipeline::PipelineError),
    #[error("{0}")]
    Usage(&'static str),
}

/// Command-line interface of the plugin binary.
#[derive(Parser, Debug)]
#[command(
    name = "protoc-gen-rpcli",
    about = "protoc plugin generating gRPC command-line clients",
    long_about = "protoc plugin generating gRPC command-line clients.\n\nWithout options, reads a \
                  CodeGeneratorRequest on stdin and writes a CodeGeneratorResponse to stdout.",
    version
)]
struct Cli {
    /// Generate from a serialized FileDescriptorSet instead of stdin
    #[arg(long, value_name = "FILE")]
    descriptor_set: Option<PathBuf>,
    /// Output directory for --descriptor-set
    #[arg(long, value_name = "DIR", requires = "descriptor_set")]
    out: Option<PathBuf>,
    /// Plugin parameter string for --descriptor-set, as passed by protoc
    #[arg(long, requires = "descriptor_set")]
    parameter: Option<String>,
    /// Write the descriptor model of --descriptor-set as JSON
    #[arg(long, value_name = "FILE", requires = "descriptor_set")]
    dump_model: Option<PathBuf>,
    /// Write the default configuration as TOML (to the user config path when no path is given)
    #[arg(long, value_name = "FILE", num_args = 0..=1)]
    dump_config: Option<Option<PathBuf>>,
}

fn main() {
    let cli = Cli::parse();

    let result = if let Some(target) = &cli.dump_config {
        dump_config(target.clone())
    } else if let Some(input) = &cli.descriptor_set {
        run_offline(&cli, input)
    } else {
        run_plugin()
    };

    if let Err(e) = result {
        eprintln!("protoc-gen-rpcli: {e}");
        std::process::exit(1);
    }
}

fn run_plugin() -> Result<(), CliError> {
    let mut buf = Vec::new();
    std::io::stdin().read_to_end(&mut buf)?;
    let request = CodeGeneratorRequest::decode(buf.as_slice())?;

    let response = match Generator::from_request(&request) {
        Ok(generator) => {
            logging::init(&generator.config().logging.level);
            tracing::debug!(
                "{} files to generate, {} descriptors",
                request.file_to_generate.len(),
                request.proto_file.len()
            );
            generator.respond(&request)
        }
        Err(e) => {
            logging::init("warn");
            pipeline::error_response(e)
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&response.encode_to_vec())?;
    stdout.flush()?;
    Ok(())
}

fn run_offline(cli: &Cli, input: &std::path::Path) -> Result<(), CliError> {
    let config = GeneratorConfig::from_parameter(cli.parameter.as_deref().unwrap_or_default())?;
    logging::init(&config.logging.level);
    let generator = Generator::new(config);

    if let Some(model) = &cli.dump_model {
        pipeline::dump_model(input, model)?;
        println!("descriptor model written to {}", model.display());
    }
    if let Some(out) = &cli.out {
        for name in pipeline::compile_descriptor_set(input, out, &generator)? {
            println!("{}", out.join(name).display());
        }
    } else if cli.dump_model.is_none() {
        return Err(CliError::Usage("--descriptor-set needs --out or --dump-model"));
    }
    Ok(())
}

fn dump_config(target: Option<PathBuf>) -> Result<(), CliError> {
    let path = match target {
        Some(path) => path,
        None => GeneratorConfig::default_path()?,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    GeneratorConfig::default().save(&path)?;
    println!("default configuration written to {}", path.display());
    Ok(())
}
