#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! rpcli Configuration
//!
//! This crate provides the immutable configuration object handed to the
//! resolver and the synthesizer for one generation run. It covers:
//! - where generated code finds foreign packages (`module_root`, `extern_path`)
//! - which runtime crate the generated code links against
//! - how unresolved cross-package references are treated (`strict_imports`)
//! - logging for the plugin process
//!
//! A configuration is built from the protoc plugin parameter string and may
//! be seeded from a TOML file (`config=<path>`).

pub mod reserved;
pub mod support;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use reserved::ReservedNames;
pub use support::{SupportPackage, SupportPackages};

/// Errors that can occur when loading, saving or parsing configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    /// Failed to parse the TOML configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize configuration to TOML format
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Could not locate the user's configuration directory
    #[error("Could not find user config directory")]
    ConfigDirUnavailable,
    /// A plugin parameter had a value that could not be interpreted
    #[error("Invalid value for plugin parameter '{key}': {value}")]
    InvalidParameter {
        /// Parameter name
        key: String,
        /// Offending value
        value: String,
    },
    /// The plugin parameter string contained options this plugin does not know
    #[error("Unknown opts:\n - {}", .0.join("\n - "))]
    UnknownParameters(Vec<String>),
}

/// Convenient result type for configuration functions in this crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Generator configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Rust path under which every protobuf package module lives (e.g. `crate::pb`).
    ///
    /// When unset, foreign packages are reached through a relative `super::`
    /// chain, matching the module layout produced by prost's include file.
    pub module_root: Option<String>,
    /// Name of the runtime crate referenced by generated code.
    pub runtime_crate: String,
    /// Fail generation when a cross-package input type is not imported by the file.
    pub strict_imports: bool,
    /// Protobuf package prefix (leading dot) to Rust path overrides.
    pub extern_paths: BTreeMap<String, String>,
    /// Built-in default for the generated `--server-addr` flag.
    pub default_server_addr: String,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or `tracing` filter directive (debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self { Self { level: "warn".to_string() } }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            module_root: None,
            runtime_crate: "rpcli_runtime".to_string(),
            strict_imports: false,
            extern_paths: BTreeMap::new(),
            default_server_addr: "localhost:8080".to_string(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a TOML file at `path`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save this configuration as a pretty-printed TOML file at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns the default config file path:
    /// `{config_dir()}/rpcli/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirUnavailable)?.join("rpcli");
        Ok(config_dir.join("config.toml"))
    }

    /// Build a configuration from the protoc plugin parameter string.
    ///
    /// Options are comma separated `key=value` pairs; a literal comma inside
    /// a value is written `\,`. A `config=<path>` option seeds the
    /// configuration from a TOML file before the remaining options apply,
    /// regardless of its position.
    pub fn from_parameter(parameter: &str) -> Result<Self> {
        let opts = split_escaped(parameter, ',');

        let mut config = match opts.iter().find_map(|opt| opt.strip_prefix("config=")) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        let mut unknown = Vec::new();
        for opt in &opts {
            let (key, value) = opt.split_once('=').unwrap_or((opt.as_str(), ""));
            match key {
                "config" => {}
                "module_root" => config.module_root = non_empty(value),
                "runtime_crate" => config.runtime_crate = require(key, value)?,
                "strict_imports" => config.strict_imports = parse_flag(key, value)?,
                "default_server_addr" => config.default_server_addr = require(key, value)?,
                "log_level" => config.logging.level = require(key, value)?,
                "extern_path" => {
                    let (proto, rust) = value.split_once('=').ok_or_else(|| {
                        ConfigError::InvalidParameter { key: key.to_string(), value: value.to_string() }
                    })?;
                    if !proto.starts_with('.') || rust.is_empty() {
                        return Err(ConfigError::InvalidParameter {
                            key: key.to_string(),
                            value: value.to_string(),
                        });
                    }
                    config.extern_paths.insert(proto.to_string(), rust.to_string());
                }
                _ => unknown.push(opt.clone()),
            }
        }

        if !unknown.is_empty() {
            return Err(ConfigError::UnknownParameters(unknown));
        }
        Ok(config)
    }

    /// The support-package table for this configuration.
    ///
    /// A pure function of `runtime_crate`, so recomputing it is always safe.
    pub fn support_packages(&self) -> SupportPackages { SupportPackages::new(&self.runtime_crate) }

    /// The reserved-name table used when allocating identifiers.
    pub fn reserved_names(&self) -> ReservedNames { ReservedNames::rust() }
}

/// Split `s` on `sep`, honoring `\` escapes, dropping empty items.
pub fn split_escaped(s: &str, sep: char) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                current.push(next);
            }
        } else if c == sep {
            items.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    items.push(current);

    items.into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn require(key: &str, value: &str) -> Result<String> {
    non_empty(value).ok_or_else(|| ConfigError::InvalidParameter {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value {
        "" | "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => {
            Err(ConfigError::InvalidParameter { key: key.to_string(), value: other.to_string() })
        }
    }
}
