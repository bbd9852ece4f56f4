//! The closed set of support packages referenced by generated code.
//!
//! Every concern maps a fixed key to a Rust path. The resolver turns the keys
//! into file-unique aliases; iteration is always in key order so the emitted
//! `use` block is byte-reproducible.

use std::collections::BTreeMap;

/// One support package: where it lives and what the generated code uses it for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportPackage {
    /// Absolute Rust path, e.g. `::tonic::transport`
    pub path: String,
    /// Human-readable concern, emitted as a trailing comment
    pub concern: &'static str,
}

/// Immutable table of support packages keyed by their logical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportPackages {
    packages: BTreeMap<&'static str, SupportPackage>,
}

impl SupportPackages {
    /// Build the table for generated code linking against `runtime_crate`.
    pub fn new(runtime_crate: &str) -> Self {
        let runtime = format!("::{runtime_crate}");
        let entries: [(&'static str, String, &'static str); 11] = [
            ("auth", format!("{runtime}::auth"), "token/auth helpers"),
            ("clap", "::clap".to_string(), "command framework"),
            ("codec", format!("{runtime}::codec"), "codec registry"),
            ("env", format!("{runtime}::env"), "config from environment"),
            ("fs", "::std::fs".to_string(), "certificate store"),
            ("io", "::std::io".to_string(), "process I/O"),
            ("path", "::std::path".to_string(), "file-path handling"),
            ("runtime", runtime.clone(), "runtime entry points"),
            ("time", "::std::time".to_string(), "time"),
            ("tonic", "::tonic".to_string(), "RPC transport"),
            ("transport", "::tonic::transport".to_string(), "transport credentials and TLS"),
        ];

        let packages = entries
            .into_iter()
            .map(|(key, path, concern)| (key, SupportPackage { path, concern }))
            .collect();
        Self { packages }
    }

    /// Look up a support package by key.
    pub fn get(&self, key: &str) -> Option<&SupportPackage> { self.packages.get(key) }

    /// Keys in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.packages.keys().copied()
    }

    /// `(key, package)` pairs in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &SupportPackage)> + '_ {
        self.packages.iter().map(|(k, v)| (*k, v))
    }

    /// Number of support packages.
    pub fn len(&self) -> usize { self.packages.len() }

    /// Whether the table is empty (never true for a table built by [`SupportPackages::new`]).
    pub fn is_empty(&self) -> bool { self.packages.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_sorted() {
        let table = SupportPackages::new("rpcli_runtime");
        let keys: Vec<_> = table.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
        assert_eq!(table.len(), 11);
    }

    #[test]
    fn test_runtime_paths() {
        let table = SupportPackages::new("rpcli_runtime");
        assert_eq!(table.get("runtime").map(|p| p.path.as_str()), Some("::rpcli_runtime"));
        assert_eq!(table.get("auth").map(|p| p.path.as_str()), Some("::rpcli_runtime::auth"));
        assert!(table.get("grpc").is_none());
    }
}
