//! Resolution of foreign packages to Rust module paths.

use std::collections::{BTreeMap, BTreeSet};

use config::{GeneratorConfig, ReservedNames};

use crate::ident;

/// A foreign package imported under an alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossPackageImport {
    /// Alias used in the generated file, e.g. `cache_v2_sub_pb`
    pub alias: String,
    /// Dotted package, e.g. `cache.v2.sub`
    pub package: String,
    /// Rust path of the package module
    pub path: String,
}

/// Where a foreign package lives, as seen from one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageLocation {
    /// Reachable through the file's imports, bound with a `use`
    Imported(String),
    /// Not among the file's imports; referenced by a fully qualified path
    Unresolved(String),
}

/// Maps foreign packages to module paths for one file.
#[derive(Debug)]
pub struct PackageResolver<'a> {
    file_package: &'a str,
    visible: &'a BTreeSet<String>,
    module_root: Option<&'a str>,
    extern_paths: &'a BTreeMap<String, String>,
    reserved: &'a ReservedNames,
}

impl<'a> PackageResolver<'a> {
    /// Resolver for a file in `file_package` that can see `visible` packages.
    pub fn new(
        file_package: &'a str,
        visible: &'a BTreeSet<String>,
        config: &'a GeneratorConfig,
        reserved: &'a ReservedNames,
    ) -> Self {
        Self {
            file_package,
            visible,
            module_root: config.module_root.as_deref().filter(|r| !r.is_empty()),
            extern_paths: &config.extern_paths,
            reserved,
        }
    }

    /// Locate `package`.
    pub fn locate(&self, package: &str) -> PackageLocation {
        if !self.visible.contains(package) {
            let root = self.module_root.unwrap_or("crate");
            return PackageLocation::Unresolved(self.join(root, package));
        }
        if let Some(path) = self.extern_path(package) {
            return PackageLocation::Imported(path);
        }
        let path = match self.module_root {
            Some(root) => self.join(root, package),
            None => self.join(&self.relative_root(), package),
        };
        PackageLocation::Imported(path)
    }

    /// Path from the longest `extern_path` prefix covering `package`.
    fn extern_path(&self, package: &str) -> Option<String> {
        self.extern_paths
            .iter()
            .filter_map(|(proto, rust)| {
                let proto = proto.strip_prefix('.').unwrap_or(proto);
                let rest = if proto == package {
                    ""
                } else {
                    package.strip_prefix(proto)?.strip_prefix('.')?
                };
                Some((proto.len(), rust, rest))
            })
            .max_by_key(|(len, _, _)| *len)
            .map(|(_, rust, rest)| if rest.is_empty() { rust.clone() } else { self.join(rust, rest) })
    }

    /// `super::` once per segment of the file's package, prost's module nesting.
    fn relative_root(&self) -> String {
        let depth = if self.file_package.is_empty() { 0 } else { self.file_package.split('.').count() };
        if depth == 0 {
            "self".to_string()
        } else {
            vec!["super"; depth].join("::")
        }
    }

    fn join(&self, root: &str, package: &str) -> String {
        let mut path = root.trim_end_matches("::").to_string();
        for segment in package.split('.') {
            path.push_str("::");
            path.push_str(&ident::snake(segment, self.reserved));
        }
        path
    }
}
