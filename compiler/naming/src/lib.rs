#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Naming & Import Resolver
//!
//! Decides every identifier a generated file uses that is not fixed text:
//! the aliases of support packages, the aliases and paths of foreign
//! protobuf packages, the Rust spelling of each method's input type, and
//! the names of the per-service and per-method items.
//!
//! All decisions for one file are made up front by [`FileNames::resolve`]
//! and are deterministic: the same descriptors and configuration always
//! produce the same names.

pub mod allocator;
pub mod ident;
pub mod items;
pub mod packages;
pub mod reference;

use std::collections::{BTreeMap, BTreeSet};

use config::GeneratorConfig;
use descriptor::{DescriptorError, DescriptorSet, FileUnit};
use thiserror::Error;

pub use allocator::{ImportBinding, NameAllocator, SupportImports};
pub use items::{MethodItems, ServiceItems};
pub use packages::{CrossPackageImport, PackageLocation, PackageResolver};
pub use reference::{package_alias, TypeReference};

/// Errors raised while naming a file's generated items.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamingError {
    /// A type reference ends without a type name, e.g. `.pkg.`
    #[error("empty type name in reference '{0}'")]
    EmptyTypeName(String),
    /// A foreign package is not reachable from the file's imports.
    #[error("{file}: package '{package}' is not imported by this file")]
    UnresolvedPackage {
        /// The foreign package
        package: String,
        /// File referencing it
        file: String,
    },
    /// The file itself cannot be named.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// Result type for naming.
pub type Result<T> = std::result::Result<T, NamingError>;

/// Names of one service and its methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceNames {
    /// Service-level items
    pub items: ServiceItems,
    /// Method-level items, in declared order
    pub methods: Vec<MethodItems>,
}

/// Every naming decision for one generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNames {
    package: String,
    support: SupportImports,
    cross: Vec<CrossPackageImport>,
    inputs: BTreeMap<String, String>,
    services: Vec<ServiceNames>,
}

impl FileNames {
    /// Resolve the names for `file`, looking up imports in `set`.
    pub fn resolve(file: &FileUnit, set: &DescriptorSet, config: &GeneratorConfig) -> Result<Self> {
        let reserved = config.reserved_names();
        let package = file.package_for_decomposition()?.to_string();

        let services: Vec<ServiceNames> = file
            .services()
            .iter()
            .map(|service| {
                let items = ServiceItems::new(service, &reserved);
                let methods =
                    service.methods.iter().map(|m| MethodItems::new(&items, m, &reserved)).collect();
                ServiceNames { items, methods }
            })
            .collect();

        let mut allocator = NameAllocator::new(&reserved);
        for name in &file.type_names {
            allocator.reserve(ident::upper_camel(name, &reserved));
        }
        for name in &file.scoped_messages {
            allocator.reserve(ident::snake(name, &reserved));
        }
        for service in &services {
            service.items.identifiers().for_each(|id| allocator.reserve(id));
            for method in &service.methods {
                method.identifiers().for_each(|id| allocator.reserve(id));
            }
        }
        let support = SupportImports::allocate(&config.support_packages(), &mut allocator);

        let references = file
            .methods()
            .map(|(_, method)| {
                TypeReference::decompose(&method.input_type, &package, &reserved)
                    .map(|reference| (method.input_type.clone(), reference))
            })
            .collect::<Result<Vec<_>>>()?;
        let foreign: BTreeSet<&str> =
            references.iter().filter(|(_, r)| r.is_foreign()).map(|(_, r)| r.package.as_str()).collect();

        let visible = set.transitive_packages(&file.name);
        let resolver = PackageResolver::new(&package, &visible, config, &reserved);
        let mut imported: BTreeMap<&str, CrossPackageImport> = BTreeMap::new();
        let mut qualified: BTreeMap<&str, String> = BTreeMap::new();
        for foreign_package in foreign {
            match resolver.locate(foreign_package) {
                PackageLocation::Imported(path) => {
                    let alias = allocator.allocate(&package_alias(foreign_package));
                    imported.insert(
                        foreign_package,
                        CrossPackageImport { alias, package: foreign_package.to_string(), path },
                    );
                }
                PackageLocation::Unresolved(path) => {
                    if config.strict_imports {
                        return Err(NamingError::UnresolvedPackage {
                            package: foreign_package.to_string(),
                            file: file.name.clone(),
                        });
                    }
                    tracing::warn!(
                        "{}: package '{foreign_package}' is not imported, referencing it as {path}",
                        file.name
                    );
                    qualified.insert(foreign_package, path);
                }
            }
        }

        let mut inputs = BTreeMap::new();
        for (raw, reference) in &references {
            let path = if !reference.is_foreign() {
                reference.type_name.clone()
            } else if let Some(import) = imported.get(reference.package.as_str()) {
                format!("{}::{}", import.alias, reference.type_name)
            } else {
                let module = qualified.get(reference.package.as_str()).map(String::as_str).unwrap_or("crate");
                format!("{module}::{}", reference.type_name)
            };
            inputs.insert(raw.clone(), path);
        }

        let mut cross: Vec<CrossPackageImport> = imported.into_values().collect();
        cross.sort_by(|a, b| a.alias.cmp(&b.alias));

        tracing::debug!(
            "{}: {} support imports, {} cross-package imports",
            file.name,
            support.len(),
            cross.len()
        );
        Ok(Self { package, support, cross, inputs, services })
    }

    /// The file's package, empty when it declares none.
    pub fn package(&self) -> &str { &self.package }

    /// Support package bindings, in key order.
    pub fn support(&self) -> &SupportImports { &self.support }

    /// Alias of the support package `key`.
    pub fn alias<'a>(&'a self, key: &'a str) -> &'a str { self.support.alias(key) }

    /// Foreign packages bound with a `use`, ordered by alias.
    pub fn cross_imports(&self) -> &[CrossPackageImport] { &self.cross }

    /// Rust spelling of the input type `raw`, as referenced by a method.
    pub fn input_path(&self, raw: &str) -> Option<&str> { self.inputs.get(raw).map(String::as_str) }

    /// Names per service, in declared order.
    pub fn services(&self) -> &[ServiceNames] { &self.services }
}
