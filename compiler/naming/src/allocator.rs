//! File-unique alias allocation.

use std::collections::BTreeSet;

use config::{ReservedNames, SupportPackages};

/// Hands out identifiers that collide with nothing already taken.
///
/// A candidate is used as is when free, otherwise the first free
/// `candidate_1`, `candidate_2`, ... is taken.
#[derive(Debug, Clone, Default)]
pub struct NameAllocator {
    taken: BTreeSet<String>,
}

impl NameAllocator {
    /// Allocator with every reserved word already taken.
    pub fn new(reserved: &ReservedNames) -> Self {
        Self { taken: reserved.iter().map(str::to_string).collect() }
    }

    /// Mark `name` as taken.
    pub fn reserve(&mut self, name: impl Into<String>) { self.taken.insert(name.into()); }

    /// Whether `name` is taken.
    pub fn is_taken(&self, name: &str) -> bool { self.taken.contains(name) }

    /// Allocate a free identifier derived from `candidate`.
    pub fn allocate(&mut self, candidate: &str) -> String {
        let mut name = candidate.to_string();
        let mut suffix = 0usize;
        while self.taken.contains(&name) {
            suffix += 1;
            name = format!("{candidate}_{suffix}");
        }
        self.taken.insert(name.clone());
        name
    }
}

/// One support package bound to a file-unique alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// Logical key, e.g. `transport`
    pub key: &'static str,
    /// Rust path, e.g. `::tonic::transport`
    pub path: String,
    /// Alias used in the generated file
    pub alias: String,
    /// What the package is used for
    pub concern: &'static str,
}

/// Per-file support import table, ordered by key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportImports {
    bindings: Vec<ImportBinding>,
}

impl SupportImports {
    /// Bind every support package, in key order.
    pub fn allocate(packages: &SupportPackages, allocator: &mut NameAllocator) -> Self {
        let bindings = packages
            .iter()
            .map(|(key, package)| ImportBinding {
                key,
                path: package.path.clone(),
                alias: allocator.allocate(key),
                concern: package.concern,
            })
            .collect();
        Self { bindings }
    }

    /// Binding for `key`.
    pub fn get(&self, key: &str) -> Option<&ImportBinding> { self.bindings.iter().find(|b| b.key == key) }

    /// Alias bound to `key`, or the key itself if it is not a support package.
    pub fn alias<'a>(&'a self, key: &'a str) -> &'a str {
        self.get(key).map(|b| b.alias.as_str()).unwrap_or(key)
    }

    /// Bindings in key order.
    pub fn iter(&self) -> impl Iterator<Item = &ImportBinding> { self.bindings.iter() }

    /// Number of bindings.
    pub fn len(&self) -> usize { self.bindings.len() }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool { self.bindings.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_suffixes_on_collision() {
        let mut allocator = NameAllocator::default();
        allocator.reserve("time");
        assert_eq!(allocator.allocate("time"), "time_1");
        assert_eq!(allocator.allocate("time"), "time_2");
        assert_eq!(allocator.allocate("io"), "io");
        assert!(allocator.is_taken("io"));
    }

    #[test]
    fn test_keywords_are_taken() {
        let mut allocator = NameAllocator::new(&ReservedNames::rust());
        assert_eq!(allocator.allocate("type"), "type_1");
        assert_eq!(allocator.allocate("codec"), "codec");
    }

    #[test]
    fn test_support_imports_in_key_order() {
        let packages = SupportPackages::new("rpcli_runtime");
        let mut allocator = NameAllocator::new(&ReservedNames::rust());
        let imports = SupportImports::allocate(&packages, &mut allocator);

        let keys: Vec<_> = imports.iter().map(|b| b.key).collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
        assert_eq!(imports.len(), packages.len());
        assert_eq!(imports.alias("transport"), "transport");
        assert_eq!(imports.get("runtime").unwrap().path, "::rpcli_runtime");
    }
}
