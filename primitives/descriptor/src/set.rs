//! The set of files handed to one generation run.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use prost_types::FileDescriptorProto;
use serde::{Deserialize, Serialize};

use crate::units::FileUnit;
use crate::{DescriptorError, Result};

/// Every file protoc handed over, keyed by file name.
///
/// Includes the imports of the files to generate, so package visibility can
/// be computed across the import graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorSet {
    files: BTreeMap<String, FileUnit>,
}

impl DescriptorSet {
    /// Create an empty set
    pub fn new() -> Self { Self::default() }

    /// Project every raw descriptor into the set.
    pub fn from_protos(protos: &[FileDescriptorProto]) -> Result<Self> {
        let mut set = Self::new();
        for proto in protos {
            set.insert(FileUnit::from_proto(proto)?)?;
        }
        Ok(set)
    }

    /// Add a file, rejecting duplicates.
    pub fn insert(&mut self, file: FileUnit) -> Result<()> {
        if self.files.contains_key(&file.name) {
            return Err(DescriptorError::DuplicateFile(file.name));
        }
        self.files.insert(file.name.clone(), file);
        Ok(())
    }

    /// Look up a file by name.
    pub fn file(&self, name: &str) -> Option<&FileUnit> { self.files.get(name) }

    /// All files, ordered by name.
    pub fn files(&self) -> impl Iterator<Item = &FileUnit> { self.files.values() }

    /// Number of files in the set.
    pub fn len(&self) -> usize { self.files.len() }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool { self.files.is_empty() }

    /// Packages reachable from `name` through its imports, including its own.
    ///
    /// Imports that are not part of the set are skipped. Files without a
    /// package contribute nothing.
    pub fn transitive_packages(&self, name: &str) -> BTreeSet<String> {
        let mut packages = BTreeSet::new();
        let mut seen = BTreeSet::new();
        let mut pending = vec![name.to_string()];

        while let Some(current) = pending.pop() {
            if !seen.insert(current.clone()) {
                continue;
            }
            let Some(file) = self.files.get(&current) else { continue };
            if let Some(package) = &file.package {
                packages.insert(package.clone());
            }
            pending.extend(file.dependencies.iter().filter(|d| !seen.contains(*d)).cloned());
        }
        packages
    }

    /// Load a model previously written with [`DescriptorSet::to_file`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader(reader).map_err(std::io::Error::other)
    }

    /// Write the model as pretty JSON, with a trailing newline.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self).map_err(std::io::Error::other)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }

    /// The model as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> { serde_json::to_string_pretty(self) }
}
