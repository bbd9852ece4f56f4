//! Offline entry points.
//!
//! These work from a serialized `FileDescriptorSet`, as written by
//! `protoc --descriptor_set_out --include_imports`, so the generator can run
//! without protoc driving it.

use std::fs;
use std::path::Path;

use descriptor::DescriptorSet;
use prost::Message;
use prost_types::FileDescriptorSet;

use crate::generator::Generator;
use crate::Result;

/// Read and project a serialized `FileDescriptorSet`.
pub fn load_descriptor_set(path: &Path) -> Result<DescriptorSet> {
    let bytes = fs::read(path)?;
    let raw = FileDescriptorSet::decode(bytes.as_slice())?;
    tracing::debug!("{}: {} file descriptors", path.display(), raw.file.len());
    Ok(DescriptorSet::from_protos(&raw.file)?)
}

/// Generate every file with services in the set at `input` into `out_dir`.
///
/// Returns the names of the written files, relative to `out_dir`.
pub fn compile_descriptor_set(input: &Path, out_dir: &Path, generator: &Generator) -> Result<Vec<String>> {
    let set = load_descriptor_set(input)?;
    let names: Vec<&str> = set.files().filter(|f| f.has_services()).map(|f| f.name.as_str()).collect();
    let files = generator.generate_files(&set, names)?;
    codegen::write_generated(out_dir, &files)?;
    Ok(files.into_iter().map(|f| f.name).collect())
}

/// Write the descriptor model of the set at `input` as JSON to `output`.
pub fn dump_model(input: &Path, output: &Path) -> Result<()> {
    let set = load_descriptor_set(input)?;
    set.to_file(output)?;
    Ok(())
}
