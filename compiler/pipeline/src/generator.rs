//! The protoc plugin driver.

use codegen::{CliGenerator, CodeGenerator, GeneratedFile};
use config::GeneratorConfig;
use descriptor::DescriptorSet;
use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};

use crate::{PipelineError, Result};

/// Runs one generation over a set of descriptors.
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: GeneratorConfig,
}

impl Generator {
    /// Generator with an explicit configuration.
    pub fn new(config: GeneratorConfig) -> Self { Self { config } }

    /// Generator configured from the request's plugin parameter.
    pub fn from_request(request: &CodeGeneratorRequest) -> Result<Self> {
        let config = GeneratorConfig::from_parameter(request.parameter())?;
        Ok(Self::new(config))
    }

    /// The configuration in use.
    pub fn config(&self) -> &GeneratorConfig { &self.config }

    /// Generate the files protoc asked for.
    ///
    /// Only files listed in `file_to_generate` are considered; those without
    /// services produce nothing.
    pub fn generate(&self, request: &CodeGeneratorRequest) -> Result<Vec<GeneratedFile>> {
        let set = DescriptorSet::from_protos(&request.proto_file)?;
        self.generate_files(&set, request.file_to_generate.iter().map(String::as_str))
    }

    /// Generate the named files of `set`, in the order given.
    pub fn generate_files<'a>(
        &self,
        set: &DescriptorSet,
        names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<GeneratedFile>> {
        let generator = CliGenerator::new(&self.config);
        let mut files = Vec::new();
        for name in names {
            let file = set.file(name).ok_or_else(|| PipelineError::MissingFile(name.to_string()))?;
            logging::trace("pipeline", &format!("generating {name}"));
            if let Some(generated) = generator.generate(file, set)? {
                files.push(generated);
            }
        }
        Ok(files)
    }

    /// Answer a protoc request; failures are reported inside the response.
    pub fn respond(&self, request: &CodeGeneratorRequest) -> CodeGeneratorResponse {
        match self.generate(request) {
            Ok(files) => {
                let mut response = empty_response();
                response.file = files
                    .into_iter()
                    .map(|f| File { name: Some(f.name), content: Some(f.content), ..Default::default() })
                    .collect();
                response
            }
            Err(err) => error_response(err),
        }
    }
}

/// A response carrying `err` and no files.
pub fn error_response(err: PipelineError) -> CodeGeneratorResponse {
    tracing::error!("{err}");
    let mut response = empty_response();
    response.error = Some(err.to_string());
    response
}

fn empty_response() -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    }
}
