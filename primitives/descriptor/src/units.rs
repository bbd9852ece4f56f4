//! File, service and method units.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use prost_types::{FileDescriptorProto, MethodDescriptorProto, ServiceDescriptorProto};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{DescriptorError, Result};

/// One of the four call patterns selected by a method's streaming flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamingShape {
    /// One request, one response
    Unary,
    /// Many requests, one response
    ClientStream,
    /// One request, many responses
    ServerStream,
    /// Many requests, many responses
    Bidirectional,
}

impl StreamingShape {
    /// Select the shape from `(client_streaming, server_streaming)`.
    pub fn from_flags(client_streaming: bool, server_streaming: bool) -> Self {
        match (client_streaming, server_streaming) {
            (false, false) => StreamingShape::Unary,
            (true, false) => StreamingShape::ClientStream,
            (false, true) => StreamingShape::ServerStream,
            (true, true) => StreamingShape::Bidirectional,
        }
    }

    /// Short label used in logs and generated comments.
    pub fn as_str(self) -> &'static str {
        match self {
            StreamingShape::Unary => "unary",
            StreamingShape::ClientStream => "client-streaming",
            StreamingShape::ServerStream => "server-streaming",
            StreamingShape::Bidirectional => "bidirectional",
        }
    }
}

impl std::fmt::Display for StreamingShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

/// One remote operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodUnit {
    /// Method name as declared
    pub name: String,
    /// Fully qualified input type, e.g. `.bank.v1.DepositRequest`
    pub input_type: String,
    /// Fully qualified output type
    pub output_type: String,
    /// Requests are streamed
    pub client_streaming: bool,
    /// Responses are streamed
    pub server_streaming: bool,
}

impl MethodUnit {
    /// The code shape this method is generated with.
    pub fn shape(&self) -> StreamingShape {
        StreamingShape::from_flags(self.client_streaming, self.server_streaming)
    }

    fn from_proto(file: &str, proto: &MethodDescriptorProto) -> Result<Self> {
        let name = proto.name().to_string();
        check_identifier("method", &name, file)?;
        Ok(Self {
            name,
            input_type: proto.input_type().to_string(),
            output_type: proto.output_type().to_string(),
            client_streaming: proto.client_streaming(),
            server_streaming: proto.server_streaming(),
        })
    }
}

/// A named group of remote methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceUnit {
    /// Service name as declared
    pub name: String,
    /// Methods in declared order
    pub methods: Vec<MethodUnit>,
}

impl ServiceUnit {
    fn from_proto(file: &str, proto: &ServiceDescriptorProto) -> Result<Self> {
        let name = proto.name().to_string();
        check_identifier("service", &name, file)?;
        let methods = proto
            .method
            .iter()
            .map(|m| MethodUnit::from_proto(file, m))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { name, methods })
    }
}

/// A protocol file and everything the generator needs from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUnit {
    /// Path of the file as known to protoc, e.g. `bank/bank.proto`
    pub name: String,
    /// Declared package, `None` when absent or empty
    pub package: Option<String>,
    /// Direct imports, as file names
    pub dependencies: Vec<String>,
    /// Services in declared order
    pub services: Vec<ServiceUnit>,
    /// Top-level message and enum names declared by the file
    pub type_names: BTreeSet<String>,
    /// Top-level messages that own nested types or oneofs, and so get a
    /// companion module in prost's output
    pub scoped_messages: BTreeSet<String>,
}

impl FileUnit {
    /// Project a raw file descriptor.
    pub fn from_proto(proto: &FileDescriptorProto) -> Result<Self> {
        let name = proto
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .ok_or(DescriptorError::MissingField { context: "file".to_string(), field: "name" })?;
        let package = proto.package.clone().filter(|p| !p.is_empty());
        let services = proto
            .service
            .iter()
            .map(|s| ServiceUnit::from_proto(&name, s))
            .collect::<Result<Vec<_>>>()?;
        let type_names = proto
            .message_type
            .iter()
            .map(|m| m.name().to_string())
            .chain(proto.enum_type.iter().map(|e| e.name().to_string()))
            .collect();
        let scoped_messages = proto
            .message_type
            .iter()
            .filter(|m| !m.nested_type.is_empty() || !m.enum_type.is_empty() || !m.oneof_decl.is_empty())
            .map(|m| m.name().to_string())
            .collect();

        Ok(Self {
            name,
            package,
            dependencies: proto.dependency.clone(),
            services,
            type_names,
            scoped_messages,
        })
    }

    /// Whether the file declares any service.
    pub fn has_services(&self) -> bool { !self.services.is_empty() }

    /// Services in declared order.
    pub fn services(&self) -> &[ServiceUnit] { &self.services }

    /// Declared package, empty when absent.
    pub fn package(&self) -> &str { self.package.as_deref().unwrap_or_default() }

    /// The package used to decide whether a type reference is local.
    ///
    /// A file that declares services but no package cannot tell its own
    /// types from foreign ones once any input type carries a package
    /// component, so that combination is rejected.
    pub fn package_for_decomposition(&self) -> Result<&str> {
        if let Some(package) = &self.package {
            return Ok(package);
        }
        let needs_package = self
            .services
            .iter()
            .flat_map(|s| s.methods.iter())
            .any(|m| m.input_type.trim_start_matches('.').contains('.'));
        if needs_package {
            Err(DescriptorError::MissingPackage(self.name.clone()))
        } else {
            Ok("")
        }
    }

    /// All methods of all services, in declared order.
    pub fn methods(&self) -> impl Iterator<Item = (&ServiceUnit, &MethodUnit)> {
        self.services.iter().flat_map(|s| s.methods.iter().map(move |m| (s, m)))
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap_or_else(|e| panic!("invalid regex: {e}"))
    })
}

fn check_identifier(kind: &'static str, name: &str, file: &str) -> Result<()> {
    if identifier_pattern().is_match(name) {
        Ok(())
    } else {
        Err(DescriptorError::InvalidIdentifier {
            kind,
            name: name.to_string(),
            file: file.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_table() {
        assert_eq!(StreamingShape::from_flags(false, false), StreamingShape::Unary);
        assert_eq!(StreamingShape::from_flags(true, false), StreamingShape::ClientStream);
        assert_eq!(StreamingShape::from_flags(false, true), StreamingShape::ServerStream);
        assert_eq!(StreamingShape::from_flags(true, true), StreamingShape::Bidirectional);
    }

    #[test]
    fn test_check_identifier() {
        assert!(check_identifier("service", "Bank", "a.proto").is_ok());
        assert!(check_identifier("service", "_private2", "a.proto").is_ok());
        assert!(check_identifier("service", "2fast", "a.proto").is_err());
        assert!(check_identifier("method", "get-value", "a.proto").is_err());
        assert!(check_identifier("method", "", "a.proto").is_err());
    }
}
