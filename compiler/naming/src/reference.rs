//! Decomposition of dotted protobuf type paths.

use config::ReservedNames;

use crate::{ident, NamingError, Result};

/// Suffix appended to the alias of a foreign package.
pub const PACKAGE_ALIAS_SUFFIX: &str = "_pb";

/// A message type reference split into package and type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference {
    /// Nominal alias of the package, empty for the file's own package
    pub alias: String,
    /// Dotted package, empty when the reference carries none
    pub package: String,
    /// Type name as prost spells it
    pub type_name: String,
}

impl TypeReference {
    /// Decompose `raw` (e.g. `.cache.v2.sub.GetRequest`) as seen from a file
    /// in `file_package`.
    pub fn decompose(raw: &str, file_package: &str, reserved: &ReservedNames) -> Result<Self> {
        let trimmed = raw.strip_prefix('.').unwrap_or(raw);
        let (package, name) = match trimmed.rsplit_once('.') {
            Some((package, name)) => (package, name),
            None => ("", trimmed),
        };
        if name.is_empty() {
            return Err(NamingError::EmptyTypeName(raw.to_string()));
        }

        let alias = if package.is_empty() || package == file_package {
            String::new()
        } else {
            package_alias(package)
        };
        Ok(Self {
            alias,
            package: package.to_string(),
            type_name: ident::upper_camel(name, reserved),
        })
    }

    /// Whether the reference points outside the file's package.
    pub fn is_foreign(&self) -> bool { !self.alias.is_empty() }
}

/// `cache.v2.sub` -> `cache_v2_sub_pb`.
pub fn package_alias(package: &str) -> String {
    format!("{}{PACKAGE_ALIAS_SUFFIX}", package.replace('.', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decompose(raw: &str, package: &str) -> Result<TypeReference> {
        TypeReference::decompose(raw, package, &ReservedNames::rust())
    }

    #[test]
    fn test_same_package() {
        let reference = decompose(".bank.v1.DepositRequest", "bank.v1").unwrap();
        assert_eq!(reference.alias, "");
        assert_eq!(reference.package, "bank.v1");
        assert_eq!(reference.type_name, "DepositRequest");
        assert!(!reference.is_foreign());
    }

    #[test]
    fn test_foreign_package() {
        let reference = decompose(".cache.v2.sub.GetRequest", "bank.v1").unwrap();
        assert_eq!(reference.alias, "cache_v2_sub_pb");
        assert_eq!(reference.package, "cache.v2.sub");
        assert_eq!(reference.type_name, "GetRequest");
        assert!(reference.is_foreign());
    }

    #[test]
    fn test_single_segment_has_no_package() {
        let reference = decompose(".Ping", "bank.v1").unwrap();
        assert_eq!(reference.alias, "");
        assert_eq!(reference.package, "");
        assert_eq!(reference.type_name, "Ping");
    }

    #[test]
    fn test_empty_type_name() {
        for raw in ["", ".", ".pkg."] {
            assert_eq!(decompose(raw, "pkg"), Err(NamingError::EmptyTypeName(raw.to_string())));
        }
    }

    #[test]
    fn test_type_name_is_camel_cased() {
        assert_eq!(decompose(".kv.get_request", "kv").unwrap().type_name, "GetRequest");
    }
}
