//! Identifier rules shared with prost and tonic.
//!
//! Generated code refers to types and clients that prost-build and
//! tonic-build emit, so every name here must be spelled exactly the way
//! those generators spell it.

use config::ReservedNames;
use heck::{ToSnakeCase, ToUpperCamelCase};

/// Type name as prost emits it, e.g. `deposit_request` -> `DepositRequest`.
pub fn upper_camel(name: &str, reserved: &ReservedNames) -> String {
    reserved.escape(&name.to_upper_camel_case())
}

/// Snake-case identifier with keyword escaping, as prost spells methods,
/// fields and package modules.
pub fn snake(name: &str, reserved: &ReservedNames) -> String {
    reserved.escape(&name.to_snake_case())
}

/// Snake case without escaping, for building longer compound names.
pub fn snake_fragment(name: &str) -> String { name.to_snake_case() }

/// tonic's module name for a service: an underscore before every
/// uppercase letter that is not the first character.
///
/// Differs from [`snake`] for acronyms, `HTTPGateway` -> `h_t_t_p_gateway`.
pub fn tonic_module(service: &str) -> String {
    let mut out = String::with_capacity(service.len() + 4);
    let mut chars = service.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c.to_ascii_lowercase());
        if chars.peek().is_some_and(|next| next.is_uppercase()) {
            out.push('_');
        }
    }
    out
}

/// Subcommand name for a service or method.
pub fn command_name(name: &str) -> String { name.to_lowercase() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_camel() {
        let reserved = ReservedNames::rust();
        assert_eq!(upper_camel("deposit_request", &reserved), "DepositRequest");
        assert_eq!(upper_camel("GetRequest", &reserved), "GetRequest");
        assert_eq!(upper_camel("self", &reserved), "Self_");
    }

    #[test]
    fn test_snake_escapes_keywords() {
        let reserved = ReservedNames::rust();
        assert_eq!(snake("GetBalance", &reserved), "get_balance");
        assert_eq!(snake("Type", &reserved), "r#type");
        assert_eq!(snake("Self", &reserved), "self_");
        assert_eq!(snake("MultiGet", &reserved), "multi_get");
    }

    #[test]
    fn test_tonic_module() {
        assert_eq!(tonic_module("Bank"), "bank");
        assert_eq!(tonic_module("KeyValueStore"), "key_value_store");
        assert_eq!(tonic_module("HTTPGateway"), "h_t_t_p_gateway");
    }

    #[test]
    fn test_command_name() {
        assert_eq!(command_name("MultiGet"), "multiget");
        assert_eq!(command_name("Bank"), "bank");
    }
}
