//! Reserved identifiers of the generated language.

use std::collections::BTreeSet;

/// Keywords that may be written as raw identifiers (`r#type`).
const RAW_KEYWORDS: &[&str] = &[
    // 2015 strict keywords
    "as", "break", "const", "continue", "else", "enum", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct",
    "trait", "true", "type", "unsafe", "use", "where", "while",
    // 2018 strict keywords
    "dyn",
    // reserved keywords
    "abstract", "become", "box", "do", "final", "macro", "override", "priv", "typeof", "unsized",
    "virtual", "yield", "async", "await", "try",
];

/// Keywords that cannot be raw identifiers and are suffixed with `_` instead.
const SUFFIX_KEYWORDS: &[&str] = &["self", "super", "extern", "crate", "Self"];

/// Immutable reserved-name table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedNames {
    raw: BTreeSet<&'static str>,
    suffixed: BTreeSet<&'static str>,
}

impl ReservedNames {
    /// The Rust keyword table.
    pub fn rust() -> Self {
        Self {
            raw: RAW_KEYWORDS.iter().copied().collect(),
            suffixed: SUFFIX_KEYWORDS.iter().copied().collect(),
        }
    }

    /// Whether `name` cannot be used verbatim as an identifier.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.raw.contains(name) || self.suffixed.contains(name)
    }

    /// Escape `name` so it is a usable identifier: `r#name` where Rust allows
    /// raw identifiers, `name_` otherwise.
    pub fn escape(&self, name: &str) -> String {
        if self.raw.contains(name) {
            format!("r#{name}")
        } else if self.suffixed.contains(name) {
            format!("{name}_")
        } else {
            name.to_string()
        }
    }

    /// Every reserved word.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.raw.iter().chain(self.suffixed.iter()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        let reserved = ReservedNames::rust();
        assert_eq!(reserved.escape("type"), "r#type");
        assert_eq!(reserved.escape("self"), "self_");
        assert_eq!(reserved.escape("deposit"), "deposit");
        assert!(reserved.is_reserved("async"));
        assert!(!reserved.is_reserved("clap"));
    }
}
