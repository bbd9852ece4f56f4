//! Placeholder substitution for the templates under `templates/`.
//!
//! Placeholders are written `{{NAME}}`. Upper-case names are per-item values
//! (service, method, input type); lower-case names are support package keys
//! and resolve to the alias the file binds them to.

use naming::SupportImports;

/// Values substituted into one template.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    values: Vec<(String, String)>,
}

impl Placeholders {
    /// An empty set of values
    pub fn new() -> Self { Self::default() }

    /// Placeholders for every support alias of a file.
    pub fn with_support(support: &SupportImports) -> Self {
        let mut placeholders = Self::new();
        for binding in support.iter() {
            placeholders.set(binding.key, &binding.alias);
        }
        placeholders
    }

    /// Set `{{name}}` to `value`, replacing an earlier value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        let key = format!("{{{{{name}}}}}");
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.values.push((key, value)),
        }
        self
    }

    /// Fill `template`.
    pub fn render(&self, template: &str) -> String {
        let mut out = template.to_owned();
        for (key, value) in &self.values {
            out = out.replace(key, value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_every_occurrence() {
        let mut placeholders = Placeholders::new();
        placeholders.set("SERVICE", "Bank").set("clap", "clap_1");
        assert_eq!(
            placeholders.render("{{clap}}::Command::new(\"{{SERVICE}}\") // {{SERVICE}}"),
            "clap_1::Command::new(\"Bank\") // Bank"
        );
    }

    #[test]
    fn test_set_overrides() {
        let mut placeholders = Placeholders::new();
        placeholders.set("A", "1").set("A", "2");
        assert_eq!(placeholders.render("{{A}}"), "2");
    }

    #[test]
    fn test_unknown_placeholders_are_left_alone() {
        assert_eq!(Placeholders::new().render("{{X}} {json}"), "{{X}} {json}");
    }
}
