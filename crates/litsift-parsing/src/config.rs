use regex::Regex;

use crate::fields::{Field, FieldPattern};

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// Default minimum entry length, in characters, after trimming.
pub const DEFAULT_MIN_ENTRY_LEN: usize = 300;

/// Configuration for segmentation and field extraction.
///
/// Regex fields are `Option<Regex>`; `None` means "use the built-in default".
/// Use [`ParsingConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct ParsingConfig {
    // ── section.rs ──
    /// Regex matching the start of a line that opens a new entry.
    pub(crate) boundary_re: Option<Regex>,
    /// Entries whose trimmed length does not exceed this are discarded.
    pub(crate) min_entry_len: usize,

    // ── fields.rs ──
    pub(crate) author_patterns: ListOverride<FieldPattern>,
    pub(crate) identifier_patterns: ListOverride<FieldPattern>,
    pub(crate) publisher_patterns: ListOverride<FieldPattern>,
    pub(crate) year_patterns: ListOverride<FieldPattern>,
    pub(crate) description_patterns: ListOverride<FieldPattern>,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            boundary_re: None,
            min_entry_len: DEFAULT_MIN_ENTRY_LEN,
            author_patterns: ListOverride::Default,
            identifier_patterns: ListOverride::Default,
            publisher_patterns: ListOverride::Default,
            year_patterns: ListOverride::Default,
            description_patterns: ListOverride::Default,
        }
    }
}

impl ParsingConfig {
    pub fn min_entry_len(&self) -> usize {
        self.min_entry_len
    }

    pub(crate) fn field_patterns(&self, field: Field) -> &ListOverride<FieldPattern> {
        match field {
            Field::Authors => &self.author_patterns,
            Field::Identifier => &self.identifier_patterns,
            Field::Publisher => &self.publisher_patterns,
            Field::Year => &self.year_patterns,
            Field::Description => &self.description_patterns,
        }
    }
}

/// Helper for building `ListOverride<FieldPattern>` from string patterns.
#[derive(Debug, Clone, Default)]
enum ListOverrideBuilder {
    #[default]
    Default,
    Replace(Vec<(String, usize)>),
    Extend(Vec<(String, usize)>),
}

/// Builder for [`ParsingConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in [`build()`](Self::build).
/// Fails fast with `regex::Error` if any pattern is invalid.
#[derive(Debug, Clone, Default)]
pub struct ParsingConfigBuilder {
    boundary_re: Option<String>,
    min_entry_len: Option<usize>,
    author_patterns: ListOverrideBuilder,
    identifier_patterns: ListOverrideBuilder,
    publisher_patterns: ListOverrideBuilder,
    year_patterns: ListOverrideBuilder,
    description_patterns: ListOverrideBuilder,
}

impl ParsingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Segmentation ──

    pub fn boundary_regex(mut self, pattern: &str) -> Self {
        self.boundary_re = Some(pattern.to_string());
        self
    }

    pub fn min_entry_len(mut self, len: usize) -> Self {
        self.min_entry_len = Some(len);
        self
    }

    // ── Field patterns ──

    fn slot(&mut self, field: Field) -> &mut ListOverrideBuilder {
        match field {
            Field::Authors => &mut self.author_patterns,
            Field::Identifier => &mut self.identifier_patterns,
            Field::Publisher => &mut self.publisher_patterns,
            Field::Year => &mut self.year_patterns,
            Field::Description => &mut self.description_patterns,
        }
    }

    /// Replace a field's pattern chain with `(pattern, capture group)` pairs.
    pub fn set_field_patterns(mut self, field: Field, patterns: Vec<(String, usize)>) -> Self {
        *self.slot(field) = ListOverrideBuilder::Replace(patterns);
        self
    }

    /// Append a pattern to a field's chain, after the built-in ones.
    pub fn add_field_pattern(mut self, field: Field, pattern: String, group: usize) -> Self {
        let slot = self.slot(field);
        match slot {
            ListOverrideBuilder::Extend(v) => v.push((pattern, group)),
            _ => *slot = ListOverrideBuilder::Extend(vec![(pattern, group)]),
        }
        self
    }

    /// Compile all string patterns into regexes and produce a [`ParsingConfig`].
    pub fn build(self) -> Result<ParsingConfig, regex::Error> {
        let compile_list =
            |builder: ListOverrideBuilder| -> Result<ListOverride<FieldPattern>, regex::Error> {
                let compile_all = |patterns: Vec<(String, usize)>| {
                    patterns
                        .iter()
                        .map(|(p, g)| FieldPattern::new(p, *g))
                        .collect::<Result<Vec<_>, _>>()
                };
                match builder {
                    ListOverrideBuilder::Default => Ok(ListOverride::Default),
                    ListOverrideBuilder::Replace(patterns) => {
                        Ok(ListOverride::Replace(compile_all(patterns)?))
                    }
                    ListOverrideBuilder::Extend(patterns) => {
                        Ok(ListOverride::Extend(compile_all(patterns)?))
                    }
                }
            };

        Ok(ParsingConfig {
            boundary_re: self.boundary_re.map(|p| Regex::new(&p)).transpose()?,
            min_entry_len: self.min_entry_len.unwrap_or(DEFAULT_MIN_ENTRY_LEN),
            author_patterns: compile_list(self.author_patterns)?,
            identifier_patterns: compile_list(self.identifier_patterns)?,
            publisher_patterns: compile_list(self.publisher_patterns)?,
            year_patterns: compile_list(self.year_patterns)?,
            description_patterns: compile_list(self.description_patterns)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParsingConfig::default();
        assert_eq!(config.min_entry_len, 300);
        assert!(config.boundary_re.is_none());
    }

    #[test]
    fn test_builder_basic() {
        let config = ParsingConfigBuilder::new()
            .min_entry_len(200)
            .boundary_regex(r"(?m)^[A-Z].{5,}")
            .build()
            .unwrap();
        assert_eq!(config.min_entry_len, 200);
        assert!(config.boundary_re.is_some());
    }

    #[test]
    fn test_builder_invalid_regex() {
        let result = ParsingConfigBuilder::new().boundary_regex(r"[invalid").build();
        assert!(result.is_err());

        let result = ParsingConfigBuilder::new()
            .add_field_pattern(Field::Publisher, r"(unclosed".into(), 1)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_field_patterns() {
        let config = ParsingConfigBuilder::new()
            .add_field_pattern(Field::Publisher, r"Published by\s*(.+)".into(), 1)
            .add_field_pattern(Field::Publisher, r"Press:\s*(.+)".into(), 1)
            .set_field_patterns(Field::Year, vec![(r"\b(19\d\d)\b".into(), 1)])
            .build()
            .unwrap();
        assert!(matches!(&config.publisher_patterns, ListOverride::Extend(v) if v.len() == 2));
        assert!(matches!(&config.year_patterns, ListOverride::Replace(v) if v.len() == 1));
        assert!(matches!(config.author_patterns, ListOverride::Default));
    }

    #[test]
    fn test_list_override_resolve() {
        let defaults = vec!["a".to_string(), "b".to_string()];

        let d: ListOverride<String> = ListOverride::Default;
        assert_eq!(d.resolve(&defaults), defaults);

        let r: ListOverride<String> = ListOverride::Replace(vec!["x".to_string()]);
        assert_eq!(r.resolve(&defaults), vec!["x".to_string()]);

        let e: ListOverride<String> = ListOverride::Extend(vec!["c".to_string()]);
        assert_eq!(
            e.resolve(&defaults),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }
}
