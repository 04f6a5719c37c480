use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use litsift_core::text_utils::YEAR_RE;
use litsift_core::{FieldValue, MetadataRecord, NO_DESCRIPTION, UNKNOWN};

use crate::config::ParsingConfig;

/// A metadata field pulled out of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Authors,
    Identifier,
    Publisher,
    Year,
    Description,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Authors,
        Field::Identifier,
        Field::Publisher,
        Field::Year,
        Field::Description,
    ];

    pub fn default_value(&self) -> &'static str {
        match self {
            Field::Description => NO_DESCRIPTION,
            _ => UNKNOWN,
        }
    }

    fn index(&self) -> usize {
        match self {
            Field::Authors => 0,
            Field::Identifier => 1,
            Field::Publisher => 2,
            Field::Year => 3,
            Field::Description => 4,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Authors => "authors",
            Field::Identifier => "identifier",
            Field::Publisher => "publisher",
            Field::Year => "year",
            Field::Description => "description",
        })
    }
}

/// A regex plus the capture group holding the field value.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    pub regex: Regex,
    pub group: usize,
}

impl FieldPattern {
    pub fn new(pattern: &str, group: usize) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            group,
        })
    }

    /// Trimmed capture, if the pattern matches with a non-empty group.
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .captures(text)
            .and_then(|c| c.get(self.group))
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
    }
}

fn pattern(re: &str, group: usize) -> FieldPattern {
    FieldPattern {
        regex: Regex::new(re).unwrap(),
        group,
    }
}

static AUTHOR_PATTERNS: Lazy<Vec<FieldPattern>> = Lazy::new(|| {
    vec![pattern(
        r"(?s)Author:\s*(.+?)\s*(?:Subject:|Is Part Of:|Description:|$)",
        1,
    )]
});

static IDENTIFIER_PATTERNS: Lazy<Vec<FieldPattern>> =
    Lazy::new(|| vec![pattern(r#"(10\.\d{4,9}/[^\s";]+)"#, 1)]);

static PUBLISHER_PATTERNS: Lazy<Vec<FieldPattern>> =
    Lazy::new(|| vec![pattern(r"Publisher:\s*(.+)", 1)]);

static YEAR_PATTERNS: Lazy<Vec<FieldPattern>> = Lazy::new(|| {
    vec![FieldPattern {
        regex: Regex::clone(&YEAR_RE),
        group: 1,
    }]
});

static DESCRIPTION_PATTERNS: Lazy<Vec<FieldPattern>> = Lazy::new(|| {
    vec![pattern(
        r"(?s)(Description|Abstract):\s*(.+?)(?:\n[A-Z][a-z]+:|$)",
        2,
    )]
});

/// Built-in pattern chain for `field`.
pub fn default_patterns(field: Field) -> &'static [FieldPattern] {
    match field {
        Field::Authors => &AUTHOR_PATTERNS,
        Field::Identifier => &IDENTIFIER_PATTERNS,
        Field::Publisher => &PUBLISHER_PATTERNS,
        Field::Year => &YEAR_PATTERNS,
        Field::Description => &DESCRIPTION_PATTERNS,
    }
}

/// Run an ordered chain: first non-empty capture wins, else `default`.
pub fn extract_field(text: &str, patterns: &[FieldPattern], default: &str) -> FieldValue {
    patterns
        .iter()
        .enumerate()
        .find_map(|(i, p)| p.capture(text).map(|v| FieldValue::matched(v, i)))
        .unwrap_or_else(|| FieldValue::default_value(default))
}

/// All five fields of one entry, each with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    pub authors: FieldValue,
    pub identifier: FieldValue,
    pub publisher: FieldValue,
    pub year: FieldValue,
    pub description: FieldValue,
}

impl ExtractedFields {
    pub fn get(&self, field: Field) -> &FieldValue {
        match field {
            Field::Authors => &self.authors,
            Field::Identifier => &self.identifier,
            Field::Publisher => &self.publisher,
            Field::Year => &self.year,
            Field::Description => &self.description,
        }
    }

    pub fn into_record(self, rank: usize, score: usize) -> MetadataRecord {
        MetadataRecord {
            rank,
            score,
            authors: self.authors.value,
            identifier: self.identifier.value,
            publisher: self.publisher.value,
            year: self.year.value,
            description: self.description.value,
        }
    }
}

/// How many extracted values fell back to their default, per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    pub records: usize,
    defaults: [usize; 5],
}

impl ExtractionReport {
    pub fn record(&mut self, fields: &ExtractedFields) {
        self.records += 1;
        for field in Field::ALL {
            if fields.get(field).is_default() {
                self.defaults[field.index()] += 1;
            }
        }
    }

    pub fn defaults(&self, field: Field) -> usize {
        self.defaults[field.index()]
    }

    pub fn total_defaults(&self) -> usize {
        self.defaults.iter().sum()
    }
}

/// Field extraction with pattern chains resolved from a [`ParsingConfig`].
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    chains: [Vec<FieldPattern>; 5],
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::with_config(&ParsingConfig::default())
    }
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &ParsingConfig) -> Self {
        let chains =
            Field::ALL.map(|field| config.field_patterns(field).resolve(default_patterns(field)));
        Self { chains }
    }

    pub fn patterns(&self, field: Field) -> &[FieldPattern] {
        &self.chains[field.index()]
    }

    pub fn extract(&self, field: Field, text: &str) -> FieldValue {
        extract_field(text, self.patterns(field), field.default_value())
    }

    pub fn extract_fields(&self, text: &str) -> ExtractedFields {
        ExtractedFields {
            authors: self.extract(Field::Authors, text),
            identifier: self.extract(Field::Identifier, text),
            publisher: self.extract(Field::Publisher, text),
            year: self.extract(Field::Year, text),
            description: self.extract(Field::Description, text),
        }
    }
}
