//! Fields inferred from an article's full text: technique tags, compliance
//! tags, reported accuracy, privacy parameter and publication year.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::text_utils::extract_year;
use crate::{FieldValue, MetadataRecord};

/// Rendered when no accuracy pattern matches.
pub const ACCURACY_NOT_STATED: &str = "Not stated";
/// Privacy level assumed for DP studies that state no parameter.
pub const DEFAULT_DP_PRIVACY_LEVEL: &str = "1.0";
/// Privacy level assumed for non-DP studies that state no parameter.
pub const DEFAULT_NON_DP_PRIVACY_LEVEL: &str = "10.0";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeriveError {
    #[error("accuracy pattern matched but captured {raw:?}, which is not a number")]
    MalformedAccuracy { raw: String },
}

/// Privacy-preserving mechanism named in an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TechniqueTag {
    Dp,
    He,
    Smpc,
    Tee,
    Blockchain,
    Hybrid,
}

impl TechniqueTag {
    /// All tags in declared (output) order.
    pub const ALL: [TechniqueTag; 6] = [
        TechniqueTag::Dp,
        TechniqueTag::He,
        TechniqueTag::Smpc,
        TechniqueTag::Tee,
        TechniqueTag::Blockchain,
        TechniqueTag::Hybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TechniqueTag::Dp => "DP",
            TechniqueTag::He => "HE",
            TechniqueTag::Smpc => "SMPC",
            TechniqueTag::Tee => "TEE",
            TechniqueTag::Blockchain => "Blockchain",
            TechniqueTag::Hybrid => "Hybrid",
        }
    }
}

impl fmt::Display for TechniqueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Regulatory regime referenced in an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ComplianceTag {
    Gdpr,
    Hipaa,
    Generic,
}

impl ComplianceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceTag::Gdpr => "GDPR",
            ComplianceTag::Hipaa => "HIPAA",
            ComplianceTag::Generic => "Generic",
        }
    }
}

impl fmt::Display for ComplianceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn join_or_none<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    if items.is_empty() {
        return f.write_str("None");
    }
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Technique tags in declared order; renders as `"DP, HE"` or `"None"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TechniqueSet(pub Vec<TechniqueTag>);

impl TechniqueSet {
    pub fn contains(&self, tag: TechniqueTag) -> bool {
        self.0.contains(&tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TechniqueTag> {
        self.0.iter()
    }
}

impl fmt::Display for TechniqueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        join_or_none(f, &self.0)
    }
}

/// Compliance tags in GDPR, HIPAA, Generic order; renders as `"GDPR, HIPAA"`
/// or `"None"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceSet(pub Vec<ComplianceTag>);

impl ComplianceSet {
    pub fn contains(&self, tag: ComplianceTag) -> bool {
        self.0.contains(&tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ComplianceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        join_or_none(f, &self.0)
    }
}

/// Reported accuracy of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Accuracy {
    /// Percentage string such as `"92.50%"`.
    Stated(String),
    NotStated,
    /// A pattern matched but the capture could not be read as a number.
    Malformed { raw: String },
}

impl Accuracy {
    /// Numeric percentage, if stated.
    pub fn percent(&self) -> Option<f64> {
        match self {
            Accuracy::Stated(s) => s.trim_end_matches('%').parse().ok(),
            _ => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Accuracy::Malformed { .. })
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accuracy::Stated(s) => f.write_str(s),
            Accuracy::NotStated => f.write_str(ACCURACY_NOT_STATED),
            Accuracy::Malformed { raw } => write!(f, "Malformed ({})", raw),
        }
    }
}

/// A regex plus the capture group holding the number.
#[derive(Debug, Clone)]
pub struct NumericPattern {
    pub regex: Regex,
    pub group: usize,
}

impl NumericPattern {
    pub fn new(pattern: &str, group: usize) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            group,
        })
    }

    fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .captures(text)
            .and_then(|c| c.get(self.group))
            .map(|m| m.as_str())
    }
}

fn numeric(pattern: &str, group: usize) -> NumericPattern {
    NumericPattern {
        regex: Regex::new(pattern).unwrap(),
        group,
    }
}

static DEFAULT_TECHNIQUES: Lazy<Vec<(TechniqueTag, Regex)>> = Lazy::new(|| {
    vec![
        (TechniqueTag::Dp, r"(?i)differential privacy|dp\b"),
        (TechniqueTag::He, r"(?i)homomorphic encryption|he\b"),
        (
            TechniqueTag::Smpc,
            r"(?i)secure multi[\s-]party computation|smpc",
        ),
        (TechniqueTag::Tee, r"(?i)trusted execution environment|tee\b"),
        (TechniqueTag::Blockchain, r"(?i)blockchain"),
        (TechniqueTag::Hybrid, r"(?i)hybrid"),
    ]
    .into_iter()
    .map(|(tag, p)| (tag, Regex::new(p).unwrap()))
    .collect()
});

fn phrases(list: &[&str]) -> Vec<Regex> {
    list.iter().map(|p| Regex::new(p).unwrap()).collect()
}

static GDPR_PHRASES: Lazy<Vec<Regex>> = Lazy::new(|| {
    phrases(&[
        r"gdpr",
        r"general data protection regulation",
        r"eu data protection",
        r"regulation 2016/679",
        r"european privacy law",
    ])
});

static HIPAA_PHRASES: Lazy<Vec<Regex>> = Lazy::new(|| {
    phrases(&[
        r"hipaa",
        r"health insurance portability and accountability act",
        r"us health privacy law",
        r"hitech act",
        r"protected health information",
    ])
});

static GENERIC_PHRASES: Lazy<Vec<Regex>> = Lazy::new(|| {
    phrases(&[
        r"data protection law",
        r"privacy regulation",
        r"compliant with",
        r"legal requirement",
        r"regulatory standard",
    ])
});

static ACCURACY_PATTERNS: Lazy<Vec<NumericPattern>> = Lazy::new(|| {
    vec![
        // "accuracy: 93.22%"
        numeric(r"(?i)(accuracy|auc|f1)[\s:]*([0-9]{1,3}(?:\.\d+)?%)", 2),
        // "93% accuracy"
        numeric(r"(?i)([0-9]{1,3}(?:\.\d+)?%)\s*(accuracy|auc|f1)", 1),
        // "accuracy = 0.93"
        numeric(r"(?i)(accuracy|auc|f1)\s*[:=]\s*([0-9.]+)", 2),
        // "0.93 accuracy"
        numeric(r"(?i)([0-9]{1,3}(?:\.\d+)?)\s*(accuracy|auc|f1)", 1),
    ]
});

static PRIVACY_PATTERNS: Lazy<Vec<NumericPattern>> = Lazy::new(|| {
    vec![
        // "ε = 1.0"
        numeric(
            r"(?i)(privacy budget|ε|epsilon|noise scale|privacy parameter)[\s:=]+([0-9.]+)",
            2,
        ),
        // "1.0 epsilon"
        numeric(
            r"(?i)(\b[0-9.]+)\s*(privacy budget|ε|epsilon|noise scale)",
            1,
        ),
    ]
});

/// Pattern tables used by [`DerivedFieldExtractor`].
///
/// Compliance phrases are matched against lower-cased text.
#[derive(Debug, Clone)]
pub struct DerivationConfig {
    pub(crate) techniques: Vec<(TechniqueTag, Regex)>,
    pub(crate) gdpr_phrases: Vec<Regex>,
    pub(crate) hipaa_phrases: Vec<Regex>,
    pub(crate) generic_phrases: Vec<Regex>,
    pub(crate) accuracy_patterns: Vec<NumericPattern>,
    pub(crate) privacy_patterns: Vec<NumericPattern>,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            techniques: DEFAULT_TECHNIQUES.clone(),
            gdpr_phrases: GDPR_PHRASES.clone(),
            hipaa_phrases: HIPAA_PHRASES.clone(),
            generic_phrases: GENERIC_PHRASES.clone(),
            accuracy_patterns: ACCURACY_PATTERNS.clone(),
            privacy_patterns: PRIVACY_PATTERNS.clone(),
        }
    }
}

impl DerivationConfig {
    /// Replace the detection pattern for one technique tag. Output order is
    /// unaffected.
    pub fn with_technique_pattern(
        mut self,
        tag: TechniqueTag,
        pattern: &str,
    ) -> Result<Self, regex::Error> {
        let re = Regex::new(pattern)?;
        match self.techniques.iter_mut().find(|(t, _)| *t == tag) {
            Some(slot) => slot.1 = re,
            None => {
                self.techniques.push((tag, re));
                self.techniques.sort_by_key(|(t, _)| *t);
            }
        }
        Ok(self)
    }

    /// Add a phrase to one compliance phrase set.
    pub fn with_compliance_phrase(
        mut self,
        tag: ComplianceTag,
        phrase: &str,
    ) -> Result<Self, regex::Error> {
        let re = Regex::new(phrase)?;
        match tag {
            ComplianceTag::Gdpr => self.gdpr_phrases.push(re),
            ComplianceTag::Hipaa => self.hipaa_phrases.push(re),
            ComplianceTag::Generic => self.generic_phrases.push(re),
        }
        Ok(self)
    }

    /// Replace the ordered accuracy pattern chain.
    pub fn with_accuracy_patterns(mut self, patterns: Vec<NumericPattern>) -> Self {
        self.accuracy_patterns = patterns;
        self
    }

    /// Replace the ordered privacy-parameter pattern chain.
    pub fn with_privacy_patterns(mut self, patterns: Vec<NumericPattern>) -> Self {
        self.privacy_patterns = patterns;
        self
    }

    pub fn accuracy_patterns(&self) -> &[NumericPattern] {
        &self.accuracy_patterns
    }

    pub fn privacy_patterns(&self) -> &[NumericPattern] {
        &self.privacy_patterns
    }
}

/// Everything inferred from one matched article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedFields {
    pub techniques: TechniqueSet,
    pub compliance: ComplianceSet,
    pub accuracy: Accuracy,
    pub privacy_level: FieldValue,
    pub year: FieldValue,
}

/// Infers technique, compliance, accuracy, privacy and year fields from text.
#[derive(Debug, Clone, Default)]
pub struct DerivedFieldExtractor {
    config: DerivationConfig,
}

impl DerivedFieldExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DerivationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DerivationConfig {
        &self.config
    }

    /// Every technique whose pattern matches, in declared order.
    pub fn detect_techniques(&self, text: &str) -> TechniqueSet {
        TechniqueSet(
            self.config
                .techniques
                .iter()
                .filter(|(_, re)| re.is_match(text))
                .map(|(tag, _)| *tag)
                .collect(),
        )
    }

    /// GDPR and HIPAA are tested independently; Generic only when neither
    /// fired.
    pub fn detect_compliance(&self, text: &str) -> ComplianceSet {
        fn any(set: &[Regex], text: &str) -> bool {
            set.iter().any(|re| re.is_match(text))
        }

        let text = text.to_lowercase();
        let mut tags = Vec::new();
        if any(&self.config.gdpr_phrases, &text) {
            tags.push(ComplianceTag::Gdpr);
        }
        if any(&self.config.hipaa_phrases, &text) {
            tags.push(ComplianceTag::Hipaa);
        }
        if tags.is_empty() && any(&self.config.generic_phrases, &text) {
            tags.push(ComplianceTag::Generic);
        }
        ComplianceSet(tags)
    }

    /// First matching accuracy pattern, normalised to a percentage.
    ///
    /// `Ok(None)` means no pattern matched. A capture without `%` is read as
    /// a fraction and rescaled; if it does not parse, the match is reported
    /// as [`DeriveError::MalformedAccuracy`] rather than treated as absent.
    pub fn extract_accuracy(&self, text: &str) -> Result<Option<FieldValue>, DeriveError> {
        for (i, pattern) in self.config.accuracy_patterns.iter().enumerate() {
            let Some(raw) = pattern.capture(text) else {
                continue;
            };
            if raw.ends_with('%') {
                return Ok(Some(FieldValue::matched(raw, i)));
            }
            return match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Some(FieldValue::matched(
                    format!("{:.2}%", v * 100.0),
                    i,
                ))),
                _ => Err(DeriveError::MalformedAccuracy {
                    raw: raw.to_string(),
                }),
            };
        }
        Ok(None)
    }

    /// First matching privacy-parameter capture, or the DP-dependent default.
    pub fn extract_privacy_level(&self, text: &str, techniques: &TechniqueSet) -> FieldValue {
        self.config
            .privacy_patterns
            .iter()
            .enumerate()
            .find_map(|(i, p)| p.capture(text).map(|raw| FieldValue::matched(raw, i)))
            .unwrap_or_else(|| {
                if techniques.contains(TechniqueTag::Dp) {
                    FieldValue::default_value(DEFAULT_DP_PRIVACY_LEVEL)
                } else {
                    FieldValue::default_value(DEFAULT_NON_DP_PRIVACY_LEVEL)
                }
            })
    }

    /// Derive all fields from `text`, taking the year fallback from `record`.
    pub fn derive(&self, text: &str, record: &MetadataRecord) -> DerivedFields {
        let techniques = self.detect_techniques(text);
        let compliance = self.detect_compliance(text);

        let accuracy = match self.extract_accuracy(text) {
            Ok(Some(v)) => Accuracy::Stated(v.value),
            Ok(None) => Accuracy::NotStated,
            Err(DeriveError::MalformedAccuracy { raw }) => {
                tracing::warn!(authors = %record.authors, raw = %raw, "malformed accuracy capture");
                Accuracy::Malformed { raw }
            }
        };

        let privacy_level = self.extract_privacy_level(text, &techniques);

        let year = match extract_year(text) {
            Some(y) => FieldValue::matched(y, 0),
            None => FieldValue::default_value(record.year.clone()),
        };

        DerivedFields {
            techniques,
            compliance,
            accuracy,
            privacy_level,
            year,
        }
    }
}
