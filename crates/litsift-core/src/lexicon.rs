/// Default research-domain vocabulary: privacy-preserving federated learning
/// applied to healthcare data.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "federated learning",
    "fl",
    "differential privacy",
    "dp",
    "homomorphic encryption",
    "he",
    "secure multiparty computation",
    "smpc",
    "trusted execution environment",
    "tee",
    "shamir secret sharing",
    "blockchain",
    "quantum",
    "ring signature",
    "zero knowledge proof",
    "ehr",
    "phi",
    "hipaa",
    "gdpr",
    "medical",
    "clinical",
    "patient",
    "diagnos",
    "treatment",
    "icu",
    "x-ray",
    "ct",
    "mri",
    "wearable",
    "accuracy",
    "auc",
    "f1",
    "overhead",
    "latency",
    "scalability",
    "communication cost",
    "privacy budget",
    "epsilon",
    "computational",
    "inference attack",
    "membership attack",
    "model inversion",
    "data poisoning",
    "gradient leakage",
    "byzantine",
    "adversarial",
    "backdoor",
    "poisoning",
];

/// Immutable keyword → weight mapping used to score entries.
///
/// Keywords are stored lower-cased; empty keywords are dropped since an empty
/// needle would "occur" between every character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    entries: Vec<(String, usize)>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().copied())
    }
}

impl Lexicon {
    /// Build a lexicon where every keyword has weight 1.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_weights(keywords.into_iter().map(|k| (k, 1)))
    }

    /// Build a lexicon with explicit per-keyword weights.
    pub fn with_weights<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, usize)>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, w)| (k.as_ref().to_lowercase(), w))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lexicon_has_all_keywords() {
        let lex = Lexicon::default();
        assert_eq!(lex.len(), DEFAULT_KEYWORDS.len());
        assert!(lex.keywords().any(|k| k == "differential privacy"));
        assert!(lex.entries().iter().all(|(_, w)| *w == 1));
    }

    #[test]
    fn test_keywords_are_lowercased_and_empty_dropped() {
        let lex = Lexicon::new(["GDPR", "", "Federated Learning"]);
        let kws: Vec<&str> = lex.keywords().collect();
        assert_eq!(kws, vec!["gdpr", "federated learning"]);
    }
}
