use serde::Serialize;

use crate::derive::{DerivationConfig, DerivedFieldExtractor, TechniqueTag};
use crate::matching::{MatchConfig, match_all};
use crate::text_utils::truncate_chars;
use crate::{EnrichedRecord, MetadataRecord, RawDocument};

/// One point of the privacy/accuracy trade-off: ε-like parameter against
/// reported accuracy in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrivacyAccuracyPoint {
    pub label: String,
    pub epsilon: f64,
    pub accuracy: f64,
}

/// Aggregate statistics over one enrichment run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisStats {
    /// Records loaded from the ranking output.
    pub loaded: usize,
    /// Records dropped because neither matching phase found them.
    pub unmatched: usize,
    /// Enriched records.
    pub total: usize,
    /// Tag → number of records mentioning it, most frequent first (declared
    /// order on ties). Tags never seen are omitted.
    pub technique_counts: Vec<(TechniqueTag, usize)>,
    /// Records with at least one compliance tag.
    pub compliant: usize,
    /// `compliant / total` in percent; 0 when there are no records.
    pub compliance_rate: f64,
    /// Accuracy captures that matched a pattern but were not numbers.
    pub malformed_accuracy: usize,
    pub privacy_accuracy: Vec<PrivacyAccuracyPoint>,
}

impl AnalysisStats {
    pub fn from_records(records: &[EnrichedRecord]) -> Self {
        let mut technique_counts: Vec<(TechniqueTag, usize)> = TechniqueTag::ALL
            .iter()
            .map(|tag| {
                let n = records
                    .iter()
                    .filter(|r| r.derived.techniques.contains(*tag))
                    .count();
                (*tag, n)
            })
            .filter(|(_, n)| *n > 0)
            .collect();
        technique_counts.sort_by(|a, b| b.1.cmp(&a.1));

        let compliant = records
            .iter()
            .filter(|r| !r.derived.compliance.is_empty())
            .count();
        let compliance_rate = if records.is_empty() {
            0.0
        } else {
            compliant as f64 / records.len() as f64 * 100.0
        };

        let privacy_accuracy = records
            .iter()
            .filter_map(|r| {
                let accuracy = r.derived.accuracy.percent()?;
                let epsilon = r.derived.privacy_level.value.parse::<f64>().ok()?;
                Some(PrivacyAccuracyPoint {
                    label: truncate_chars(&r.record().authors, 20).to_string(),
                    epsilon,
                    accuracy,
                })
            })
            .collect();

        Self {
            loaded: records.len(),
            unmatched: 0,
            total: records.len(),
            technique_counts,
            compliant,
            compliance_rate,
            malformed_accuracy: records
                .iter()
                .filter(|r| r.derived.accuracy.is_malformed())
                .count(),
            privacy_accuracy,
        }
    }
}

/// Output of [`Enricher::enrich`].
#[derive(Debug, Clone, Default)]
pub struct EnrichmentRun {
    /// Enriched records, highest score first.
    pub records: Vec<EnrichedRecord>,
    /// Records that could not be located in the document.
    pub unmatched: Vec<MetadataRecord>,
    pub stats: AnalysisStats,
}

/// Matches loaded records against a document and derives fields for each
/// match.
#[derive(Debug, Clone, Default)]
pub struct Enricher {
    match_config: MatchConfig,
    deriver: DerivedFieldExtractor,
}

impl Enricher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(match_config: MatchConfig, derivation: DerivationConfig) -> Self {
        Self {
            match_config,
            deriver: DerivedFieldExtractor::with_config(derivation),
        }
    }

    pub fn match_config(&self) -> &MatchConfig {
        &self.match_config
    }

    pub fn deriver(&self) -> &DerivedFieldExtractor {
        &self.deriver
    }

    pub fn enrich(&self, records: &[MetadataRecord], document: &RawDocument) -> EnrichmentRun {
        let outcome = match_all(records, document, &self.match_config);

        let mut enriched: Vec<EnrichedRecord> = outcome
            .matched
            .into_iter()
            .map(|article| {
                let derived = self.deriver.derive(&article.text, &article.record);
                EnrichedRecord { article, derived }
            })
            .collect();
        enriched.sort_by(|a, b| b.record().score.cmp(&a.record().score));

        let mut stats = AnalysisStats::from_records(&enriched);
        stats.loaded = records.len();
        stats.unmatched = outcome.unmatched.len();

        tracing::info!(
            enriched = stats.total,
            unmatched = stats.unmatched,
            malformed_accuracy = stats.malformed_accuracy,
            "enrichment complete"
        );

        EnrichmentRun {
            records: enriched,
            unmatched: outcome.unmatched,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Accuracy, UNKNOWN};

    fn record(rank: usize, score: usize, authors: &str, doi: &str) -> MetadataRecord {
        MetadataRecord {
            rank,
            score,
            authors: authors.to_string(),
            identifier: doi.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_enrich_sorts_by_score_and_counts_drops() {
        let records = vec![
            record(1, 5, "Low, A.", "10.1000/low"),
            record(2, 9, "High, B.", "10.1000/high"),
            record(3, 7, "Lost, C.", UNKNOWN),
        ];
        let doc = RawDocument::new(vec![
            "10.1000/low differential privacy with epsilon = 0.1, accuracy: 90%".into(),
            "10.1000/high GDPR compliant HE scheme, 0.95 accuracy".into(),
        ]);

        let run = Enricher::new().enrich(&records, &doc);
        assert_eq!(run.records.len(), 2);
        assert_eq!(run.records[0].record().authors, "High, B.");
        assert_eq!(run.records[1].record().authors, "Low, A.");
        assert_eq!(run.unmatched.len(), 1);
        assert_eq!(run.stats.loaded, 3);
        assert_eq!(run.stats.unmatched, 1);

        let low = &run.records[1].derived;
        assert_eq!(low.privacy_level.value, "0.1");
        assert_eq!(low.accuracy, Accuracy::Stated("90%".into()));

        let high = &run.records[0].derived;
        assert_eq!(high.accuracy, Accuracy::Stated("95.00%".into()));
        assert_eq!(high.compliance.to_string(), "GDPR");
    }

    #[test]
    fn test_stats_on_empty_input() {
        let stats = AnalysisStats::from_records(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.compliance_rate, 0.0);
        assert!(stats.technique_counts.is_empty());
    }

    #[test]
    fn test_stats_count_techniques_and_compliance() {
        let records = vec![
            record(1, 3, "A", "10.1/a"),
            record(2, 2, "B", "10.1/b"),
        ];
        let doc = RawDocument::new(vec![
            "10.1/a blockchain ledger and differential privacy".into(),
            "10.1/b blockchain only, regulatory standard".into(),
        ]);
        let run = Enricher::new().enrich(&records, &doc);
        assert_eq!(
            run.stats.technique_counts,
            vec![(TechniqueTag::Blockchain, 2), (TechniqueTag::Dp, 1)]
        );
        assert_eq!(run.stats.compliant, 1);
        assert!((run.stats.compliance_rate - 50.0).abs() < f64::EPSILON);
    }
}
