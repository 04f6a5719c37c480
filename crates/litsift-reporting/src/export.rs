use std::io::Write;
use std::path::Path;

use serde::Serialize;

use litsift_core::text_utils::truncate_chars;
use litsift_core::{AnalysisStats, DESCRIPTION_PERSIST_CHARS, EnrichedRecord, MetadataRecord};

use crate::ReportError;
use crate::persistence::write_analysis_to;

/// Output formats for an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    /// Executive summary text.
    Text,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
        }
    }
}

/// Export an analysis run to `path` in the given format.
pub fn export_analysis(
    records: &[EnrichedRecord],
    stats: &AnalysisStats,
    format: ExportFormat,
    path: &Path,
) -> Result<(), ReportError> {
    match format {
        ExportFormat::Csv => crate::persistence::write_analysis(path, records),
        ExportFormat::Json => write_text(path, &analysis_json(records, stats)?),
        ExportFormat::Text => write_text(path, &summary_report(records, stats)),
    }
}

pub fn write_text(path: &Path, content: &str) -> Result<(), ReportError> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Human-readable listing of ranked records (`results.txt`).
pub fn results_text(records: &[MetadataRecord]) -> String {
    let mut out = String::new();
    for r in records {
        out.push_str(&format!("--- Top {} Study (Score: {}) ---\n", r.rank, r.score));
        out.push_str(&format!("Authors   : {}\n", r.authors));
        out.push_str(&format!("DOI       : {}\n", r.identifier));
        out.push_str(&format!("Publisher : {}\n", r.publisher));
        out.push_str(&format!("Year      : {}\n", r.year));
        out.push_str(&format!(
            "Description: {}\n\n",
            truncate_chars(&r.description, DESCRIPTION_PERSIST_CHARS)
        ));
    }
    out
}

/// Matched page text per record (`extracted_text.txt`).
pub fn extracted_text(records: &[EnrichedRecord]) -> String {
    let mut out = String::new();
    for e in records {
        let r = e.record();
        out.push_str(&format!("=== ARTICLE (Score: {}) ===\n", r.score));
        out.push_str(&format!("Authors: {}\n", r.authors));
        out.push_str(&format!("DOI: {}\n", r.identifier));
        out.push_str(&format!("Publisher: {}\n", r.publisher));
        out.push_str(&format!(
            "Matched: page {} by {}\n",
            e.article.page_index + 1,
            e.article.method
        ));
        out.push_str("Text:\n");
        out.push_str(&e.article.text);
        out.push_str("\n\n");
    }
    out
}

/// Executive summary (`summary_report.txt`): totals, techniques by
/// frequency, compliance rate, privacy/accuracy pairs and the three
/// highest-scoring records.
pub fn summary_report(records: &[EnrichedRecord], stats: &AnalysisStats) -> String {
    let mut out = format!(
        "PRIVACY-PRESERVING FL IN HEALTHCARE: TOP {} SUMMARY\n",
        stats.total
    );
    out.push_str(&"=".repeat(60));
    out.push_str("\n\n");
    out.push_str(&format!("Total Studies Analyzed: {}\n", stats.total));
    if stats.unmatched > 0 {
        out.push_str(&format!(
            "Not located in document: {} of {}\n",
            stats.unmatched, stats.loaded
        ));
    }
    if stats.malformed_accuracy > 0 {
        out.push_str(&format!(
            "Malformed accuracy values: {}\n",
            stats.malformed_accuracy
        ));
    }

    out.push_str("\nTOP TECHNIQUES:\n");
    for (tag, count) in &stats.technique_counts {
        out.push_str(&format!("- {}: {} studies\n", tag, count));
    }

    out.push_str(&format!(
        "\nREGULATORY COMPLIANCE: {:.1}% ({}/{} studies)\n",
        stats.compliance_rate, stats.compliant, stats.total
    ));

    if !stats.privacy_accuracy.is_empty() {
        out.push_str("\nPRIVACY VS ACCURACY:\n");
        for p in &stats.privacy_accuracy {
            out.push_str(&format!(
                "- {}: epsilon {}, accuracy {:.2}%\n",
                p.label, p.epsilon, p.accuracy
            ));
        }
    }

    out.push_str("\nTOP 3 STUDIES:\n");
    for (i, e) in records.iter().take(3).enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, e.record().authors));
        out.push_str(&format!("   Techniques: {}\n", e.derived.techniques));
        out.push_str(&format!("   Accuracy: {}\n", e.derived.accuracy));
        out.push_str(&format!("   Compliance: {}\n\n", e.derived.compliance));
    }

    out.push_str("\nFULL RESULTS AVAILABLE IN: analysis.csv\n");
    out
}

#[derive(Serialize)]
struct AnalysisExport<'a> {
    records: &'a [EnrichedRecord],
    stats: &'a AnalysisStats,
}

/// Enriched records and aggregate stats as pretty-printed JSON.
pub fn analysis_json(records: &[EnrichedRecord], stats: &AnalysisStats) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(&AnalysisExport { records, stats })?)
}

/// The analysis table as a CSV string.
pub fn analysis_csv(records: &[EnrichedRecord]) -> Result<String, ReportError> {
    let mut buf = Vec::new();
    write_analysis_to(&mut buf, records)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use litsift_core::{Enricher, RawDocument};

    fn sample() -> (Vec<EnrichedRecord>, AnalysisStats) {
        let records = vec![
            MetadataRecord {
                rank: 1,
                score: 9,
                authors: "Lee, A.".into(),
                identifier: "10.1000/lee".into(),
                ..Default::default()
            },
            MetadataRecord {
                rank: 2,
                score: 4,
                authors: "Kim, B.".into(),
                identifier: "10.1000/kim".into(),
                ..Default::default()
            },
            MetadataRecord {
                rank: 3,
                score: 1,
                authors: "Gone, C.".into(),
                identifier: "10.1000/gone".into(),
                ..Default::default()
            },
        ];
        let doc = RawDocument::new(vec![
            "10.1000/kim blockchain study, 2019".into(),
            "10.1000/lee differential privacy under GDPR, epsilon = 2.0, accuracy: 91%, 2022"
                .into(),
        ]);
        let run = Enricher::new().enrich(&records, &doc);
        (run.records, run.stats)
    }

    #[test]
    fn test_results_text_lists_every_record() {
        let records = vec![MetadataRecord {
            rank: 1,
            score: 3,
            authors: "Lee, A.".into(),
            description: "d".repeat(400),
            ..Default::default()
        }];
        let text = results_text(&records);
        assert!(text.starts_with("--- Top 1 Study (Score: 3) ---\nAuthors   : Lee, A.\n"));
        assert!(text.contains(&format!("Description: {}\n", "d".repeat(300))));
        assert!(!text.contains(&"d".repeat(301)));
    }

    #[test]
    fn test_summary_includes_counts_and_top_studies() {
        let (records, stats) = sample();
        let summary = summary_report(&records, &stats);
        assert!(summary.contains("Total Studies Analyzed: 2\n"), "{summary}");
        assert!(summary.contains("Not located in document: 1 of 3\n"));
        assert!(summary.contains("- DP: 1 studies\n"));
        assert!(summary.contains("- Blockchain: 1 studies\n"));
        assert!(summary.contains("REGULATORY COMPLIANCE: 50.0% (1/2 studies)"));
        assert!(summary.contains("1. Lee, A.\n   Techniques: DP\n   Accuracy: 91%\n   Compliance: GDPR\n"));
        assert!(summary.contains("2. Kim, B.\n"));
        assert!(summary.contains("PRIVACY VS ACCURACY:\n- Lee, A.: epsilon 2, accuracy 91.00%\n"));
    }

    #[test]
    fn test_summary_reports_malformed_accuracy() {
        let records = vec![MetadataRecord {
            score: 2,
            authors: "Lee, A.".into(),
            identifier: "10.1/lee".into(),
            ..Default::default()
        }];
        let doc = RawDocument::new(vec!["10.1/lee accuracy = 1.2.3 epsilon = 0.5".into()]);
        let run = Enricher::new().enrich(&records, &doc);

        let summary = summary_report(&run.records, &run.stats);
        assert!(summary.contains("Malformed accuracy values: 1\n"), "{summary}");
        assert!(summary.contains("   Accuracy: Malformed (1.2.3)\n"));
        assert!(!summary.contains("PRIVACY VS ACCURACY:"));

        let (records, stats) = sample();
        assert!(!summary_report(&records, &stats).contains("Malformed accuracy values"));
    }

    #[test]
    fn test_extracted_text_records_match_method() {
        let (records, _) = sample();
        let text = extracted_text(&records);
        assert!(text.starts_with("=== ARTICLE (Score: 9) ===\n"));
        assert!(text.contains("Matched: page 2 by identifier\n"));
    }

    #[test]
    fn test_analysis_csv_renumbers_and_uses_derived_year() {
        let (records, _) = sample();
        let csv = analysis_csv(&records).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("Rank,Score,Authors,DOI,Publisher,Year,Techniques,Compliance,Accuracy,Privacy Level,Description")
        );
        assert_eq!(
            lines.next(),
            Some("1,9,\"Lee, A.\",10.1000/lee,Unknown,2022,DP,GDPR,91%,2.0,No description found")
        );
        assert_eq!(
            lines.next(),
            Some("2,4,\"Kim, B.\",10.1000/kim,Unknown,2019,Blockchain,None,Not stated,10.0,No description found")
        );
    }

    #[test]
    fn test_json_export_has_records_and_stats() {
        let (records, stats) = sample();
        let json = analysis_json(&records, &stats).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["records"].as_array().map(|a| a.len()), Some(2));
        assert_eq!(value["stats"]["total"], 2);
        assert_eq!(value["stats"]["unmatched"], 1);
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::Text.extension(), "txt");
    }
}
