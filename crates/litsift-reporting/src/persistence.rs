use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};

use litsift_core::text_utils::truncate_chars;
use litsift_core::{DESCRIPTION_PERSIST_CHARS, EnrichedRecord, MetadataRecord, UNKNOWN};

use crate::ReportError;

pub const RESULT_HEADERS: [&str; 7] = [
    "Rank",
    "Score",
    "Authors",
    "DOI",
    "Publisher",
    "Year",
    "Description",
];

pub const ANALYSIS_HEADERS: [&str; 11] = [
    "Rank",
    "Score",
    "Authors",
    "DOI",
    "Publisher",
    "Year",
    "Techniques",
    "Compliance",
    "Accuracy",
    "Privacy Level",
    "Description",
];

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// One row of `results.csv`.
#[derive(Debug, Serialize, Deserialize)]
struct ResultRow {
    #[serde(rename = "Rank")]
    rank: usize,
    #[serde(rename = "Score")]
    score: usize,
    #[serde(rename = "Authors")]
    authors: String,
    #[serde(rename = "DOI")]
    doi: String,
    #[serde(rename = "Publisher")]
    publisher: String,
    // Older exports have no Year column.
    #[serde(rename = "Year", default = "unknown")]
    year: String,
    #[serde(rename = "Description")]
    description: String,
}

impl From<&MetadataRecord> for ResultRow {
    fn from(r: &MetadataRecord) -> Self {
        Self {
            rank: r.rank,
            score: r.score,
            authors: r.authors.clone(),
            doi: r.identifier.clone(),
            publisher: r.publisher.clone(),
            year: r.year.clone(),
            description: truncate_chars(&r.description, DESCRIPTION_PERSIST_CHARS).to_string(),
        }
    }
}

impl From<ResultRow> for MetadataRecord {
    fn from(row: ResultRow) -> Self {
        Self {
            rank: row.rank,
            score: row.score,
            authors: row.authors,
            identifier: row.doi,
            publisher: row.publisher,
            year: row.year,
            description: row.description,
        }
    }
}

/// One row of `analysis.csv`.
#[derive(Debug, Serialize)]
struct AnalysisRow<'a> {
    rank: usize,
    score: usize,
    authors: &'a str,
    doi: &'a str,
    publisher: &'a str,
    year: &'a str,
    techniques: String,
    compliance: String,
    accuracy: String,
    privacy_level: &'a str,
    description: &'a str,
}

/// Write ranked records, header first. Descriptions are cut to 300 chars.
pub fn write_records_to<W: Write>(writer: W, records: &[MetadataRecord]) -> Result<(), ReportError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(RESULT_HEADERS)?;
    for record in records {
        wtr.serialize(ResultRow::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_records(path: &Path, records: &[MetadataRecord]) -> Result<(), ReportError> {
    write_records_to(File::create(path)?, records)?;
    tracing::info!(path = %path.display(), records = records.len(), "saved ranked records");
    Ok(())
}

/// Read records written by [`write_records_to`]. Columns are matched by
/// header name; a missing `Year` column reads as "Unknown".
pub fn read_records_from<R: Read>(reader: R) -> Result<Vec<MetadataRecord>, ReportError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    rdr.deserialize::<ResultRow>()
        .map(|row| row.map(MetadataRecord::from).map_err(ReportError::from))
        .collect()
}

pub fn read_records(path: &Path) -> Result<Vec<MetadataRecord>, ReportError> {
    let records = read_records_from(File::open(path)?)?;
    tracing::info!(path = %path.display(), records = records.len(), "loaded ranked records");
    Ok(records)
}

/// Write enriched records in the given order, ranked from 1.
pub fn write_analysis_to<W: Write>(writer: W, records: &[EnrichedRecord]) -> Result<(), ReportError> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(ANALYSIS_HEADERS)?;
    for (i, enriched) in records.iter().enumerate() {
        let record = enriched.record();
        let derived = &enriched.derived;
        wtr.serialize(AnalysisRow {
            rank: i + 1,
            score: record.score,
            authors: &record.authors,
            doi: &record.identifier,
            publisher: &record.publisher,
            year: &derived.year.value,
            techniques: derived.techniques.to_string(),
            compliance: derived.compliance.to_string(),
            accuracy: derived.accuracy.to_string(),
            privacy_level: &derived.privacy_level.value,
            description: truncate_chars(&record.description, DESCRIPTION_PERSIST_CHARS),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_analysis(path: &Path, records: &[EnrichedRecord]) -> Result<(), ReportError> {
    write_analysis_to(File::create(path)?, records)?;
    tracing::info!(path = %path.display(), records = records.len(), "saved analysis");
    Ok(())
}
