use thiserror::Error;

pub mod export;
pub mod persistence;

pub use export::{
    ExportFormat, analysis_csv, analysis_json, export_analysis, extracted_text, results_text, summary_report,
    write_text,
};
pub use persistence::{read_records, write_analysis, write_records};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
