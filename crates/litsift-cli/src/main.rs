use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use litsift_core::config_file::{self, ConfigFile};
use litsift_core::{DerivationConfig, Enricher, Lexicon, MatchConfig};
use litsift_parsing::{EntryExtractor, ParsingConfig, ParsingConfigBuilder, ParsingError};
use litsift_reporting::ExportFormat;

mod output;

use output::ColorMode;

const DEFAULT_TOP_N: usize = 10;

/// Literature triage - rank catalogue exports by keyword relevance and
/// enrich the top studies from their full text
#[derive(Parser, Debug)]
#[command(name = "litsift", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank the entries of a catalogue export and save the top N
    Rank {
        /// Path to the PDF or text export
        document: PathBuf,

        /// Number of entries to keep [env: LITSIFT_TOP_N] [default: 10]
        #[arg(long)]
        top_n: Option<usize>,

        /// Directory for results.csv and results.txt [env: LITSIFT_OUTPUT_DIR]
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Match ranked results against a full-text document and derive
    /// techniques, compliance, accuracy and privacy level
    Analyze {
        /// Path to the PDF or text document holding the full texts
        document: PathBuf,

        /// results.csv written by `litsift rank`
        #[arg(long)]
        results: PathBuf,

        /// Directory for the analysis outputs [env: LITSIFT_OUTPUT_DIR]
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = config_file::load_config();

    match cli.command {
        Command::Rank {
            document,
            top_n,
            output_dir,
            no_color,
        } => rank(&document, top_n, output_dir, no_color, &config),
        Command::Analyze {
            document,
            results,
            output_dir,
            no_color,
        } => analyze(&document, &results, output_dir, no_color, &config),
    }
}

fn rank(
    document: &Path,
    top_n: Option<usize>,
    output_dir: Option<PathBuf>,
    no_color: bool,
    config: &ConfigFile,
) -> anyhow::Result<()> {
    // Resolve configuration: CLI flags > env vars > config file > defaults
    let top_n = resolve_top_n(top_n, std::env::var("LITSIFT_TOP_N").ok(), config);
    let output_dir = resolve_output_dir(output_dir, std::env::var("LITSIFT_OUTPUT_DIR").ok());
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let extractor = EntryExtractor::with_config(parsing_config(config)?).with_lexicon(lexicon(config));

    let doc = litsift_ingest::load_document_or_empty(document);
    let run = extractor.rank_document(&doc, top_n);

    let color = ColorMode(!no_color);
    let mut writer: Box<dyn Write> = Box::new(std::io::stdout());
    output::print_ranking(&mut *writer, &display_name(document), &run, color)?;

    let csv_path = output_dir.join("results.csv");
    let txt_path = output_dir.join("results.txt");
    litsift_reporting::write_records(&csv_path, &run.records)
        .with_context(|| format!("writing {}", csv_path.display()))?;
    litsift_reporting::write_text(&txt_path, &litsift_reporting::results_text(&run.records))
        .with_context(|| format!("writing {}", txt_path.display()))?;

    output::print_saved(&mut *writer, &[csv_path, txt_path], color)?;
    Ok(())
}

fn analyze(
    document: &Path,
    results: &Path,
    output_dir: Option<PathBuf>,
    no_color: bool,
    config: &ConfigFile,
) -> anyhow::Result<()> {
    let output_dir = resolve_output_dir(output_dir, std::env::var("LITSIFT_OUTPUT_DIR").ok());
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    if !results.exists() {
        anyhow::bail!(
            "Results file not found: {}. Create it with: litsift rank <document>",
            results.display()
        );
    }
    let records = litsift_reporting::read_records(results)
        .with_context(|| format!("reading {}", results.display()))?;

    let doc = litsift_ingest::load_document_or_empty(document);
    let enricher = Enricher::with_config(match_config(config), DerivationConfig::default());
    let run = enricher.enrich(&records, &doc);

    let color = ColorMode(!no_color);
    let mut writer: Box<dyn Write> = Box::new(std::io::stdout());
    output::print_analysis(&mut *writer, &run, color)?;

    let extracted_path = output_dir.join("extracted_text.txt");
    litsift_reporting::write_text(&extracted_path, &litsift_reporting::extracted_text(&run.records))
        .with_context(|| format!("writing {}", extracted_path.display()))?;

    let mut saved = vec![extracted_path];
    for (stem, format) in [
        ("analysis", ExportFormat::Csv),
        ("summary_report", ExportFormat::Text),
        ("analysis", ExportFormat::Json),
    ] {
        let path = output_dir.join(format!("{}.{}", stem, format.extension()));
        litsift_reporting::export_analysis(&run.records, &run.stats, format, &path)
            .with_context(|| format!("writing {}", path.display()))?;
        saved.push(path);
    }

    output::print_saved(&mut *writer, &saved, color)?;
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn resolve_top_n(flag: Option<usize>, env: Option<String>, config: &ConfigFile) -> usize {
    let from_env = env.and_then(|v| match v.trim().parse() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!(value = %v, "ignoring non-numeric LITSIFT_TOP_N");
            None
        }
    });
    flag.or(from_env)
        .or_else(|| config.ranking.as_ref().and_then(|r| r.top_n))
        .unwrap_or(DEFAULT_TOP_N)
}

fn resolve_output_dir(flag: Option<PathBuf>, env: Option<String>) -> PathBuf {
    flag.or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn parsing_config(config: &ConfigFile) -> Result<ParsingConfig, ParsingError> {
    let mut builder = ParsingConfigBuilder::new();
    if let Some(seg) = &config.segmentation {
        if let Some(re) = &seg.boundary_regex {
            builder = builder.boundary_regex(re);
        }
        if let Some(len) = seg.min_entry_len {
            builder = builder.min_entry_len(len);
        }
    }
    Ok(builder.build()?)
}

fn lexicon(config: &ConfigFile) -> Lexicon {
    config
        .lexicon
        .as_ref()
        .and_then(|l| l.keywords.as_ref())
        .map(Lexicon::new)
        .unwrap_or_default()
}

fn match_config(config: &ConfigFile) -> MatchConfig {
    match &config.matching {
        Some(m) => m.apply(MatchConfig::default()),
        None => MatchConfig::default(),
    }
}
