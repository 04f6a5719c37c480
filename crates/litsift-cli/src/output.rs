use std::io::Write;
use std::path::PathBuf;

use litsift_core::text_utils::truncate_chars;
use litsift_core::{Accuracy, DESCRIPTION_PERSIST_CHARS, EnrichmentRun, MatchMethod};
use litsift_parsing::{Field, RankingRun};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the top-N listing after a ranking run.
pub fn print_ranking(
    w: &mut dyn Write,
    doc_name: &str,
    run: &RankingRun,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Ranking entries from {}...", doc_name)?;
    writeln!(
        w,
        "Found {} entries, keeping top {}",
        run.total_entries,
        run.records.len()
    )?;

    let defaulted: Vec<String> = Field::ALL
        .iter()
        .filter_map(|f| {
            let n = run.report.defaults(*f);
            (n > 0).then(|| format!("{} {}", n, f))
        })
        .collect();
    if !defaulted.is_empty() {
        let line = format!("(Fields left at default: {})", defaulted.join(", "));
        if color.enabled() {
            writeln!(w, "{}", line.dimmed())?;
        } else {
            writeln!(w, "{}", line)?;
        }
    }
    writeln!(w)?;

    for r in &run.records {
        let header = format!("--- Top {} Study (Score: {}) ---", r.rank, r.score);
        if color.enabled() {
            writeln!(w, "{}", header.bold().cyan())?;
        } else {
            writeln!(w, "{}", header)?;
        }
        writeln!(w, "Authors   : {}", r.authors)?;
        writeln!(w, "DOI       : {}", r.identifier)?;
        writeln!(w, "Publisher : {}", r.publisher)?;
        writeln!(w, "Year      : {}", r.year)?;
        writeln!(
            w,
            "Description: {}",
            truncate_chars(&r.description, DESCRIPTION_PERSIST_CHARS)
        )?;
        writeln!(w)?;
    }
    Ok(())
}

fn short(s: &str, max: usize) -> String {
    let cut = truncate_chars(s, max);
    if cut.len() < s.len() {
        format!("{}...", cut)
    } else {
        cut.to_string()
    }
}

/// Print match results, per-record derived fields and compliance totals.
pub fn print_analysis(
    w: &mut dyn Write,
    run: &EnrichmentRun,
    color: ColorMode,
) -> std::io::Result<()> {
    let stats = &run.stats;
    writeln!(
        w,
        "Extracted {}/{} articles from document",
        stats.total, stats.loaded
    )?;
    for record in &run.unmatched {
        let line = format!("Could not match article: {}", short(&record.authors, 30));
        if color.enabled() {
            writeln!(w, "{}", line.yellow())?;
        } else {
            writeln!(w, "{}", line)?;
        }
    }
    writeln!(w)?;

    for (i, e) in run.records.iter().enumerate() {
        let d = &e.derived;
        let method = match e.article.method {
            MatchMethod::Exact => "doi".to_string(),
            MatchMethod::Fuzzy { score } => format!("fuzzy {}", score),
        };
        let accuracy = d.accuracy.to_string();
        if color.enabled() {
            let accuracy = match d.accuracy {
                Accuracy::Malformed { .. } => accuracy.red().to_string(),
                Accuracy::NotStated => accuracy.dimmed().to_string(),
                Accuracy::Stated(_) => accuracy.green().to_string(),
            };
            writeln!(
                w,
                "[{}] {} ({})",
                i + 1,
                short(&e.record().authors, 40).bold(),
                method.dimmed()
            )?;
            writeln!(
                w,
                "     Techniques: {} | Compliance: {} | Accuracy: {} | Privacy: {}",
                d.techniques, d.compliance, accuracy, d.privacy_level
            )?;
        } else {
            writeln!(w, "[{}] {} ({})", i + 1, short(&e.record().authors, 40), method)?;
            writeln!(
                w,
                "     Techniques: {} | Compliance: {} | Accuracy: {} | Privacy: {}",
                d.techniques, d.compliance, accuracy, d.privacy_level
            )?;
        }
    }

    if stats.malformed_accuracy > 0 {
        let line = format!(
            "{} accuracy value(s) could not be parsed",
            stats.malformed_accuracy
        );
        if color.enabled() {
            writeln!(w, "{}", line.red())?;
        } else {
            writeln!(w, "{}", line)?;
        }
    }

    writeln!(w)?;
    writeln!(w, "Compliance Analysis:")?;
    writeln!(
        w,
        "- {}/{} studies mention regulatory compliance",
        stats.compliant, stats.total
    )?;
    writeln!(w, "- {:.1}% address GDPR/HIPAA", stats.compliance_rate)?;
    writeln!(w)?;
    Ok(())
}

/// Print the list of files written by a run.
pub fn print_saved(w: &mut dyn Write, paths: &[PathBuf], color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", "Saved:".green().bold())?;
    } else {
        writeln!(w, "Saved:")?;
    }
    for p in paths {
        writeln!(w, "- {}", p.display())?;
    }
    Ok(())
}
