//! Report output: the CSV file and the console summary.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use cochange_core::{CochangeError, ReportStyle};
use serde::Serialize;

use crate::accumulator::{CoChangeAccumulator, CoChangePair};

/// Header row of every CSV report.
pub const HEADER: [&str; 3] = ["File1", "File2", "Count"];

/// Row written by the detailed report when no pair was found.
pub const NO_PAIRS_MESSAGE: &str = "No recurrent file changes found.";

/// Everything a run produced.
///
/// # Examples
///
/// ```
/// use cochange_core::ReportStyle;
/// use cochange_history::accumulator::CoChangeAccumulator;
/// use cochange_history::parser::CommitRecord;
/// use cochange_history::report::CoChangeReport;
///
/// let acc = CoChangeAccumulator::new().fold([CommitRecord::new(None, ["a", "b"])]);
/// let report = CoChangeReport::from_accumulator(acc, ReportStyle::Basic);
/// assert_eq!(report.commits_analyzed, 1);
/// assert_eq!(report.pairs_found, 1);
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoChangeReport {
    /// Report style the pairs were collected for.
    pub style: ReportStyle,
    /// Commit records read from the log.
    pub commits_analyzed: usize,
    /// Distinct co-changed pairs.
    pub pairs_found: usize,
    /// Pairs, highest count first.
    pub pairs: Vec<CoChangePair>,
}

impl CoChangeReport {
    /// Rank the accumulated pairs into a report.
    pub fn from_accumulator(acc: CoChangeAccumulator, style: ReportStyle) -> Self {
        let commits_analyzed = acc.commits_seen();
        let pairs = acc.into_ranked();
        Self {
            style,
            commits_analyzed,
            pairs_found: pairs.len(),
            pairs,
        }
    }
}

/// Write `pairs` as CSV to `writer`.
///
/// The detailed style follows each pair with a `Details:` row, one numbered
/// row per commit and an empty separator row.
///
/// # Errors
///
/// Returns [`CochangeError::Csv`] or [`CochangeError::Io`] if writing fails.
///
/// # Examples
///
/// ```
/// use cochange_core::ReportStyle;
/// use cochange_history::report::write_csv;
///
/// let mut out = Vec::new();
/// write_csv(&mut out, &[], ReportStyle::Basic).unwrap();
/// assert_eq!(out, b"File1,File2,Count\r\n");
/// ```
pub fn write_csv<W: Write>(
    writer: W,
    pairs: &[CoChangePair],
    style: ReportStyle,
) -> Result<(), CochangeError> {
    let mut csv = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    csv.write_record(HEADER)?;

    if pairs.is_empty() && style.tracks_commits() {
        csv.write_record([NO_PAIRS_MESSAGE])?;
    }

    for pair in pairs {
        let count = pair.count.to_string();
        csv.write_record([pair.file_a.as_str(), pair.file_b.as_str(), count.as_str()])?;

        if style.tracks_commits() {
            csv.write_record(["Details:", "", ""])?;
            for (i, label) in pair.commits.iter().enumerate() {
                let row = format!("{}: {label}", i + 1);
                csv.write_record([row.as_str(), "", ""])?;
            }
            csv.write_record(["", "", ""])?;
        }
    }

    csv.flush()?;
    Ok(())
}

/// Write the CSV report to `path`, creating its directory if needed.
///
/// An existing file is overwritten.
///
/// # Errors
///
/// Returns [`CochangeError::Io`] if the directory or file cannot be created.
pub fn save_report(
    path: &Path,
    pairs: &[CoChangePair],
    style: ReportStyle,
) -> Result<(), CochangeError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let file = File::create(path)?;
    write_csv(BufWriter::new(file), pairs, style)?;
    tracing::info!(path = %path.display(), pairs = pairs.len(), "report written");
    Ok(())
}

/// Plain-text summary of the top `limit` pairs.
pub fn format_text(report: &CoChangeReport, limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Co-changed files: {} pairs across {} commits",
        report.pairs_found, report.commits_analyzed
    );
    if report.pairs.is_empty() {
        let _ = writeln!(out, "{NO_PAIRS_MESSAGE}");
        return out;
    }
    let _ = writeln!(out, "{:-<72}", "");
    for (i, pair) in report.pairs.iter().take(limit).enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:>4}x  {}  <->  {}",
            i + 1,
            pair.count,
            pair.file_a,
            pair.file_b
        );
        for label in &pair.commits {
            let _ = writeln!(out, "            {label}");
        }
    }
    if report.pairs.len() > limit {
        let _ = writeln!(out, "... {} more", report.pairs.len() - limit);
    }
    out
}

/// Markdown summary of the top `limit` pairs.
pub fn format_markdown(report: &CoChangeReport, limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Recurrent File Changes\n");
    let _ = writeln!(out, "**Commits analyzed:** {}\n", report.commits_analyzed);
    if report.pairs.is_empty() {
        let _ = writeln!(out, "{NO_PAIRS_MESSAGE}");
        return out;
    }

    let detailed = report.style.tracks_commits();
    if detailed {
        let _ = writeln!(out, "| Rank | File 1 | File 2 | Count | Latest commit |");
        let _ = writeln!(out, "|------|--------|--------|-------|---------------|");
    } else {
        let _ = writeln!(out, "| Rank | File 1 | File 2 | Count |");
        let _ = writeln!(out, "|------|--------|--------|-------|");
    }
    for (i, pair) in report.pairs.iter().take(limit).enumerate() {
        let _ = write!(
            out,
            "| {} | `{}` | `{}` | {} |",
            i + 1,
            pair.file_a,
            pair.file_b,
            pair.count
        );
        if detailed {
            let latest = pair.commits.first().map(String::as_str).unwrap_or("");
            let _ = write!(out, " {latest} |");
        }
        out.push('\n');
    }
    out
}

/// Pretty-printed JSON of the whole report.
///
/// # Errors
///
/// Returns [`CochangeError::Serialization`] if encoding fails.
pub fn format_json(report: &CoChangeReport) -> Result<String, CochangeError> {
    Ok(serde_json::to_string_pretty(report)?)
}
