//! Git history analysis: files that keep changing together.
//!
//! Reads `git log --name-only` output, splits it into commits, counts how
//! often every pair of files appears in the same commit, and writes the
//! ranked pairs as a CSV report.

pub mod accumulator;
pub mod parser;
pub mod reader;
pub mod report;

use cochange_core::{CochangeError, LabelMatch, ReportStyle};

use crate::accumulator::CoChangeAccumulator;
use crate::parser::{parse_commits, ParseMode};
use crate::reader::HistorySource;
use crate::report::CoChangeReport;

/// Count co-changes in an already captured log.
///
/// # Examples
///
/// ```
/// use cochange_core::{LabelMatch, ReportStyle};
///
/// let report = cochange_history::analyze_log(
///     "a.txt\nb.txt\n\na.txt\nc.txt\n",
///     ReportStyle::Basic,
///     LabelMatch::Strict,
/// );
/// assert_eq!(report.pairs_found, 2);
/// ```
pub fn analyze_log(log: &str, style: ReportStyle, label_match: LabelMatch) -> CoChangeReport {
    let mode = ParseMode::for_style(style, label_match);
    let acc = CoChangeAccumulator::new().fold(parse_commits(log, mode));
    tracing::info!(
        commits = acc.commits_seen(),
        pairs = acc.len(),
        %style,
        "co-change accumulation finished"
    );
    CoChangeReport::from_accumulator(acc, style)
}

/// Read history from `source` and count co-changes.
///
/// # Errors
///
/// Returns [`CochangeError`] if the history cannot be read.
pub fn analyze<S: HistorySource + ?Sized>(
    source: &S,
    style: ReportStyle,
    label_match: LabelMatch,
) -> Result<CoChangeReport, CochangeError> {
    let log = source.read_log(style)?;
    Ok(analyze_log(&log, style, label_match))
}
