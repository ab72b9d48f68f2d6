//! Splits `git log --name-only` output into per-commit file sets.
//!
//! Two log shapes are understood. The basic shape separates commits with a
//! blank line and carries no commit header. The detailed shape opens every
//! commit with a `<date> : <commit id>` label line.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use cochange_core::{LabelMatch, ReportStyle};

/// One commit's worth of changed files.
///
/// # Examples
///
/// ```
/// use cochange_history::parser::CommitRecord;
///
/// let record = CommitRecord::new(None, ["b.rs", "a.rs", "a.rs"]);
/// assert_eq!(record.files.len(), 2);
/// assert!(record.label.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// `<date> : <commit id>` for detailed logs, `None` for basic ones.
    pub label: Option<String>,
    /// Paths touched by the commit. Never contains an empty string.
    pub files: BTreeSet<String>,
}

impl CommitRecord {
    /// Build a record, dropping empty paths.
    pub fn new<I, S>(label: Option<String>, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label,
            files: files
                .into_iter()
                .map(Into::into)
                .filter(|f: &String| !f.is_empty())
                .collect(),
        }
    }
}

/// Which log shape the parser expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Commits separated by blank lines, no labels.
    Basic,
    /// Commits introduced by label lines recognised with the given matcher.
    Detailed(LabelMatch),
}

impl ParseMode {
    /// Parse mode for the log produced for `style`.
    pub fn for_style(style: ReportStyle, label_match: LabelMatch) -> Self {
        match style {
            ReportStyle::Basic => ParseMode::Basic,
            ReportStyle::Detailed => ParseMode::Detailed(label_match),
        }
    }
}

/// Whether `line` is a `<date> : <commit id>` label under `matcher`.
///
/// # Examples
///
/// ```
/// use cochange_core::LabelMatch;
/// use cochange_history::parser::is_label_line;
///
/// assert!(is_label_line("2024-01-01 : abc123", LabelMatch::Strict));
/// assert!(!is_label_line("2023-notes.md", LabelMatch::Strict));
/// assert!(is_label_line("2023-notes.md", LabelMatch::Loose));
/// ```
pub fn is_label_line(line: &str, matcher: LabelMatch) -> bool {
    match matcher {
        LabelMatch::Loose => line.starts_with("20"),
        LabelMatch::Strict => {
            let Some((date, id)) = line.trim_end().split_once(" : ") else {
                return false;
            };
            date.len() == 10
                && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
                && !id.is_empty()
                && id.chars().all(|c| c.is_ascii_hexdigit())
        }
    }
}

/// Parse a whole log string into a lazy sequence of commit records.
///
/// # Examples
///
/// ```
/// use cochange_history::parser::{parse_commits, ParseMode};
///
/// let commits: Vec<_> = parse_commits("a.txt\nb.txt\n\nc.txt\n", ParseMode::Basic).collect();
/// assert_eq!(commits.len(), 2);
/// assert_eq!(commits[1].files.len(), 1);
/// ```
pub fn parse_commits(input: &str, mode: ParseMode) -> CommitRecords<std::str::Lines<'_>> {
    CommitRecords::new(input.lines(), mode)
}

/// Iterator adapter turning log lines into [`CommitRecord`]s.
///
/// Each record is yielded exactly once, as soon as the line that closes it
/// has been read.
#[derive(Debug)]
pub struct CommitRecords<I> {
    lines: I,
    mode: ParseMode,
    label: Option<String>,
    files: BTreeSet<String>,
}

impl<I> CommitRecords<I> {
    /// Wrap a line iterator.
    pub fn new(lines: I, mode: ParseMode) -> Self {
        Self {
            lines,
            mode,
            label: None,
            files: BTreeSet::new(),
        }
    }

    fn add_file(&mut self, line: &str) {
        if !line.is_empty() {
            self.files.insert(line.to_string());
        }
    }

    fn take_record(&mut self, label: Option<String>) -> CommitRecord {
        CommitRecord {
            label,
            files: std::mem::take(&mut self.files),
        }
    }

    fn step_basic(&mut self, line: &str) -> Option<CommitRecord> {
        if line.trim().is_empty() {
            if self.files.is_empty() {
                return None;
            }
            return Some(self.take_record(None));
        }
        if !line.starts_with("commit") {
            self.add_file(line);
        }
        None
    }

    fn step_detailed(&mut self, line: &str, matcher: LabelMatch) -> Option<CommitRecord> {
        let is_boundary =
            line.starts_with("commit") || line.starts_with("Date:") || is_label_line(line, matcher);

        if !is_boundary {
            if !line.trim().is_empty() {
                self.add_file(line);
            }
            return None;
        }

        let record = self.close_labelled();
        let label = line.trim();
        if !label.is_empty() {
            self.label = Some(label.to_string());
        }
        record
    }

    fn close_labelled(&mut self) -> Option<CommitRecord> {
        if self.files.is_empty() {
            return None;
        }
        match self.label.clone() {
            Some(label) => Some(self.take_record(Some(label))),
            None => {
                tracing::debug!(
                    files = self.files.len(),
                    "dropping files listed before the first commit label"
                );
                self.files.clear();
                None
            }
        }
    }

    fn finish(&mut self) -> Option<CommitRecord> {
        match self.mode {
            ParseMode::Basic if !self.files.is_empty() => Some(self.take_record(None)),
            ParseMode::Basic => None,
            ParseMode::Detailed(_) => self.close_labelled(),
        }
    }
}

impl<I, S> Iterator for CommitRecords<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = CommitRecord;

    fn next(&mut self) -> Option<CommitRecord> {
        while let Some(line) = self.lines.next() {
            let line = line.as_ref();
            let record = match self.mode {
                ParseMode::Basic => self.step_basic(line),
                ParseMode::Detailed(matcher) => self.step_detailed(line, matcher),
            };
            if record.is_some() {
                return record;
            }
        }
        self.finish()
    }
}
