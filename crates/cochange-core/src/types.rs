use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which report a run produces.
///
/// `Basic` counts co-changes only; `Detailed` also lists, for every pair,
/// the commits in which the two files changed together.
///
/// # Examples
///
/// ```
/// use cochange_core::ReportStyle;
///
/// assert!(ReportStyle::Detailed.tracks_commits());
/// assert_eq!(ReportStyle::default().to_string(), "basic");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStyle {
    /// Pair counts only.
    #[default]
    Basic,
    /// Pair counts plus the commit labels behind each count.
    Detailed,
}

impl ReportStyle {
    /// Whether commits are labelled (date + id) in this style.
    pub fn tracks_commits(self) -> bool {
        matches!(self, ReportStyle::Detailed)
    }
}

impl fmt::Display for ReportStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStyle::Basic => write!(f, "basic"),
            ReportStyle::Detailed => write!(f, "detailed"),
        }
    }
}

/// How the detailed parser recognises a `<date> : <commit id>` label line.
///
/// # Examples
///
/// ```
/// use cochange_core::LabelMatch;
///
/// assert_eq!(LabelMatch::default(), LabelMatch::Strict);
/// assert_eq!("loose".parse::<LabelMatch>().unwrap(), LabelMatch::Loose);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMatch {
    /// A valid `YYYY-MM-DD` date, then ` : `, then a hex commit id.
    #[default]
    Strict,
    /// Any line starting with `20`. Misreads paths such as `2023-notes.md`
    /// as commit boundaries; kept for parity with older reports.
    Loose,
}

impl fmt::Display for LabelMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelMatch::Strict => write!(f, "strict"),
            LabelMatch::Loose => write!(f, "loose"),
        }
    }
}

impl FromStr for LabelMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(LabelMatch::Strict),
            "loose" => Ok(LabelMatch::Loose),
            other => Err(format!("unknown label match: {other}")),
        }
    }
}

/// Output format for the summary printed to stdout.
///
/// The CSV report file is always written; this only controls the console.
///
/// # Examples
///
/// ```
/// use cochange_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown table.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
