//! Co-change accounting.
//!
//! Counts, for every unordered pair of files, the commits in which both
//! files changed, and optionally remembers which commits those were.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::parser::CommitRecord;

/// Unordered pair of two distinct paths, stored in lexicographic order.
///
/// # Examples
///
/// ```
/// use cochange_history::accumulator::FilePair;
///
/// let ab = FilePair::new("b.rs", "a.rs").unwrap();
/// assert_eq!(ab, FilePair::new("a.rs", "b.rs").unwrap());
/// assert_eq!(ab.first(), "a.rs");
/// assert!(FilePair::new("a.rs", "a.rs").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilePair {
    first: String,
    second: String,
}

impl FilePair {
    /// Normalize `a` and `b` into a pair; `None` if they are the same path.
    pub fn new(a: &str, b: &str) -> Option<Self> {
        if a == b {
            return None;
        }
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        Some(Self {
            first: first.to_string(),
            second: second.to_string(),
        })
    }

    /// Lexicographically smaller path.
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Lexicographically larger path.
    pub fn second(&self) -> &str {
        &self.second
    }
}

/// Running totals for one pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairStats {
    /// Number of commits touching both files.
    pub count: u32,
    /// Labels of those commits, in the order they were read.
    pub labels: Vec<String>,
}

/// A ranked result row.
///
/// # Examples
///
/// ```
/// use cochange_history::accumulator::CoChangePair;
///
/// let pair = CoChangePair {
///     file_a: "src/auth.rs".into(),
///     file_b: "src/session.rs".into(),
///     count: 4,
///     commits: vec![],
/// };
/// assert_eq!(pair.count, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoChangePair {
    /// First file in the pair (lexicographically smaller).
    pub file_a: String,
    /// Second file in the pair.
    pub file_b: String,
    /// Number of commits touching both files.
    pub count: u32,
    /// Commit labels in reverse reading order.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub commits: Vec<String>,
}

/// Owns the pair map for one run.
///
/// Pairs keep their first-seen order so equal counts rank deterministically.
///
/// # Examples
///
/// ```
/// use cochange_history::accumulator::CoChangeAccumulator;
/// use cochange_history::parser::CommitRecord;
///
/// let acc = CoChangeAccumulator::new().fold([
///     CommitRecord::new(None, ["a.rs", "b.rs"]),
///     CommitRecord::new(None, ["a.rs", "b.rs", "c.rs"]),
/// ]);
/// assert_eq!(acc.commits_seen(), 2);
/// let ranked = acc.into_ranked();
/// assert_eq!(ranked[0].count, 2);
/// assert_eq!(ranked.len(), 3);
/// ```
#[derive(Debug, Default)]
pub struct CoChangeAccumulator {
    index: HashMap<FilePair, usize>,
    entries: Vec<(FilePair, PairStats)>,
    commits_seen: usize,
}

impl CoChangeAccumulator {
    /// Empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold every record into the accumulator and return it.
    pub fn fold<I>(mut self, commits: I) -> Self
    where
        I: IntoIterator<Item = CommitRecord>,
    {
        for commit in commits {
            self.record(&commit);
        }
        self
    }

    /// Add one commit. Commits with fewer than two files add no pairs.
    pub fn record(&mut self, commit: &CommitRecord) {
        self.commits_seen += 1;
        if commit.files.len() < 2 {
            return;
        }

        let files: Vec<&str> = commit.files.iter().map(String::as_str).collect();
        for i in 0..files.len() {
            for j in (i + 1)..files.len() {
                let Some(pair) = FilePair::new(files[i], files[j]) else {
                    continue;
                };
                let stats = self.stats_mut(pair);
                stats.count += 1;
                if let Some(label) = &commit.label {
                    stats.labels.push(label.clone());
                }
            }
        }
    }

    fn stats_mut(&mut self, pair: FilePair) -> &mut PairStats {
        let slot = match self.index.get(&pair) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.index.insert(pair.clone(), slot);
                self.entries.push((pair, PairStats::default()));
                slot
            }
        };
        &mut self.entries[slot].1
    }

    /// Totals for `pair`, if the two files ever changed together.
    pub fn get(&self, pair: &FilePair) -> Option<&PairStats> {
        self.index.get(pair).map(|&slot| &self.entries[slot].1)
    }

    /// Number of commit records folded in, including single-file ones.
    pub fn commits_seen(&self) -> usize {
        self.commits_seen
    }

    /// Number of distinct pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no pair has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the accumulator into rows sorted by count, highest first.
    ///
    /// The sort is stable; labels are reversed so the last one read comes
    /// first.
    pub fn into_ranked(self) -> Vec<CoChangePair> {
        let mut pairs: Vec<CoChangePair> = self
            .entries
            .into_iter()
            .map(|(pair, stats)| {
                let mut commits = stats.labels;
                commits.reverse();
                CoChangePair {
                    file_a: pair.first,
                    file_b: pair.second,
                    count: stats.count,
                    commits,
                }
            })
            .collect();
        pairs.sort_by(|a, b| b.count.cmp(&a.count));
        pairs
    }
}
