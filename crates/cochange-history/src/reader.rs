//! Raw history extraction.
//!
//! Produces the `git log --name-only` text the parser consumes, either by
//! running git in a repository or by reading a previously captured log.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;

use cochange_core::{CochangeError, ReportStyle};

/// Something that can produce the raw log text for a report style.
///
/// The parser only needs the lines; where they come from is up to the
/// implementation.
pub trait HistorySource {
    /// Return the full log for `style` as one string.
    ///
    /// # Errors
    ///
    /// Returns [`CochangeError`] if the log cannot be produced.
    fn read_log(&self, style: ReportStyle) -> Result<String, CochangeError>;
}

/// Arguments passed to `git` for each report style.
///
/// # Examples
///
/// ```
/// use cochange_core::ReportStyle;
/// use cochange_history::reader::log_args;
///
/// assert_eq!(log_args(ReportStyle::Basic), ["log", "--pretty=format:", "--name-only"]);
/// assert!(log_args(ReportStyle::Detailed).contains(&"--date=short"));
/// ```
pub fn log_args(style: ReportStyle) -> &'static [&'static str] {
    match style {
        ReportStyle::Basic => &["log", "--pretty=format:", "--name-only"],
        ReportStyle::Detailed => &[
            "log",
            "--pretty=format:%ad : %H",
            "--date=short",
            "--name-only",
        ],
    }
}

/// Reads history by running `git log` inside a repository.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use cochange_core::ReportStyle;
/// use cochange_history::reader::{GitLog, HistorySource};
///
/// let log = GitLog::new(Path::new("."), "git").read_log(ReportStyle::Basic).unwrap();
/// println!("{} lines", log.lines().count());
/// ```
#[derive(Debug, Clone)]
pub struct GitLog {
    repo: PathBuf,
    git: String,
}

impl GitLog {
    /// Create a reader for the repository at `repo` using the `git` executable.
    pub fn new(repo: &Path, git: impl Into<String>) -> Self {
        Self {
            repo: repo.to_path_buf(),
            git: git.into(),
        }
    }
}

impl HistorySource for GitLog {
    fn read_log(&self, style: ReportStyle) -> Result<String, CochangeError> {
        let args = log_args(style);
        tracing::debug!(git = %self.git, ?args, repo = %self.repo.display(), "running history command");

        let output = Command::new(&self.git)
            .args(args)
            .current_dir(&self.repo)
            .output()
            .map_err(|e| CochangeError::Git(format!("failed to run {}: {e}", self.git)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CochangeError::Git(format!(
                "git log failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!(bytes = stdout.len(), "history command finished");
        Ok(stdout)
    }
}

/// Reads a log captured earlier with the same `git log` arguments.
///
/// A path of `-` reads standard input. Bytes that are not valid UTF-8 are
/// replaced, as they are for [`GitLog`].
///
/// # Examples
///
/// ```
/// use cochange_history::reader::LogFile;
///
/// let stdin = LogFile::new("-");
/// assert!(stdin.is_stdin());
/// ```
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
}

impl LogFile {
    /// Create a reader for the captured log at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Whether this reader consumes standard input.
    pub fn is_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }
}

impl HistorySource for LogFile {
    fn read_log(&self, _style: ReportStyle) -> Result<String, CochangeError> {
        let bytes = if self.is_stdin() {
            let mut input = Vec::new();
            std::io::stdin().read_to_end(&mut input)?;
            input
        } else {
            if !self.path.exists() {
                return Err(CochangeError::FileNotFound(self.path.clone()));
            }
            tracing::debug!(path = %self.path.display(), "reading captured log");
            std::fs::read(&self.path)?
        };
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Check that `path` is inside a git repository.
///
/// # Errors
///
/// Returns [`CochangeError::NotARepository`] when no repository is found.
pub fn ensure_repository(path: &Path) -> Result<(), CochangeError> {
    if path.join(".git").exists() {
        return Ok(());
    }
    git2::Repository::discover(path)
        .map(|_| ())
        .map_err(|_| CochangeError::NotARepository(path.to_path_buf()))
}
