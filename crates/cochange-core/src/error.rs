use std::path::PathBuf;

/// Errors that can occur while mining co-changes.
///
/// Library crates use this type directly; the binary crate converts to
/// `miette::Report` at the boundary.
///
/// # Examples
///
/// ```
/// use cochange_core::CochangeError;
///
/// let err = CochangeError::Config("unknown label match".into());
/// assert!(err.to_string().contains("unknown label match"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum CochangeError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The history command could not be run or exited with a failure.
    #[error("git error: {0}")]
    #[diagnostic(help("make sure git is installed and on PATH"))]
    Git(String),

    /// The given path is not inside a git repository.
    #[error("not a git repository: {}", .0.display())]
    #[diagnostic(help("run cochange from inside a git repository, or pass --path to one"))]
    NotARepository(PathBuf),

    /// CSV report could not be written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}
