use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CochangeError;
use crate::types::{LabelMatch, ReportStyle};
use crate::Result;

/// Top-level configuration loaded from `.cochange.toml`.
///
/// Supports layered resolution: CLI flags > local config > defaults.
///
/// # Examples
///
/// ```
/// use cochange_core::CochangeConfig;
///
/// let config = CochangeConfig::default();
/// assert_eq!(config.output.dir, "Artifacts");
/// assert_eq!(config.history.git, "git");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CochangeConfig {
    /// Where reports are written.
    #[serde(default)]
    pub output: OutputConfig,
    /// How the log is split into commits.
    #[serde(default)]
    pub parser: ParserConfig,
    /// How history is read.
    #[serde(default)]
    pub history: HistoryConfig,
}

impl CochangeConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CochangeError::Io`] if the file cannot be read, or
    /// [`CochangeError::Toml`] if the content is not valid TOML.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use cochange_core::CochangeConfig;
    /// use std::path::Path;
    ///
    /// let config = CochangeConfig::from_file(Path::new(".cochange.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`CochangeError::Toml`] if parsing fails, or
    /// [`CochangeError::Config`] if a file name or the git executable is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use cochange_core::{CochangeConfig, LabelMatch};
    ///
    /// let toml = r#"
    /// [parser]
    /// label_match = "loose"
    /// "#;
    /// let config = CochangeConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.parser.label_match, LabelMatch::Loose);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("output.basic_file", &self.output.basic_file),
            ("output.detailed_file", &self.output.detailed_file),
            ("history.git", &self.history.git),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(CochangeError::Config(format!("{key} must not be empty")));
            }
        }
        if self.output.basic_file == self.output.detailed_file {
            return Err(CochangeError::Config(
                "output.basic_file and output.detailed_file must differ".into(),
            ));
        }
        Ok(())
    }
}

/// Report destination settings.
///
/// # Examples
///
/// ```
/// use cochange_core::{OutputConfig, ReportStyle};
/// use std::path::Path;
///
/// let config = OutputConfig::default();
/// let path = config.report_path(Path::new("/repo"), ReportStyle::Basic);
/// assert_eq!(path, Path::new("/repo/Artifacts/recurrent_file_changes.csv"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report directory; relative paths are resolved against the repository.
    #[serde(default = "default_output_dir")]
    pub dir: String,
    /// File name of the basic report.
    #[serde(default = "default_basic_file")]
    pub basic_file: String,
    /// File name of the detailed report.
    #[serde(default = "default_detailed_file")]
    pub detailed_file: String,
}

fn default_output_dir() -> String {
    "Artifacts".into()
}

fn default_basic_file() -> String {
    "recurrent_file_changes.csv".into()
}

// Existing consumers read this exact name.
fn default_detailed_file() -> String {
    "recurrent_file_changes_detiled.csv".into()
}

impl OutputConfig {
    /// Directory the reports go to, resolved against `repo`.
    pub fn resolve_dir(&self, repo: &Path) -> PathBuf {
        let dir = Path::new(&self.dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            repo.join(dir)
        }
    }

    /// Full path of the report for `style`.
    pub fn report_path(&self, repo: &Path, style: ReportStyle) -> PathBuf {
        let file = match style {
            ReportStyle::Basic => &self.basic_file,
            ReportStyle::Detailed => &self.detailed_file,
        };
        self.resolve_dir(repo).join(file)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            basic_file: default_basic_file(),
            detailed_file: default_detailed_file(),
        }
    }
}

/// Commit parser settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParserConfig {
    /// How label lines are recognised in detailed logs (default: strict).
    #[serde(default)]
    pub label_match: LabelMatch,
}

/// History reader settings.
///
/// # Examples
///
/// ```
/// use cochange_core::HistoryConfig;
///
/// assert_eq!(HistoryConfig::default().git, "git");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Git executable to invoke (default: `"git"`).
    #[serde(default = "default_git")]
    pub git: String,
}

fn default_git() -> String {
    "git".into()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { git: default_git() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = CochangeConfig::default();
        assert_eq!(config.output.dir, "Artifacts");
        assert_eq!(config.output.basic_file, "recurrent_file_changes.csv");
        assert_eq!(
            config.output.detailed_file,
            "recurrent_file_changes_detiled.csv"
        );
        assert_eq!(config.parser.label_match, LabelMatch::Strict);
        assert_eq!(config.history.git, "git");
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[output]
dir = "reports"
basic_file = "pairs.csv"
detailed_file = "pairs-detailed.csv"

[parser]
label_match = "loose"

[history]
git = "/usr/local/bin/git"
"#;
        let config = CochangeConfig::from_toml(toml).unwrap();
        assert_eq!(config.output.dir, "reports");
        assert_eq!(config.output.basic_file, "pairs.csv");
        assert_eq!(config.output.detailed_file, "pairs-detailed.csv");
        assert_eq!(config.parser.label_match, LabelMatch::Loose);
        assert_eq!(config.history.git, "/usr/local/bin/git");
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = CochangeConfig::from_toml("").unwrap();
        assert_eq!(config.output.dir, "Artifacts");
        assert_eq!(config.parser.label_match, LabelMatch::Strict);
    }

    #[test]
    fn partial_output_section_keeps_other_defaults() {
        let config = CochangeConfig::from_toml("[output]\ndir = \"out\"\n").unwrap();
        assert_eq!(config.output.dir, "out");
        assert_eq!(config.output.basic_file, "recurrent_file_changes.csv");
    }

    #[test]
    fn unknown_label_match_is_rejected() {
        let result = CochangeConfig::from_toml("[parser]\nlabel_match = \"fuzzy\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn empty_file_name_is_a_config_error() {
        let err = CochangeConfig::from_toml("[output]\nbasic_file = \"\"\n").unwrap_err();
        assert!(matches!(err, CochangeError::Config(_)));
        assert_eq!(
            err.to_string(),
            "configuration error: output.basic_file must not be empty"
        );
    }

    #[test]
    fn empty_git_executable_is_a_config_error() {
        let err = CochangeConfig::from_toml("[history]\ngit = \" \"\n").unwrap_err();
        assert!(matches!(err, CochangeError::Config(_)));
    }

    #[test]
    fn shared_report_file_name_is_rejected() {
        let toml = "[output]\nbasic_file = \"pairs.csv\"\ndetailed_file = \"pairs.csv\"\n";
        let err = CochangeConfig::from_toml(toml).unwrap_err();
        assert!(matches!(err, CochangeError::Config(_)));
    }

    #[test]
    fn invalid_toml_returns_error() {
        let result = CochangeConfig::from_toml("{{invalid}}");
        assert!(result.is_err());
    }

    #[test]
    fn relative_dir_resolves_against_repo() {
        let config = OutputConfig::default();
        assert_eq!(
            config.report_path(Path::new("/work/repo"), ReportStyle::Detailed),
            PathBuf::from("/work/repo/Artifacts/recurrent_file_changes_detiled.csv")
        );
    }

    #[test]
    fn absolute_dir_is_used_as_is() {
        let config = OutputConfig {
            dir: "/var/reports".into(),
            ..OutputConfig::default()
        };
        assert_eq!(
            config.resolve_dir(Path::new("/work/repo")),
            PathBuf::from("/var/reports")
        );
    }
}
