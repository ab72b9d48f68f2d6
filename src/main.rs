use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand};
use miette::{Context, IntoDiagnostic, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cochange_core::{CochangeConfig, LabelMatch, OutputFormat, ReportStyle};
use cochange_history::reader::{ensure_repository, GitLog, HistorySource, LogFile};
use cochange_history::report::{self, CoChangeReport};

#[derive(Parser)]
#[command(
    name = "cochange",
    version,
    about = "Find files that keep changing together in git history",
    long_about = "Find files that keep changing together in git history.\n\n\
                   Reads `git log --name-only`, counts how many commits touched each pair\n\
                   of files, and writes the ranked pairs to a CSV report.\n\n\
                   Examples:\n  \
                     cochange pairs                     Basic report for the current repo\n  \
                     cochange pairs --detailed          Also list the commits behind each pair\n  \
                     git log --pretty=format: --name-only | cochange pairs --log -\n  \
                     cochange doctor                    Check setup and environment"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .cochange.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Console output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Format of the summary printed to stdout.\n\n\
                       The CSV report file is written regardless.\n\n\
                       Formats:\n  \
                         text      Human-readable table (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Count co-changed file pairs and write the CSV report
    #[command(long_about = "Count co-changed file pairs and write the CSV report.\n\n\
        Every commit touching two or more files adds one to the count of each pair\n\
        of those files. With --detailed, each pair is followed by the commits\n\
        (date : hash) in which it changed, in reverse log order (oldest first).\n\n\
        Examples:\n  cochange pairs --path ../service\n  cochange pairs --detailed --output-dir reports\n  cochange pairs --log saved.log --output pairs.csv")]
    Pairs(PairsArgs),
    /// Create a default .cochange.toml configuration file
    #[command(long_about = "Create a default .cochange.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .cochange.toml already exists.")]
    Init,
    /// Check your setup and environment
    Doctor {
        /// Repository path (default: current directory)
        #[arg(long, default_value = ".")]
        path: PathBuf,
    },
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
struct PairsArgs {
    /// Repository path (default: current directory)
    #[arg(long, default_value = ".")]
    path: PathBuf,

    /// Also record the commits behind every pair
    #[arg(long)]
    detailed: bool,

    /// Read a captured `git log --name-only` log instead of running git ("-" for stdin)
    #[arg(long)]
    log: Option<PathBuf>,

    /// Report file, relative to the current directory (overrides --output-dir)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Report directory, relative to --path (default: Artifacts)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// How commit label lines are recognised in detailed logs
    #[arg(
        long,
        long_help = "How `<date> : <hash>` label lines are recognised in detailed logs.\n\n\
            strict  A valid YYYY-MM-DD date followed by a hex commit id (default)\n\
            loose   Any line starting with \"20\", as older reports did"
    )]
    label_match: Option<LabelMatch>,

    /// Maximum pairs to show in the summary (default: 20)
    #[arg(long, default_value = "20")]
    limit: usize,
}

const DEFAULT_CONFIG: &str = r#"# cochange configuration

[output]
# dir = "Artifacts"
# basic_file = "recurrent_file_changes.csv"
# detailed_file = "recurrent_file_changes_detiled.csv"

[parser]
# strict: "YYYY-MM-DD : <hash>" labels only; loose: any line starting with "20"
# label_match = "strict"

[history]
# git = "git"
"#;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<CochangeConfig> {
    match path {
        Some(path) => {
            CochangeConfig::from_file(path).wrap_err(format!("loading {}", path.display()))
        }
        None => {
            let default_path = Path::new(".cochange.toml");
            if default_path.exists() {
                Ok(CochangeConfig::from_file(default_path)?)
            } else {
                Ok(CochangeConfig::default())
            }
        }
    }
}

fn spinner(message: &'static str) -> Option<indicatif::ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = indicatif::ProgressBar::new_spinner();
    if let Ok(style) = indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
    {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    Some(pb)
}

fn print_summary(report: &CoChangeReport, format: OutputFormat, limit: usize) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", report::format_json(report)?),
        OutputFormat::Markdown => print!("{}", report::format_markdown(report, limit)),
        OutputFormat::Text => print!("{}", report::format_text(report, limit)),
    }
    Ok(())
}

fn run_pairs(config: &CochangeConfig, format: OutputFormat, args: PairsArgs) -> Result<()> {
    let style = if args.detailed {
        ReportStyle::Detailed
    } else {
        ReportStyle::Basic
    };
    let label_match = args.label_match.unwrap_or(config.parser.label_match);
    let path = args.path.as_path();

    let source: Box<dyn HistorySource> = match &args.log {
        Some(log) => {
            eprintln!("Reading captured log {} ({style} report)...", log.display());
            Box::new(LogFile::new(log))
        }
        None => {
            ensure_repository(path)?;
            eprintln!("Reading git history at {} ({style} report)...", path.display());
            Box::new(GitLog::new(path, config.history.git.clone()))
        }
    };

    let pb = spinner("Reading history...");
    let result = cochange_history::analyze(&*source, style, label_match);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let report = result?;
    eprintln!(
        "Analyzed {} commits, found {} co-changed pairs.",
        report.commits_analyzed, report.pairs_found
    );

    let report_path = match (args.output, args.output_dir) {
        (Some(file), _) => file,
        (None, Some(dir)) => {
            let mut output_config = config.output.clone();
            output_config.dir = dir.to_string_lossy().into_owned();
            output_config.report_path(path, style)
        }
        (None, None) => config.output.report_path(path, style),
    };

    report::save_report(&report_path, &report.pairs, style)
        .wrap_err(format!("writing {}", report_path.display()))?;
    eprintln!("Report written to {}", report_path.display());

    print_summary(&report, format, args.limit)
}

#[derive(serde::Serialize)]
struct CheckResult {
    name: &'static str,
    status: &'static str,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "pass",
            detail: detail.into(),
            hint: None,
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: "fail",
            detail: detail.into(),
            hint: Some(hint.into()),
        }
    }

    fn info(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "info",
            detail: detail.into(),
            hint: None,
        }
    }

    fn symbol(&self) -> &'static str {
        match self.status {
            "pass" => "\u{2713}",
            "fail" => "\u{2717}",
            _ => "~",
        }
    }
}

fn run_doctor(
    config: &CochangeConfig,
    config_path: Option<&Path>,
    path: &Path,
    format: OutputFormat,
) -> Result<()> {
    let mut checks: Vec<CheckResult> = Vec::new();

    match std::process::Command::new(&config.history.git)
        .arg("--version")
        .output()
    {
        Ok(out) if out.status.success() => checks.push(CheckResult::pass(
            "git",
            String::from_utf8_lossy(&out.stdout).trim().to_string(),
        )),
        _ => checks.push(CheckResult::fail(
            "git",
            format!("`{}` could not be run", config.history.git),
            "Install git or set [history] git in .cochange.toml",
        )),
    }

    match ensure_repository(path) {
        Ok(()) => checks.push(CheckResult::pass(
            "git_repo",
            format!("{} is a git repository", path.display()),
        )),
        Err(_) => checks.push(CheckResult::fail(
            "git_repo",
            format!("{} is not a git repository", path.display()),
            "Run from inside a repository, or pass --path",
        )),
    }

    let config_file = config_path.unwrap_or(Path::new(".cochange.toml"));
    if config_file.exists() {
        checks.push(CheckResult::pass(
            "config",
            format!("{} loaded", config_file.display()),
        ));
    } else {
        checks.push(CheckResult::info(
            "config",
            "no .cochange.toml, using defaults (run `cochange init` to create one)",
        ));
    }

    checks.push(CheckResult::info(
        "output",
        format!("reports go to {}", config.output.resolve_dir(path).display()),
    ));

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "version": env!("CARGO_PKG_VERSION"),
                "checks": checks,
            });
            println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        }
        _ => {
            println!("cochange v{} environment check\n", env!("CARGO_PKG_VERSION"));
            for check in &checks {
                let label = check.name.replace('_', " ");
                println!("  {} {label:<12} {}", check.symbol(), check.detail);
                if let Some(hint) = &check.hint {
                    println!("    hint: {hint}");
                }
            }
            let failed = checks.iter().filter(|c| c.status == "fail").count();
            println!("\n{} checks, {failed} failed", checks.len());
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(format = %cli.format, ?config, "configuration resolved");

    match cli.command {
        None => {
            let mut cmd = Cli::command();
            cmd.print_help().into_diagnostic()?;
        }
        Some(Command::Pairs(args)) => {
            run_pairs(&config, cli.format, args)?;
        }
        Some(Command::Init) => {
            let path = Path::new(".cochange.toml");
            if path.exists() {
                miette::bail!(".cochange.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .cochange.toml with default configuration");
        }
        Some(Command::Doctor { path }) => {
            run_doctor(&config, cli.config.as_deref(), &path, cli.format)?;
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "cochange", &mut std::io::stdout());
        }
    }

    Ok(())
}
