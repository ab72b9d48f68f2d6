use std::path::Path;
use std::process::{Command, Output};

fn cochange(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cochange"))
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap()
}

#[test]
fn captured_basic_log_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("basic.log"), "a.txt\nb.txt\n\na.txt\nc.txt\n\n").unwrap();

    let output = cochange(dir.path(), &["pairs", "--log", "basic.log"]);
    assert!(
        output.status.success(),
        "cochange pairs failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let csv = std::fs::read_to_string(dir.path().join("Artifacts/recurrent_file_changes.csv"))
        .unwrap();
    assert_eq!(csv, "File1,File2,Count\r\na.txt,b.txt,1\r\na.txt,c.txt,1\r\n");
}

#[test]
fn captured_detailed_log_writes_commit_rows() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("detailed.log"),
        "2024-01-01 : abc123\nx.txt\ny.txt\n\n2024-01-02 : def456\nx.txt\ny.txt\n",
    )
    .unwrap();

    let output = cochange(
        dir.path(),
        &["pairs", "--detailed", "--log", "detailed.log", "--output", "out/report.csv"],
    );
    assert!(output.status.success());

    let csv = std::fs::read_to_string(dir.path().join("out/report.csv")).unwrap();
    assert_eq!(
        csv,
        "File1,File2,Count\r\n\
         x.txt,y.txt,2\r\n\
         Details:,,\r\n\
         1: 2024-01-02 : def456,,\r\n\
         2: 2024-01-01 : abc123,,\r\n\
         ,,\r\n"
    );
}

#[test]
fn empty_detailed_log_reports_no_pairs() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("empty.log"), "").unwrap();

    let output = cochange(
        dir.path(),
        &["pairs", "--detailed", "--log", "empty.log", "--output-dir", "reports"],
    );
    assert!(output.status.success());

    let csv = std::fs::read_to_string(
        dir.path().join("reports/recurrent_file_changes_detiled.csv"),
    )
    .unwrap();
    assert_eq!(csv, "File1,File2,Count\r\nNo recurrent file changes found.\r\n");
}

#[test]
fn output_dir_follows_path_but_output_follows_cwd() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("svc")).unwrap();
    std::fs::write(dir.path().join("basic.log"), "a\nb\n").unwrap();

    let output = cochange(
        dir.path(),
        &["pairs", "--path", "svc", "--log", "basic.log", "--output-dir", "out"],
    );
    assert!(output.status.success());
    assert!(dir.path().join("svc/out/recurrent_file_changes.csv").exists());
    assert!(!dir.path().join("out").exists());

    let output = cochange(
        dir.path(),
        &["pairs", "--path", "svc", "--log", "basic.log", "--output", "pairs.csv"],
    );
    assert!(output.status.success());
    assert!(dir.path().join("pairs.csv").exists());
    assert!(!dir.path().join("svc/pairs.csv").exists());
}

#[test]
fn running_twice_reuses_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("basic.log"), "a\nb\n").unwrap();

    for _ in 0..2 {
        let output = cochange(dir.path(), &["pairs", "--log", "basic.log"]);
        assert!(output.status.success());
    }
}

#[test]
fn json_summary_goes_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("basic.log"), "a\nb\nc\n").unwrap();

    let output = cochange(dir.path(), &["--format", "json", "pairs", "--log", "basic.log"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["commitsAnalyzed"], 1);
    assert_eq!(json["pairsFound"], 3);
    assert_eq!(json["pairs"][0]["fileA"], "a");
}

#[test]
fn plain_directory_is_rejected_without_log() {
    let dir = tempfile::tempdir().unwrap();
    if inside_git_repo(dir.path()) {
        return;
    }

    let output = cochange(dir.path(), &["pairs"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not a git repository"), "stderr: {stderr}");
}

fn inside_git_repo(path: &Path) -> bool {
    Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .current_dir(path)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}
