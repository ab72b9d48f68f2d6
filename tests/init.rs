use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_cochange"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "cochange init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config_path = dir.path().join(".cochange.toml");
    assert!(config_path.exists(), ".cochange.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[output]"));
    assert!(content.contains("[parser]"));

    // The commented template must parse back to the defaults.
    let config: cochange_core::CochangeConfig = toml::from_str(&content).unwrap();
    assert_eq!(config.output.dir, "Artifacts");
    assert_eq!(
        config.output.detailed_file,
        "recurrent_file_changes_detiled.csv"
    );
    assert_eq!(config.parser.label_match, cochange_core::LabelMatch::Strict);
    assert_eq!(config.history.git, "git");
}

#[test]
fn init_template_loads_through_config_flag() {
    let dir = tempfile::tempdir().unwrap();
    let cochange = |args: &[&str]| {
        Command::new(env!("CARGO_BIN_EXE_cochange"))
            .args(args)
            .current_dir(dir.path())
            .output()
            .unwrap()
    };

    assert!(cochange(&["init"]).status.success());
    std::fs::write(dir.path().join("basic.log"), "a\nb\n").unwrap();

    let output = cochange(&["--config", ".cochange.toml", "pairs", "--log", "basic.log"]);
    assert!(
        output.status.success(),
        "pairs with generated config failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(dir
        .path()
        .join("Artifacts/recurrent_file_changes.csv")
        .exists());
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".cochange.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_cochange"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
}
