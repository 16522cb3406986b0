//! CLI Integration Tests for ragwire
//!
//! Runs the built binary. Only commands that need no network are exercised.

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper to run ragwire with arguments inside `dir`
fn run_ragwire(args: &[&str], dir: &TempDir) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ragwire"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute ragwire")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_command() {
    let dir = TempDir::new().unwrap();
    let output = run_ragwire(&["--help"], &dir);

    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("sections"));
    assert!(stdout.contains("query"));
    assert!(stdout.contains("config"));
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    let output = run_ragwire(&["--version"], &dir);

    assert!(output.status.success());
    assert!(stdout(&output).contains("ragwire"));
}

// =============================================================================
// Sections Command Tests
// =============================================================================

#[test]
fn test_sections_json() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("guide.md"),
        "Intro\n\n# Install\n\nRun the installer.\n\n## Linux\n\nUse the tarball.\n",
    )
    .unwrap();

    let output = run_ragwire(&["sections", "guide.md", "--json"], &dir);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let sections: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let sections = sections.as_array().unwrap();
    assert_eq!(sections.len(), 3);
    assert!(sections[0]["heading"].is_null());
    assert_eq!(sections[1]["heading"], "Install");
    assert_eq!(sections[2]["level"], 2);
}

#[test]
fn test_sections_max_level() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("guide.md"),
        "# Install\n\nRun the installer.\n\n## Linux\n\nUse the tarball.\n",
    )
    .unwrap();

    let output = run_ragwire(&["sections", "guide.md", "--json", "--max-level", "1"], &dir);
    assert!(output.status.success());

    let sections: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(sections.as_array().map(Vec::len), Some(1));
}

#[test]
fn test_sections_plain_output() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("guide.md"), "# Install\n\nRun the installer.\n").unwrap();

    let output = run_ragwire(&["--no-color", "sections", "guide.md"], &dir);
    assert!(output.status.success());
    let stdout = stdout(&output);
    assert!(stdout.contains("[0] Install"));
    assert!(stdout.contains("[OK] 1 sections"));
}

#[test]
fn test_sections_rejects_non_markdown() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.txt"), "text").unwrap();

    let output = run_ragwire(&["sections", "notes.txt"], &dir);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown file type"));
}

// =============================================================================
// Query Command Tests
// =============================================================================

#[test]
fn test_query_unknown_file_type_fails_before_embedding() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.txt"), "text").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_ragwire"))
        .args(["query", "--file", "notes.txt", "what?"])
        .current_dir(dir.path())
        .env_remove("OPENAI_API_KEY")
        .output()
        .expect("Failed to execute ragwire");

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown file type: notes.txt"));
}

#[test]
fn test_query_requires_source() {
    let dir = TempDir::new().unwrap();
    let output = run_ragwire(&["query", "what?"], &dir);
    assert!(!output.status.success());
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
fn test_config_defaults_without_file() {
    let dir = TempDir::new().unwrap();
    let output = run_ragwire(&["--no-color", "config"], &dir);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("(defaults)"));
    assert!(stdout.contains("embeddings.provider: openai"));
    assert!(stdout.contains("retrieval.k: 4"));
    assert!(stdout.contains("retrieval.index: flat"));
}

#[test]
fn test_config_validate_ollama_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("ragwire.toml"),
        r#"
[embeddings]
provider = "ollama"
model = "nomic-embed-text"

[retrieval]
k = 2
index = "hnsw"
"#,
    )
    .unwrap();

    let output = run_ragwire(&["--no-color", "config", "--validate"], &dir);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let stdout = stdout(&output);
    assert!(stdout.contains("embeddings.provider: ollama"));
    assert!(stdout.contains("retrieval.index: hnsw"));
    assert!(stdout.contains("[OK] Configuration is valid"));
}

#[test]
fn test_config_validate_missing_env_var() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("ragwire.toml"),
        "[embeddings]\nprovider = \"openai\"\napi_key_env = \"RAGWIRE_CLI_TEST_UNSET_KEY\"\n",
    )
    .unwrap();

    let output = run_ragwire(&["--no-color", "config", "--validate"], &dir);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("RAGWIRE_CLI_TEST_UNSET_KEY"));
}

#[test]
fn test_config_invalid_toml_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("ragwire.toml"),
        "[web]\nchunk_size = 100\nchunk_overlap = 100\n",
    )
    .unwrap();

    let output = run_ragwire(&["config"], &dir);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("chunk_overlap"));
}

#[test]
fn test_explicit_missing_config_fails() {
    let dir = TempDir::new().unwrap();
    let output = run_ragwire(&["--config", "nope.toml", "config"], &dir);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("nope.toml"));
}
