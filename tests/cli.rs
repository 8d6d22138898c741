//! Integration tests for the `sprd` command line.

use std::path::Path;
use std::process::Command;

fn run_sprd(config: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_sprd"))
        // Tests must not depend on a user's ~/.config/sprd/config.toml.
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("Failed to execute sprd");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

fn empty_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, "").unwrap();
    path
}

#[test]
fn test_set_and_print() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    let (stdout, _, code) = run_sprd(
        &config,
        &["-s", "a1=5", "-s", "B1==A1*2", "-s", "C1==B1+a1"],
    );
    assert_eq!(code, 0);
    assert_eq!(stdout, "A1\t5\t5\nB1\t=A1*2\t10\nC1\t=B1+A1\t15\n");
}

#[test]
fn test_error_value_is_printed() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    let (stdout, _, code) = run_sprd(&config, &["-s", "A1==1/0"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("A1\t=1/0\t#ERR! "));
    assert!(stdout.contains("division by zero"));
}

#[test]
fn test_save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    let file = dir.path().join("sheet.sprd");
    let file_arg = file.to_str().unwrap();

    let (_, _, code) = run_sprd(&config, &[file_arg, "-s", "A1=2", "-s", "B1==A1+1"]);
    assert_eq!(code, 0);
    assert!(file.exists());

    let (stdout, _, code) = run_sprd(&config, &[file_arg, "-s", "A1=10"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "A1\t10\t10\nB1\t=A1+1\t11\n");

    let (stdout, _, code) = run_sprd(&config, &[file_arg]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "A1\t10\t10\nB1\t=A1+1\t11\n");
}

#[test]
fn test_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    let out = dir.path().join("copy.sprd");

    let (_, _, code) = run_sprd(&config, &["-s", "A1=hello", "-o", out.to_str().unwrap()]);
    assert_eq!(code, 0);
    let saved = std::fs::read_to_string(&out).unwrap();
    assert!(saved.contains("\"StringForm\": \"hello\""));
    assert!(saved.contains("\"Version\": \"default\""));
}

#[test]
fn test_circular_reference_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    let (_, stderr, code) = run_sprd(&config, &["-s", "A1==B1", "-s", "B1==A1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("circular dependency"));
}

#[test]
fn test_config_version_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    let file = dir.path().join("sheet.sprd");
    let file_arg = file.to_str().unwrap();
    let (_, _, code) = run_sprd(&config, &[file_arg, "-s", "A1=1"]);
    assert_eq!(code, 0);

    let versioned = dir.path().join("versioned.toml");
    std::fs::write(&versioned, "version = \"2\"\n").unwrap();
    let (_, stderr, code) = run_sprd(&versioned, &[file_arg]);
    assert_eq!(code, 1);
    assert!(stderr.contains("version mismatch"));
}

#[test]
fn test_grid_config_rejects_names() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("grid.toml");
    std::fs::write(&config, "[grid]\ncolumns = 2\nrows = 2\n").unwrap();

    let (_, stderr, code) = run_sprd(&config, &["-s", "C1=1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("invalid cell name"));
}

#[test]
fn test_bad_assignment() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    let (_, stderr, code) = run_sprd(&config, &["-s", "A1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("expected NAME=CONTENT"));
}

#[test]
fn test_unknown_option() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    let (_, stderr, code) = run_sprd(&config, &["--frobnicate"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown option"));
}

#[test]
fn test_extension_is_added() {
    let dir = tempfile::tempdir().unwrap();
    let config = empty_config(dir.path());
    let bare = dir.path().join("budget");

    let (_, _, code) = run_sprd(&config, &[bare.to_str().unwrap(), "-s", "A1=1"]);
    assert_eq!(code, 0);
    assert!(dir.path().join("budget.sprd").exists());
    assert!(!bare.exists());
}
