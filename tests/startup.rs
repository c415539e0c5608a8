//! Startup behaviour of the `waypoint` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use waypoint::lifecycle::startup::FAIL_FAST_EXIT_CODE;

fn write_config(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("waypoint-{}-{}.toml", name, std::process::id()));
    fs::write(&path, content).expect("Failed to write config");
    path
}

fn run_with_config(path: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_waypoint"))
        .arg("--config")
        .arg(path)
        .output()
        .expect("Failed to run waypoint")
}

#[test]
fn test_unparsable_config_exits_with_fail_fast_status() {
    let path = write_config("unparsable", "[listener\nbind_address = ");
    let output = run_with_config(&path);
    let _ = fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(FAIL_FAST_EXIT_CODE));
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("fatal:"), "stderr was: {}", stderr);
    assert!(stderr.contains("Failed to load configuration"));
}

#[test]
fn test_invalid_cors_config_exits_with_fail_fast_status() {
    let path = write_config(
        "cors",
        r#"
        [cors]
        enabled = true
        allowed_origins = ["*"]
        allow_credentials = true
        "#,
    );
    let output = run_with_config(&path);
    let _ = fs::remove_file(&path);

    assert_eq!(output.status.code(), Some(FAIL_FAST_EXIT_CODE));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("fatal:"), "stderr was: {}", stderr);
    assert!(stderr.contains("allow_credentials"));
}

#[test]
fn test_missing_config_file_exits_with_fail_fast_status() {
    let path = std::env::temp_dir().join("waypoint-does-not-exist.toml");
    let output = run_with_config(&path);

    assert_eq!(output.status.code(), Some(FAIL_FAST_EXIT_CODE));
    assert!(String::from_utf8_lossy(&output.stderr).contains("fatal:"));
}
