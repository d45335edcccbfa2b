use std::fs;
use std::process::Command;

use tempfile::TempDir;

// These tests only exercise invocations that exit before a window (or file
// dialog) could appear, so they stay headless-safe.

#[test]
fn help_exits_cleanly() {
    let status = Command::new(env!("CARGO_BIN_EXE_dxtview"))
        .arg("--help")
        .status()
        .expect("failed to run dxtview --help");
    assert!(status.success());
}

#[test]
fn malformed_size_is_rejected_before_any_window() {
    let root = TempDir::new().unwrap();
    let config_dir = root.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_dxtview"))
        .env("DXTVIEW_CONFIG_DIR", &config_dir)
        .args(["texture.dds", "--size", "not-a-size"])
        .output()
        .expect("failed to run dxtview");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not-a-size"), "stderr was: {stderr}");
}

#[test]
fn malformed_settings_file_fails_fast() {
    let root = TempDir::new().unwrap();
    let config_dir = root.path().join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("settings.toml"), "fit = [broken").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_dxtview"))
        .env("DXTVIEW_CONFIG_DIR", &config_dir)
        .arg("texture.dds")
        .output()
        .expect("failed to run dxtview");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("settings"), "stderr was: {stderr}");
}

#[test]
fn invalid_fit_flag_is_rejected_by_clap() {
    let status = Command::new(env!("CARGO_BIN_EXE_dxtview"))
        .args(["--fit", "sideways"])
        .status()
        .expect("failed to run dxtview");
    assert!(!status.success());
}
