//! End-to-end runs of the md5tree binary.

use super::test_utils::{md5_line, TreeFixture};
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn md5tree(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_md5tree"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("MD5TREE_LOG")
        .env_remove("MD5TREE_RUN__JOBS")
        .output()
        .unwrap()
}

fn empty_config(fixture: &TreeFixture) -> std::path::PathBuf {
    let path = fixture.temp.path().join("md5tree.toml");
    fs::write(&path, "").unwrap();
    path
}

#[test]
fn test_successful_run_exits_zero_with_progress_lines() {
    let fixture = TreeFixture::new(&[("x/y.txt", "hello")]);
    let config = empty_config(&fixture);
    let output = md5tree(
        &config,
        &[
            fixture.source.to_str().unwrap(),
            fixture.destination.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\rDONE        "));
    assert!(stdout.contains("y.txt"));
    assert_eq!(fixture.artifact("x/y.txt.md5"), md5_line(b"hello"));
}

#[test]
fn test_json_summary_on_stdout() {
    let fixture = TreeFixture::new(&[("a.txt", "a"), ("d/b.txt", "b")]);
    let config = empty_config(&fixture);
    let output = md5tree(
        &config,
        &[
            "--progress",
            "off",
            "--summary",
            "json",
            fixture.source.to_str().unwrap(),
            fixture.destination.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["files_digested"], 2);
    assert_eq!(summary["directories_aggregated"], 1);
    assert_eq!(summary["mode"], "generate");
}

#[test]
fn test_missing_arguments_exit_one() {
    let fixture = TreeFixture::new(&[]);
    let config = empty_config(&fixture);
    let output = md5tree(&config, &[fixture.source.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_invalid_directory_exits_one() {
    let fixture = TreeFixture::new(&[]);
    let config = empty_config(&fixture);
    let missing = fixture.temp.path().join("nope");
    let output = md5tree(
        &config,
        &[
            missing.to_str().unwrap(),
            fixture.destination.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is not a valid directory."));
}

#[test]
fn test_help_exits_zero() {
    let fixture = TreeFixture::new(&[]);
    let config = empty_config(&fixture);
    let output = md5tree(&config, &["--help"]);
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_verify_exit_codes() {
    let fixture = TreeFixture::new(&[("f.txt", "original")]);
    let config = empty_config(&fixture);
    let dirs = [
        fixture.source.to_str().unwrap(),
        fixture.destination.to_str().unwrap(),
    ];
    assert_eq!(md5tree(&config, &dirs).status.code(), Some(0));

    let verify = ["--verify", dirs[0], dirs[1]];
    assert_eq!(md5tree(&config, &verify).status.code(), Some(0));

    fs::write(fixture.source.join("f.txt"), "tampered").unwrap();
    let output = md5tree(&config, &verify);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("MISMATCH"));
}

#[test]
fn test_per_entity_failure_still_exits_zero() {
    let fixture = TreeFixture::new(&[("blocked/a.txt", "a"), ("free/b.txt", "b")]);
    let config = empty_config(&fixture);
    // A plain file where the mirrored directory must be created
    fs::write(fixture.destination.join("blocked"), "in the way").unwrap();

    let output = md5tree(
        &config,
        &[
            fixture.source.to_str().unwrap(),
            fixture.destination.to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("ERROR:").count(), 1, "stdout: {stdout}");
    assert!(stdout.contains("Failures (1)"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("can't create directory"),
        "failure logged at the default level: {stderr}"
    );
    assert_eq!(fixture.artifact("free/b.txt.md5"), md5_line(b"b"));
    assert!(fixture.destination.join("free.dir.md5").is_file());
}

#[test]
fn test_print_config_renders_toml() {
    let fixture = TreeFixture::new(&[]);
    let config = fixture.temp.path().join("md5tree.toml");
    fs::write(&config, "[run]\njobs = 6\n").unwrap();
    let output = md5tree(&config, &["--print-config"]);

    assert_eq!(output.status.code(), Some(0));
    let rendered: toml::Value =
        toml::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    assert_eq!(rendered["run"]["jobs"].as_integer(), Some(6));
}
