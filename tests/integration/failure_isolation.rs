//! One bad entity never stops the run.

use super::test_utils::{md5_line, TreeFixture};
use md5tree::pipeline::RunOptions;
use std::fs;

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_the_only_failure() {
    use std::os::unix::fs::PermissionsExt;

    let fixture = TreeFixture::new(&[
        ("ok/first.txt", "first"),
        ("ok/locked.txt", "secret"),
        ("ok/second.txt", "second"),
    ]);
    let locked = fixture.source.join("ok").join("locked.txt");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::File::open(&locked).is_ok() {
        // Running with privileges that ignore file modes
        return;
    }

    let summary = fixture.run(RunOptions::default());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(summary.files_digested, 2);
    assert_eq!(summary.files_failed, 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].kind, "read_failure");
    assert!(summary.failures[0].path.ends_with("ok/locked.txt"));

    assert!(!fixture.destination.join("ok/locked.txt.md5").exists());
    assert_eq!(fixture.artifact("ok/first.txt.md5"), md5_line(b"first"));
    assert_eq!(fixture.artifact("ok/second.txt.md5"), md5_line(b"second"));
    assert_eq!(summary.directories_aggregated, 1);
}

#[test]
fn test_blocked_mirror_directory_fails_only_its_files() {
    let fixture = TreeFixture::new(&[("blocked/a.txt", "a"), ("free/b.txt", "b")]);
    // A plain file where the mirrored directory must be created
    fs::write(fixture.destination.join("blocked"), "in the way").unwrap();

    let summary = fixture.run(RunOptions::default());

    assert_eq!(summary.files_failed, 1);
    assert_eq!(summary.failures[0].kind, "directory_create_failure");
    assert_eq!(fixture.artifact("free/b.txt.md5"), md5_line(b"b"));
    assert!(fixture.destination.join("free.dir.md5").is_file());
}
