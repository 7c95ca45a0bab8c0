//! Directory aggregates are reproducible and independent of tuning knobs.

use super::test_utils::{md5_line, TreeFixture};
use md5tree::pipeline::RunOptions;
use md5tree::tree::hasher::DigestOptions;
use std::fs;

fn sample_files() -> Vec<(&'static str, &'static str)> {
    vec![
        ("docs/readme.md", "# readme"),
        ("docs/guide/intro.md", "intro"),
        ("docs/guide/empty.md", ""),
        ("src/main.c", "int main(void) { return 0; }"),
        ("src/Z.h", "#pragma once"),
    ]
}

#[test]
fn test_aggregate_is_md5_of_sorted_child_contents() {
    let fixture = TreeFixture::new(&sample_files());
    fixture.run(RunOptions::default());

    // src holds main.c.md5 and Z.h.md5; byte order puts 'Z' before 'm'.
    let mut expected = fixture.artifact("src/Z.h.md5");
    expected.push_str(&fixture.artifact("src/main.c.md5"));
    assert_eq!(fixture.artifact("src.dir.md5"), md5_line(expected.as_bytes()));
}

#[test]
fn test_parent_includes_child_dir_artifact() {
    let fixture = TreeFixture::new(&sample_files());
    fixture.run(RunOptions::default());

    // docs holds guide.dir.md5 and readme.md.md5 as ordinary files.
    let mut expected = fixture.artifact("docs/guide.dir.md5");
    expected.push_str(&fixture.artifact("docs/readme.md.md5"));
    assert_eq!(
        fixture.artifact("docs.dir.md5"),
        md5_line(expected.as_bytes())
    );
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let first = TreeFixture::new(&sample_files());
    let second = TreeFixture::new(&sample_files());
    first.run(RunOptions::default());
    second.run(RunOptions::default());

    for rel in ["docs.dir.md5", "docs/guide.dir.md5", "src.dir.md5", "src/main.c.md5"] {
        assert_eq!(first.artifact(rel), second.artifact(rel), "{rel} differs");
    }
}

#[test]
fn test_block_size_and_jobs_do_not_change_results() {
    let reference = TreeFixture::new(&sample_files());
    reference.run(RunOptions::default());

    for (block_size, jobs) in [(1, 1), (3, 2), (64, 0), (1 << 16, 4)] {
        let fixture = TreeFixture::new(&sample_files());
        fixture.run(RunOptions {
            digest: DigestOptions {
                block_size,
                progress_interval: 1,
            },
            jobs,
            ..RunOptions::default()
        });
        for rel in ["docs.dir.md5", "docs/guide.dir.md5", "src.dir.md5", "src/Z.h.md5"] {
            assert_eq!(
                fixture.artifact(rel),
                reference.artifact(rel),
                "{rel} differs at block_size={block_size} jobs={jobs}"
            );
        }
    }
}

#[test]
fn test_directory_of_zero_byte_files_equals_empty_directory() {
    let fixture = TreeFixture::new(&[("zeros/a", ""), ("zeros/b", "")]);
    fs::create_dir_all(fixture.destination.join("empty")).unwrap();
    fixture.run(RunOptions::default());

    // zeros/ in the destination holds two non-empty .md5 files, so compare the
    // source-side aggregate directly.
    let zeros = md5tree::tree::aggregate::aggregate_directory(&fixture.source.join("zeros"), 1024)
        .unwrap();
    assert_eq!(zeros.as_str(), "d41d8cd98f00b204e9800998ecf8427e");
    assert_eq!(
        fixture.artifact("empty.dir.md5"),
        "d41d8cd98f00b204e9800998ecf8427e\n"
    );
}
