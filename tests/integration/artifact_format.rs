//! Artifact files: what the pipeline writes and what the reader accepts.

use super::test_utils::TreeFixture;
use md5tree::pipeline::RunOptions;
use md5tree::tree::artifact::read_hash_from_md5_file;
use md5tree::types::DigestArtifact;
use std::fs;

const ABC: &str = "900150983cd24fb0d6963f7d28e17f72";

#[test]
fn test_written_artifacts_are_one_lowercase_line() {
    let fixture = TreeFixture::new(&[("a/b.txt", "abc")]);
    fixture.run(RunOptions::default());

    for rel in ["a/b.txt.md5", "a.dir.md5"] {
        let bytes = fs::read(fixture.destination.join(rel)).unwrap();
        assert_eq!(bytes.len(), 33, "{rel}");
        assert_eq!(bytes[32], b'\n');
        assert!(bytes[..32]
            .iter()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(b)));
    }
    assert_eq!(fixture.artifact("a/b.txt.md5"), format!("{ABC}\n"));
}

#[test]
fn test_reader_round_trips_written_artifact() {
    let fixture = TreeFixture::new(&[("b.txt", "abc")]);
    fixture.run(RunOptions::default());

    let read = read_hash_from_md5_file(&fixture.destination.join("b.txt.md5")).unwrap();
    assert_eq!(read, Some(DigestArtifact::parse(ABC).unwrap()));
}

#[test]
fn test_reader_accepts_bare_upper_case_line() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("bare.md5");
    fs::write(&path, format!("{}  \r\n", ABC.to_uppercase())).unwrap();
    assert_eq!(
        read_hash_from_md5_file(&path).unwrap().unwrap().as_str(),
        ABC
    );
}

#[test]
fn test_reader_accepts_commented_star_listing() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("listing.md5");
    fs::write(
        &path,
        format!("; generated by a checksum tool\n\n{} *abc.txt\n", ABC.to_uppercase()),
    )
    .unwrap();
    assert_eq!(
        read_hash_from_md5_file(&path).unwrap().unwrap().as_str(),
        ABC
    );
}

#[test]
fn test_reader_returns_none_for_unrecognized_content() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("junk.md5");
    fs::write(&path, "; only a comment\nnot a checksum line\n").unwrap();
    assert_eq!(read_hash_from_md5_file(&path).unwrap(), None);
}

#[test]
fn test_reader_missing_file_is_error() {
    let temp = tempfile::TempDir::new().unwrap();
    assert!(read_hash_from_md5_file(&temp.path().join("absent.md5")).is_err());
}
