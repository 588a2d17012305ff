//! File extraction through [`FileTextExtractor`].

use std::fs;

use cvsift_ingest::{BackendError, FileTextExtractor, TextExtractor};

#[test]
fn reads_plain_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jane.txt");
    fs::write(&path, "Jane Doe\nSkills\nRust").unwrap();

    let text = FileTextExtractor::new().extract_text(&path).unwrap();
    assert_eq!(text, "Jane Doe\nSkills\nRust");
}

#[test]
fn extension_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("NOTES.MD");
    fs::write(&path, "# Jane").unwrap();
    assert_eq!(FileTextExtractor::new().extract_text(&path).unwrap(), "# Jane");
}

#[test]
fn html_reduced_to_visible_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.html");
    fs::write(
        &path,
        "<html><body><h1>Jane Doe</h1><script>track()</script><p>1,024 connections</p></body></html>",
    )
    .unwrap();

    let text = FileTextExtractor::new().extract_text(&path).unwrap();
    assert_eq!(text, "Jane Doe\n1,024 connections");
}

#[test]
fn unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cv.docx");
    fs::write(&path, b"PK\x03\x04").unwrap();

    match FileTextExtractor::new().extract_text(&path) {
        Err(BackendError::Unsupported(ext)) => assert_eq!(ext, ".docx"),
        other => panic!("expected Unsupported, got {other:?}"),
    }
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.txt");
    assert!(matches!(
        FileTextExtractor::new().extract_text(&path),
        Err(BackendError::Io(_))
    ));
}

#[test]
fn invalid_utf8_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latin1.txt");
    fs::write(&path, [0x4a, 0x6f, 0x73, 0xe9]).unwrap();
    assert!(matches!(
        FileTextExtractor::new().extract_text(&path),
        Err(BackendError::Read(_))
    ));
}
