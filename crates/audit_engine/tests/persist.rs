use std::fs;

use audit_core::{export_links, LinkSuggestion};
use audit_engine::{ensure_output_dir, ArtifactWriter, PersistError};
use tempfile::TempDir;

fn artifact(anchor: &str) -> audit_core::CsvArtifact {
    let link = LinkSuggestion {
        source_url: "https://a.example".into(),
        target_url: "https://b.example".into(),
        anchor_text: anchor.into(),
        similarity: 0.9,
        same_language: true,
    };
    export_links([&link]).unwrap()
}

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn delivery_replaces_earlier_export() {
    let temp = TempDir::new().unwrap();
    let writer = ArtifactWriter::new(temp.path().join("exports"));

    let first = writer.deliver(&artifact("first")).unwrap();
    assert_eq!(first.file_name().unwrap(), "internal_links.csv");
    assert!(fs::read_to_string(&first).unwrap().contains("\"first\""));

    let second = writer.deliver(&artifact("second")).unwrap();
    assert_eq!(first, second);
    let body = fs::read_to_string(&second).unwrap();
    assert!(body.contains("\"second\""));
    assert!(!body.contains("\"first\""));
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = ArtifactWriter::new(file_path.clone());
    let err = writer.deliver(&artifact("x")).unwrap_err();
    assert!(matches!(err, PersistError::OutputDir { ref dir, .. } if *dir == file_path));
    assert!(!file_path.with_file_name("internal_links.csv").exists());
    assert_eq!(fs::read_to_string(&file_path).unwrap(), "x");
}

#[test]
fn leaves_no_staging_files_behind() {
    let temp = TempDir::new().unwrap();
    let writer = ArtifactWriter::new(temp.path().to_path_buf());
    writer.deliver(&artifact("only")).unwrap();

    let names: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec!["internal_links.csv"]);
}
