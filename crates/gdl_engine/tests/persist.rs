use std::fs;

use gdl_engine::{ensure_output_dir, AtomicFileWriter, PersistError};
use tempfile::TempDir;

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("videos").join("2024");
    assert!(!nested.exists());

    ensure_output_dir(&nested).unwrap();
    assert!(nested.is_dir());
}

#[test]
fn rejects_file_as_output_dir() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("settings.ron");
    fs::write(&file, "x").unwrap();

    let err = ensure_output_dir(&file).unwrap_err();
    assert!(matches!(err, PersistError::OutputDir { .. }));
}

#[test]
fn atomic_write_replaces_previous_content() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().join("config"));

    let first = writer.write("settings.ron", "(output_dir: None)").unwrap();
    assert_eq!(fs::read_to_string(&first).unwrap(), "(output_dir: None)");

    let second = writer
        .write("settings.ron", "(output_dir: Some(\"/srv\"))")
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(
        fs::read_to_string(&second).unwrap(),
        "(output_dir: Some(\"/srv\"))"
    );
}
