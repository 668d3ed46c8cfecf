//! Catalog discovery over a real directory tree.

mod common;

use std::fs;

use common::{ramp, write_wav};
use tempfile::TempDir;
use wavstream::{Catalog, StdStorage};

fn build(dir: &TempDir, max_files: usize) -> Catalog {
    let mut storage = StdStorage::new();
    Catalog::build(&mut storage, dir.path().to_str().unwrap(), max_files).unwrap()
}

#[test]
fn discovery_keeps_matches_and_ignores_the_rest() {
    let dir = TempDir::new().unwrap();
    write_wav(dir.path(), "kick.wav", &[1, 2]);
    write_wav(dir.path(), "SNARE.WAV", &[3, 4]);
    write_wav(dir.path(), ".quiet.wav", &[5, 6]); // hidden
    fs::write(dir.path().join("readme.txt"), b"not audio").unwrap();
    fs::create_dir(dir.path().join("loops.wav")).unwrap(); // directory, despite the name

    let catalog = build(&dir, 60);

    let mut names: Vec<&str> = catalog.entries().iter().map(|e| e.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["SNARE.WAV", "kick.wav"]);
    assert_eq!(catalog.skipped(), 0);
    assert!(!catalog.truncated());
}

#[test]
fn header_math_survives_the_round_trip_to_disk() {
    let dir = TempDir::new().unwrap();
    write_wav(dir.path(), "ramp.wav", &ramp(96_000));

    let catalog = build(&dir, 60);
    let entry = catalog.entry(0).unwrap();

    assert_eq!(entry.total_samples, 96_000);
    assert_eq!(entry.header.payload_offset(), 60);
    assert_eq!(
        entry.header.file_size,
        entry.header.payload_offset() + 2 * entry.total_samples
    );
    assert_eq!(entry.display_string(48_000), "ramp.wav (00:02)");
}

#[test]
fn table_records_at_most_max_files_minus_one() {
    let dir = TempDir::new().unwrap();
    for i in 0..10 {
        write_wav(dir.path(), &format!("f{i}.wav"), &[0, 1]);
    }

    let catalog = build(&dir, 8);
    assert_eq!(catalog.len(), 7);
    assert!(catalog.truncated());

    let catalog = build(&dir, 60);
    assert_eq!(catalog.len(), 10);
    assert!(!catalog.truncated());
}

#[test]
fn unreadable_files_are_skipped_without_failing_the_build() {
    let dir = TempDir::new().unwrap();
    write_wav(dir.path(), "good.wav", &[1, 2, 3, 4]);
    fs::write(dir.path().join("stub.wav"), [0u8; 10]).unwrap(); // shorter than a header

    let catalog = build(&dir, 60);

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.entry(0).unwrap().name, "good.wav");
    assert_eq!(catalog.skipped(), 1);
}

#[test]
fn missing_directory_aborts_the_build() {
    let mut storage = StdStorage::new();
    let result = Catalog::build(&mut storage, "/definitely/not/here", 60);
    assert!(result.is_err());
}
