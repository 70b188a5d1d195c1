//! Parses every fixture template and checks losslessness.

use std::fs;
use std::path::{Path, PathBuf};

use blade_parser::parse;

fn get_fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("test-fixtures")
}

fn collect_templates(dir: &Path, files: &mut Vec<PathBuf>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect_templates(&path, files);
        } else if path.to_string_lossy().ends_with(".blade.php") {
            files.push(path);
        }
    }
}

#[test]
fn test_valid_corpus_parses_cleanly() {
    let dir = get_fixtures_dir().join("valid");
    let mut files = Vec::new();
    collect_templates(&dir, &mut files);
    files.sort();
    assert!(!files.is_empty(), "No valid fixtures found in {dir:?}");

    for path in files {
        let source = fs::read_to_string(&path).unwrap();
        let result = parse(&source);
        assert!(
            result.errors.is_empty(),
            "{} produced errors: {:?}",
            path.display(),
            result.errors
        );
        assert!(
            result.diagnostics.is_empty(),
            "{} produced lexer diagnostics: {:?}",
            path.display(),
            result.diagnostics
        );
        assert_eq!(
            result.document.render(),
            source,
            "{} did not round-trip",
            path.display()
        );
    }
}

#[test]
fn test_recovery_corpus_round_trips() {
    let dir = get_fixtures_dir().join("recovery");
    let mut files = Vec::new();
    collect_templates(&dir, &mut files);
    files.sort();
    assert!(!files.is_empty(), "No recovery fixtures found in {dir:?}");

    // Malformed templates still render back verbatim.
    for path in files {
        let source = fs::read_to_string(&path).unwrap();
        let result = parse(&source);
        assert_eq!(
            result.document.render(),
            source,
            "{} did not round-trip",
            path.display()
        );
    }
}
