// tests/manifest_validation.rs

//! End-to-end manifest flow: parse a published manifest, then validate
//! downloaded files on disk against their entries.

use rpmunit::checksum::checksum_bytes;
use rpmunit::manifest::{Manifest, ManifestError, MANIFEST_FILENAME};
use std::fs;
use url::Url;

fn base_url() -> Url {
    Url::parse("http://example.com/repo/").unwrap()
}

#[test]
fn parse_then_validate_downloaded_files() {
    let dir = tempfile::tempdir().unwrap();

    let a_content = b"contents of the first unit".to_vec();
    let b_content = vec![0xabu8; 4096];

    let manifest_text = format!(
        "a.iso,{},{}\nb.iso,{},{}\n",
        checksum_bytes(&a_content),
        a_content.len(),
        checksum_bytes(&b_content),
        b_content.len(),
    );
    let manifest = Manifest::parse(manifest_text.as_bytes(), &base_url()).unwrap();
    assert_eq!(manifest.len(), 2);

    // Simulate the download layer writing each unit to storage
    let a_path = dir.path().join("a.iso");
    let b_path = dir.path().join("b.iso");
    fs::write(&a_path, &a_content).unwrap();
    fs::write(&b_path, &b_content).unwrap();

    manifest.find("a.iso").unwrap().validate_at(&a_path, true).unwrap();
    manifest.find("b.iso").unwrap().validate_at(&b_path, true).unwrap();
}

#[test]
fn corrupted_download_is_rejected() {
    let dir = tempfile::tempdir().unwrap();

    let good = b"expected content".to_vec();
    let manifest_text = format!("a.iso,{},{}\n", checksum_bytes(&good), good.len());
    let manifest = Manifest::parse(manifest_text.as_bytes(), &base_url()).unwrap();
    let entry = manifest.find("a.iso").unwrap();

    // Same length, different bytes: size passes, checksum fails
    let path = dir.path().join("a.iso");
    fs::write(&path, b"eXpected content").unwrap();
    let err = entry.validate_at(&path, true).unwrap_err();
    assert!(matches!(err, ManifestError::ChecksumMismatch { .. }));

    // Truncated: size fails first
    fs::write(&path, b"expected").unwrap();
    let err = entry.validate_at(&path, true).unwrap_err();
    match err {
        ManifestError::SizeMismatch {
            expected, actual, ..
        } => {
            assert_eq!(expected, good.len() as u64);
            assert_eq!(actual, 8);
        }
        other => panic!("expected SizeMismatch, got {other:?}"),
    }
}

#[test]
fn reserved_name_rejected_without_touching_disk() {
    let dir = tempfile::tempdir().unwrap();

    let manifest_text = format!("{},deadbeef,12\n", MANIFEST_FILENAME);
    let manifest = Manifest::parse(manifest_text.as_bytes(), &base_url()).unwrap();
    let entry = manifest.find(MANIFEST_FILENAME).unwrap();

    // The file was never downloaded; the name check alone must reject it
    let missing = dir.path().join(MANIFEST_FILENAME);
    let err = entry.validate_at(&missing, false).unwrap_err();
    assert!(matches!(err, ManifestError::ReservedName(_)));
}

#[test]
fn malformed_manifest_yields_no_entries() {
    let text = "a.iso,deadbeef,1024\nbroken row\n";
    let err = Manifest::parse(text.as_bytes(), &base_url()).unwrap_err();
    assert!(matches!(err, ManifestError::Malformed { line: 2, .. }));
}

#[test]
fn manifest_survives_serde_round_trip() {
    let text = "a.iso,deadbeef,1024\nb.iso,cafebabe,2048\n";
    let manifest = Manifest::parse(text.as_bytes(), &base_url()).unwrap();

    let json = serde_json::to_string(&manifest).unwrap();
    let restored: Manifest = serde_json::from_str(&json).unwrap();
    assert_eq!(manifest, restored);
}
