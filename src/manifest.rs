// src/manifest.rs

//! Checksum-verified file-set manifests
//!
//! A file-set repository publishes a `PULP_MANIFEST` file listing every
//! unit it contains as a CSV row of `name,checksum,size`. This module
//! parses that listing into an immutable [`Manifest`] and validates
//! downloaded files against their [`ManifestEntry`]:
//!
//! - the name-collision check always runs: no unit may share the
//!   manifest's own filename, since it would be overwritten on publish;
//! - full validation additionally checks the file's length against the
//!   declared size and its streamed SHA-256 digest against the declared
//!   checksum.
//!
//! Parsing is atomic: either every row produces an entry or the whole
//! parse fails, so callers never observe a half-built manifest. Entry
//! order mirrors row order in the source file.
//!
//! # Example
//!
//! ```
//! use rpmunit::manifest::Manifest;
//! use url::Url;
//!
//! let base = Url::parse("http://example.com/repo/").unwrap();
//! let manifest = Manifest::parse("a.iso,deadbeef,1024\n".as_bytes(), &base).unwrap();
//! assert_eq!(manifest.len(), 1);
//! assert_eq!(
//!     manifest.get(0).unwrap().source_url.as_str(),
//!     "http://example.com/repo/a.iso"
//! );
//! ```

use crate::checksum::{checksum_reader, file_size};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// The filename a manifest is published under
///
/// Reserved: no unit in the file set may use it as its own name.
pub const MANIFEST_FILENAME: &str = "PULP_MANIFEST";

/// Errors during manifest parsing and validation
#[derive(Error, Debug)]
pub enum ManifestError {
    /// A manifest row could not be turned into an entry; the parse aborts
    #[error("malformed manifest at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// A unit is named after the manifest itself
    #[error("a unit may not be named {0}, as it conflicts with the name of the manifest during publishing")]
    ReservedName(String),

    /// Downloaded file length disagrees with the manifest
    #[error("downloading <{name}> failed validation: the manifest specified that the file should be {expected} bytes, but the downloaded file is {actual} bytes")]
    SizeMismatch {
        name: String,
        expected: u64,
        actual: u64,
    },

    /// Downloaded file digest disagrees with the manifest
    #[error("downloading <{name}> failed checksum validation: the manifest specified the checksum to be {expected}, but it was {actual}")]
    ChecksumMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    /// IO error while reading the file under validation
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One expected file in a file-set manifest
///
/// Built by [`Manifest::parse`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Filename of the unit, unique within its manifest
    pub name: String,
    /// Expected SHA-256 digest as hex
    pub checksum: String,
    /// Expected file length in bytes
    pub size: u64,
    /// Where the unit can be fetched from, resolved against the
    /// repository base URL
    pub source_url: Url,
}

impl ManifestEntry {
    /// Validate a downloaded file against this entry
    ///
    /// The reserved-name check always runs. With `full_validation`, the
    /// file's length is checked against [`ManifestEntry::size`] (seek to
    /// end) and its streamed SHA-256 digest against
    /// [`ManifestEntry::checksum`] (case-insensitive on the manifest
    /// side). The file is only read, never written; the checksum pass is
    /// chunked so the file never has to fit in memory.
    pub fn validate<F: Read + Seek>(
        &self,
        file: &mut F,
        full_validation: bool,
    ) -> Result<(), ManifestError> {
        if self.name == MANIFEST_FILENAME {
            return Err(ManifestError::ReservedName(self.name.clone()));
        }

        if full_validation {
            debug!("validating <{}> against manifest entry", self.name);

            let actual_size = file_size(file)?;
            if actual_size != self.size {
                return Err(ManifestError::SizeMismatch {
                    name: self.name.clone(),
                    expected: self.size,
                    actual: actual_size,
                });
            }

            file.seek(SeekFrom::Start(0))?;
            let actual_checksum = checksum_reader(file)?;
            if actual_checksum != self.checksum.to_lowercase() {
                return Err(ManifestError::ChecksumMismatch {
                    name: self.name.clone(),
                    expected: self.checksum.clone(),
                    actual: actual_checksum,
                });
            }
        }

        Ok(())
    }

    /// Validate the file at `path` against this entry
    ///
    /// Convenience wrapper over [`ManifestEntry::validate`] for callers
    /// holding a storage path rather than an open handle.
    pub fn validate_at(&self, path: &Path, full_validation: bool) -> Result<(), ManifestError> {
        // Reserved-name check must not require the file to exist
        if self.name == MANIFEST_FILENAME {
            return Err(ManifestError::ReservedName(self.name.clone()));
        }
        let mut file = File::open(path)?;
        self.validate(&mut file, full_validation)
    }
}

/// An immutable, ordered collection of manifest entries
///
/// Materialized in one pass by [`Manifest::parse`]; iteration yields
/// entries in source-file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Parse a `PULP_MANIFEST`-style CSV listing
    ///
    /// Each row is `name,checksum,size` with no header; blank lines are
    /// skipped and fields may be double-quoted to embed commas. Every
    /// entry's `source_url` is `name` resolved against `base_url` with
    /// standard URL-join semantics (relative names append, absolute ones
    /// replace). Any bad row fails the whole parse; no partial manifest is
    /// ever returned.
    pub fn parse<R: Read>(mut reader: R, base_url: &Url) -> Result<Self, ManifestError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;

        let mut entries = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            let fields = split_record(line);
            if fields.len() != 3 {
                return Err(ManifestError::Malformed {
                    line: line_no,
                    reason: format!("expected 3 fields (name,checksum,size), found {}", fields.len()),
                });
            }

            let name = fields[0].clone();
            if name.is_empty() {
                return Err(ManifestError::Malformed {
                    line: line_no,
                    reason: "empty unit name".to_string(),
                });
            }

            let size = fields[2].trim().parse::<u64>().map_err(|_| {
                ManifestError::Malformed {
                    line: line_no,
                    reason: format!("size is not a non-negative integer: {:?}", fields[2]),
                }
            })?;

            let source_url = base_url.join(&name).map_err(|e| ManifestError::Malformed {
                line: line_no,
                reason: format!("cannot resolve {:?} against base URL: {}", name, e),
            })?;

            entries.push(ManifestEntry {
                name,
                checksum: fields[1].clone(),
                size,
                source_url,
            });
        }

        debug!("parsed manifest: {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Number of entries in the manifest
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest lists no files
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry at `index`, in source-file order
    pub fn get(&self, index: usize) -> Option<&ManifestEntry> {
        self.entries.get(index)
    }

    /// Look up an entry by unit name
    pub fn find(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Iterate entries in source-file order
    pub fn iter(&self) -> std::slice::Iter<'_, ManifestEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Split one CSV record into fields, honoring double-quoted fields with
/// doubled-quote escapes
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
        } else {
            match c {
                ',' => fields.push(std::mem::take(&mut field)),
                '"' if field.is_empty() => in_quotes = true,
                _ => field.push(c),
            }
        }
    }
    fields.push(field);
    fields
}
