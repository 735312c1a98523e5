// src/version/mod.rs

//! Version sort-key encoding and ordering for RPM-style package records
//!
//! RPM version and release strings mix numeric and alphabetic segments
//! ("1.10", "4.el8", "1.0.0rc1") and compare with numeric-aware semantics:
//! `"9" < "10"`, `"1.2" < "1.10"`. A plain string sort gets this wrong, so
//! records store a precomputed *sort index* per field whose lexicographic
//! order matches semantic version order. [`encode`] produces that key;
//! [`derive_sort_indexes`] packages the version and release keys for the
//! persistence layer to write alongside the raw fields before every save.
//!
//! # Encoding scheme
//!
//! The input is split at every digit/non-digit boundary into alternating
//! runs. Digit runs are stripped of leading zeros and emitted as a two-digit
//! length prefix plus the trimmed digits (`"10"` → `"02-10"`), so a longer
//! number always outranks a shorter one. Non-digit runs are emitted as `'$'`
//! plus the raw characters; `'$'` sorts below every ASCII digit, so an
//! alphabetic run loses to a numeric run at the same position, matching
//! native rpm comparison. The empty string is its own sentinel: every
//! non-empty encoding starts with `'$'` or a digit, so an absent field sorts
//! below any present one.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort key for an absent or empty version field
///
/// Lexicographically below every encoding of a non-empty string.
pub const EMPTY_SORT_KEY: &str = "";

/// Widest digit run the length prefix can rank exactly
///
/// Longer runs keep all their digits but saturate the prefix, degrading to
/// lexicographic order among themselves. No real epoch/version/release
/// comes close.
const MAX_DIGIT_RUN: usize = 99;

/// Encode a version or release string as a lexicographically sortable key
///
/// Pure and deterministic; never fails. An empty input yields
/// [`EMPTY_SORT_KEY`]. The key is not reversible; it exists only so that
/// `encode(a) < encode(b)` exactly when `a` precedes `b` under
/// numeric-aware version comparison.
///
/// # Examples
///
/// ```
/// use rpmunit::version::encode;
///
/// assert!(encode("9") < encode("10"));
/// assert!(encode("1.2") < encode("1.10"));
/// assert!(encode("1.2") < encode("1.2.1"));
/// assert!(encode("") < encode("0"));
/// ```
pub fn encode(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len() + 8);
    let mut rest = raw;
    while !rest.is_empty() {
        let numeric = rest.as_bytes()[0].is_ascii_digit();
        let run_len = rest
            .bytes()
            .position(|b| b.is_ascii_digit() != numeric)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(run_len);
        if numeric {
            let trimmed = run.trim_start_matches('0');
            let trimmed = if trimmed.is_empty() { "0" } else { trimmed };
            key.push_str(&format!("{:02}-", trimmed.len().min(MAX_DIGIT_RUN)));
            key.push_str(trimmed);
        } else {
            key.push('$');
            key.push_str(run);
        }
        rest = tail;
    }
    key
}

/// The (epoch, version, release) identity of a package record
///
/// Order-sensitive: epoch outranks version outranks release. `epoch` is
/// `None` for unit types whose identity omits the field entirely;
/// comparison treats an absent epoch as [`EMPTY_SORT_KEY`], which is below
/// every present value, and two same-type records with no epoch simply tie
/// on that component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompleteVersion {
    pub epoch: Option<String>,
    pub version: String,
    pub release: String,
}

impl CompleteVersion {
    /// Build an identity with an epoch (RPM, SRPM, DRPM)
    pub fn new(
        epoch: impl Into<String>,
        version: impl Into<String>,
        release: impl Into<String>,
    ) -> Self {
        Self {
            epoch: Some(epoch.into()),
            version: version.into(),
            release: release.into(),
        }
    }

    /// Build an identity for a unit type without an epoch field
    pub fn without_epoch(version: impl Into<String>, release: impl Into<String>) -> Self {
        Self {
            epoch: None,
            version: version.into(),
            release: release.into(),
        }
    }

    /// The identity with each component passed through [`encode`]
    ///
    /// Sorting records by these tuples as plain strings reproduces
    /// [`CompleteVersion::compare`] order exactly.
    pub fn sort_keys(&self) -> (String, String, String) {
        (
            self.epoch.as_deref().map(encode).unwrap_or_default(),
            encode(&self.version),
            encode(&self.release),
        )
    }

    /// Rank this identity against another
    ///
    /// Compares encoded epoch, then version, then release, short-circuiting
    /// at the first unequal component. A strict total order: ties only on
    /// full field-wise equality of the encodings.
    pub fn compare(&self, other: &CompleteVersion) -> Ordering {
        self.sort_keys().cmp(&other.sort_keys())
    }
}

impl Ord for CompleteVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for CompleteVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Contract a package-type record exposes so this module can rank it
///
/// The persistence layer owns the fields; this crate only reads them. Unit
/// types without an epoch in their identity return `None` from
/// [`PackageIdentity::epoch`].
pub trait PackageIdentity {
    /// Raw epoch string, or `None` when the unit type has no epoch field
    fn epoch(&self) -> Option<&str>;

    /// Raw version string
    fn version(&self) -> &str;

    /// Raw release string
    fn release(&self) -> &str;

    /// The record's ordered version identity
    fn complete_version(&self) -> CompleteVersion {
        CompleteVersion {
            epoch: self.epoch().map(str::to_string),
            version: self.version().to_string(),
            release: self.release().to_string(),
        }
    }
}

/// Rank two package records by their version identity
///
/// Comparison is only meaningful between records of the same unit type, so
/// both sides carry the same identity shape.
pub fn compare_units(a: &impl PackageIdentity, b: &impl PackageIdentity) -> Ordering {
    a.complete_version().compare(&b.complete_version())
}

/// Derived sort-index fields stored alongside the raw version fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortIndexes {
    pub version_sort_index: String,
    pub release_sort_index: String,
}

/// Compute the sort-index fields for a record prior to persistence
///
/// Pure function of the raw fields. The persistence layer must call this
/// before every write so the stored indexes can never drift from the raw
/// version and release values.
pub fn derive_sort_indexes(record: &impl PackageIdentity) -> SortIndexes {
    SortIndexes {
        version_sort_index: encode(record.version()),
        release_sort_index: encode(record.release()),
    }
}
