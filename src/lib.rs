// src/lib.rs

//! Content-unit utilities for RPM/YUM package repositories
//!
//! This crate provides the two pieces of real machinery behind RPM-style
//! repository content units:
//!
//! - **Version sort indexes**: [`version::encode`] converts an arbitrary
//!   version or release string into a sort key whose plain lexicographic
//!   order matches native packaging-tool version order, so that a database
//!   sorting by the stored key agrees with direct comparisons. Two package
//!   records are ranked over their (epoch, version, release) identity via
//!   [`version::compare_units`].
//! - **Manifest verification**: [`manifest::Manifest`] parses a
//!   `PULP_MANIFEST`-style CSV listing of `(name, checksum, size)` triples
//!   and validates downloaded files against it, streaming checksums so
//!   arbitrarily large files never have to fit in memory.
//!
//! Storage, downloading, and sync orchestration are external collaborators:
//! this crate only computes and verifies.

pub mod checksum;
mod error;
pub mod manifest;
pub mod version;

pub use checksum::{checksum_bytes, checksum_reader, file_size, CHECKSUM_CHUNK_SIZE};
pub use error::{Error, Result};
pub use manifest::{Manifest, ManifestEntry, ManifestError, MANIFEST_FILENAME};
pub use version::{
    compare_units, derive_sort_indexes, encode, CompleteVersion, PackageIdentity, SortIndexes,
};
