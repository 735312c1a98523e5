// src/error.rs

//! Crate-wide error type
//!
//! Leaf modules define their own error enums; this type collects them for
//! callers that want a single `rpmunit::Result`.

use thiserror::Error;

/// Result type for rpmunit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by this crate
#[derive(Error, Debug)]
pub enum Error {
    /// Manifest parsing or validation failed
    #[error(transparent)]
    Manifest(#[from] crate::manifest::ManifestError),

    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestError;

    #[test]
    fn test_manifest_error_converts_and_displays() {
        let err: Error = ManifestError::ReservedName("PULP_MANIFEST".to_string()).into();
        assert!(err.to_string().contains("PULP_MANIFEST"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
