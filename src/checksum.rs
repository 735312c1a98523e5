// src/checksum.rs

//! Streaming SHA-256 checksums and file-size measurement
//!
//! Manifest validation has to handle arbitrarily large artifacts (ISO
//! images routinely run to gigabytes), so checksums are computed with a
//! fixed-size read loop feeding an incremental digest rather than reading
//! the whole file. Digests render as lower-case hex, matching the checksum
//! column of the manifest format.

use sha2::{Digest, Sha256};
use std::io::{self, Read, Seek, SeekFrom};

/// How many bytes to read into RAM at a time when checksumming a file
pub const CHECKSUM_CHUNK_SIZE: usize = 32 * 1024 * 1024;

/// Compute the SHA-256 checksum of a byte slice as lower-case hex
pub fn checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Compute the SHA-256 checksum of a reader as lower-case hex
///
/// Reads in [`CHECKSUM_CHUNK_SIZE`] chunks; memory use is bounded
/// regardless of input length. Consumes the reader from its current
/// position to EOF.
pub fn checksum_reader<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHECKSUM_CHUNK_SIZE];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Measure the length of a seekable handle in bytes
///
/// Seeks to the end and reports the resulting offset; the caller decides
/// whether to rewind afterwards.
pub fn file_size<S: Seek>(handle: &mut S) -> io::Result<u64> {
    handle.seek(SeekFrom::End(0))
}
