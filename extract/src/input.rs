//! Map file access.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ExtractError, Result};

/// Reads a whole map file and decodes it as UTF-8, dropping invalid bytes.
///
/// The file handle is released before decoding starts.
///
/// # Errors
///
/// Returns [`ExtractError::Io`] if the file cannot be read.
pub fn read_map_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let text = decode_lossy(&bytes);
    debug!(path = %path.display(), bytes = bytes.len(), "Read map file");
    Ok(text)
}

/// Decodes UTF-8, silently skipping undecodable byte sequences.
///
/// # Examples
///
/// ```
/// use linkmap_extract::input::decode_lossy;
///
/// assert_eq!(decode_lossy(b"| A_START |\xff 0x10 |"), "| A_START | 0x10 |");
/// ```
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    let mut dropped = 0usize;

    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        dropped += chunk.invalid().len();
    }

    if dropped > 0 {
        debug!(dropped, "Dropped undecodable bytes");
    }
    text
}
