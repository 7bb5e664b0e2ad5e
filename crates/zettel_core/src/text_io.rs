//! Note text and timestamp access.
//!
//! # Responsibility
//! - Read and write note text with `\n` line endings on every platform.
//! - Derive creation/modification timestamps in the front-matter format.
//!
//! # Invariants
//! - Every file handle is scoped to a single call and closed before return.
//! - Creation time falls back to modification time where the platform cannot
//!   report it; every `date` derivation goes through `creation_time`.

use crate::error::{NormalizeError, NormalizeResult};
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Front-matter timestamp layout.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Timestamp-derived identifier layout.
pub const COMPACT_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Reads a UTF-8 note and normalizes `\r\n` / `\r` to `\n`.
///
/// # Errors
/// - `Io` when the file cannot be read.
/// - `InvalidEncoding` when the bytes are not UTF-8.
pub fn read_note_text(path: &Path) -> NormalizeResult<String> {
    let bytes = fs::read(path).map_err(|err| NormalizeError::io(path, err))?;
    let text =
        String::from_utf8(bytes).map_err(|_| NormalizeError::InvalidEncoding(path.to_path_buf()))?;
    Ok(normalize_line_endings(&text))
}

/// Writes note text with `\n` line endings.
pub fn write_note_text(path: &Path, content: &str) -> NormalizeResult<()> {
    fs::write(path, normalize_line_endings(content)).map_err(|err| NormalizeError::io(path, err))
}

pub fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

/// Creation time, or modification time when creation time is unavailable.
pub fn creation_time(path: &Path) -> NormalizeResult<SystemTime> {
    let metadata = fs::metadata(path).map_err(|err| NormalizeError::io(path, err))?;
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .map_err(|err| NormalizeError::io(path, err))
}

pub fn modification_time(path: &Path) -> NormalizeResult<SystemTime> {
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .map_err(|err| NormalizeError::io(path, err))
}

/// Renders `time` in local time as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}
