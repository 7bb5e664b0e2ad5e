//! Identifier allocation for renamed files.
//!
//! # Responsibility
//! - Produce a collision-free `<identifier><ext>` path for a file.
//! - Recognize stems that already carry an identifier.
//!
//! # Invariants
//! - Notes with the relocation extension (`.md`) move to the vault root; any
//!   other file keeps its directory.
//! - A path handed out once is never handed out again by the same allocator,
//!   even before the caller moves a file onto it.
//! - Both identifier shapes (32 lowercase hex, 14-digit timestamp) count as
//!   "already identified".

use crate::error::{NormalizeError, NormalizeResult};
use crate::model::file_name::FileName;
use crate::text_io::{creation_time, COMPACT_TIMESTAMP_FORMAT};
use chrono::{DateTime, Duration, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Extension whose files relocate to the vault root on rename.
pub const RELOCATED_EXTENSION: &str = ".md";

static RANDOM_IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-f0-9]{32}$").expect("valid random identifier regex"));
static TIMESTAMP_IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{14}$").expect("valid timestamp identifier regex"));

/// Identifier shape used for new allocations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierScheme {
    /// UUID v4 rendered as 32 lowercase hex characters.
    #[default]
    Random,
    /// File creation time as `YYYYMMDDHHMMSS`, bumped one second per collision.
    Timestamp,
}

/// Returns whether `stem` already has an identifier shape.
pub fn is_identifier_stem(stem: &str) -> bool {
    RANDOM_IDENTIFIER_RE.is_match(stem) || TIMESTAMP_IDENTIFIER_RE.is_match(stem)
}

/// Allocates identifier paths; remembers every path it handed out.
#[derive(Debug, Default)]
pub struct IdentifierAllocator {
    scheme: IdentifierScheme,
    claimed: HashSet<PathBuf>,
}

impl IdentifierAllocator {
    pub fn new(scheme: IdentifierScheme) -> Self {
        Self {
            scheme,
            claimed: HashSet::new(),
        }
    }

    /// Directory the renamed file lands in.
    pub fn destination_dir(file: &Path, root: &Path) -> PathBuf {
        if FileName::from_path(file).extension == RELOCATED_EXTENSION {
            root.to_path_buf()
        } else {
            file.parent().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf())
        }
    }

    /// Returns a free `<destination>/<identifier><ext>` path for `file`.
    ///
    /// Does not move anything. The existence check and the caller's move are
    /// not atomic; the in-memory claim set covers paths not yet on disk.
    ///
    /// # Errors
    /// - `Io` when the timestamp scheme cannot read the file's metadata.
    pub fn allocate(&mut self, file: &Path, root: &Path) -> NormalizeResult<PathBuf> {
        let extension = FileName::from_path(file).extension;
        let directory = Self::destination_dir(file, root);

        for candidate in self.candidates(file)? {
            let path = directory.join(format!("{candidate}{extension}"));
            if !path.exists() && !self.claimed.contains(&path) {
                self.claimed.insert(path.clone());
                return Ok(path);
            }
        }
        // Only reachable when the timestamp sequence runs past chrono's range.
        Err(NormalizeError::TargetExists(directory))
    }

    fn candidates(&self, file: &Path) -> NormalizeResult<Box<dyn Iterator<Item = String>>> {
        match self.scheme {
            IdentifierScheme::Random => Ok(Box::new(std::iter::repeat_with(|| {
                Uuid::new_v4().simple().to_string()
            }))),
            IdentifierScheme::Timestamp => {
                let start = DateTime::<Local>::from(creation_time(file)?).naive_local();
                let sequence = std::iter::successors(Some(start), |current| {
                    current.checked_add_signed(Duration::seconds(1))
                });
                Ok(Box::new(sequence.map(|time| {
                    time.format(COMPACT_TIMESTAMP_FORMAT).to_string()
                })))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{is_identifier_stem, IdentifierAllocator, IdentifierScheme};
    use std::collections::HashSet;
    use std::path::Path;

    #[test]
    fn recognizes_both_identifier_shapes() {
        assert!(is_identifier_stem("abcdef0123456789abcdef0123456789"));
        assert!(is_identifier_stem("20240115093000"));
        assert!(!is_identifier_stem("ABCDEF0123456789ABCDEF0123456789"));
        assert!(!is_identifier_stem("my-note"));
        assert!(!is_identifier_stem("2024011509300"));
    }

    #[test]
    fn notes_relocate_to_root_and_others_stay() {
        let root = Path::new("/vault");
        assert_eq!(
            IdentifierAllocator::destination_dir(Path::new("/vault/sub/a.md"), root),
            Path::new("/vault")
        );
        assert_eq!(
            IdentifierAllocator::destination_dir(Path::new("/vault/sub/a.png"), root),
            Path::new("/vault/sub")
        );
        assert_eq!(
            IdentifierAllocator::destination_dir(Path::new("/vault/sub/a.txt"), root),
            Path::new("/vault/sub")
        );
    }

    #[test]
    fn random_allocations_are_distinct_within_one_run() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("note.md");
        std::fs::write(&file, "x").unwrap();
        let mut allocator = IdentifierAllocator::new(IdentifierScheme::Random);

        let mut seen = HashSet::new();
        for _ in 0..50 {
            let path = allocator.allocate(&file, dir.path()).unwrap();
            let stem = path.file_stem().unwrap().to_string_lossy().into_owned();
            assert!(is_identifier_stem(&stem));
            assert_eq!(path.extension().unwrap(), "md");
            assert!(seen.insert(path));
        }
    }

    #[test]
    fn timestamp_scheme_bumps_past_claimed_and_existing_names() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("sub").join("pic.png");
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, "x").unwrap();
        let mut allocator = IdentifierAllocator::new(IdentifierScheme::Timestamp);

        let first = allocator.allocate(&file, dir.path()).unwrap();
        let second = allocator.allocate(&file, dir.path()).unwrap();
        assert_ne!(first, second);
        assert_eq!(first.parent(), file.parent());

        let first_stem: u64 = first.file_stem().unwrap().to_string_lossy().parse().unwrap();
        let second_stem: u64 = second.file_stem().unwrap().to_string_lossy().parse().unwrap();
        assert!(second_stem > first_stem);
    }
}
