//! File catalog: enumerate notes and images under a vault path.
//!
//! # Responsibility
//! - Walk a directory top-down, pruning excluded and hidden entries before
//!   descending.
//! - Classify files as note or image by extension.
//!
//! # Invariants
//! - Excluded directories are never descended into.
//! - Output order is deterministic for a given filesystem state (entries are
//!   visited sorted by file name).
//! - Pure read; nothing on disk changes.

use crate::config::NormalizerConfig;
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Note,
    Image,
}

impl FileKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Image => "image",
        }
    }

    fn extensions(self, config: &NormalizerConfig) -> &[String] {
        match self {
            Self::Note => &config.note_extensions,
            Self::Image => &config.image_extensions,
        }
    }
}

/// Returns whether `path` has an extension belonging to `kind`.
pub fn matches_kind(path: &Path, kind: FileKind, config: &NormalizerConfig) -> bool {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();
    kind.extensions(config)
        .iter()
        .any(|ext| name.ends_with(ext.as_str()))
}

/// Lists files of `kind` under `start`.
///
/// A single file yields itself when it matches `kind`. Unreadable directory
/// entries are logged and skipped.
pub fn list_files(start: &Path, kind: FileKind, config: &NormalizerConfig) -> Vec<PathBuf> {
    if start.is_file() {
        return if matches_kind(start, kind, config) {
            vec![start.to_path_buf()]
        } else {
            Vec::new()
        };
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(start)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded(entry, config));
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("event=catalog_walk module=catalog status=skipped error={err}");
                continue;
            }
        };
        if entry.file_type().is_file() && matches_kind(entry.path(), kind, config) {
            files.push(entry.into_path());
        }
    }
    files
}

fn is_excluded(entry: &DirEntry, config: &NormalizerConfig) -> bool {
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    if entry.file_type().is_dir() {
        config.exclude_dirs.contains(name.as_ref())
    } else {
        config.exclude_files.contains(name.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::{matches_kind, FileKind};
    use crate::config::NormalizerConfig;
    use std::path::Path;

    #[test]
    fn classifies_by_extension() {
        let config = NormalizerConfig::default();
        assert!(matches_kind(Path::new("a/b.md"), FileKind::Note, &config));
        assert!(matches_kind(Path::new("a/b.txt"), FileKind::Note, &config));
        assert!(!matches_kind(Path::new("a/b.png"), FileKind::Note, &config));
        assert!(matches_kind(Path::new("a/b.jpeg"), FileKind::Image, &config));
        assert!(!matches_kind(Path::new("a/b.pdf"), FileKind::Image, &config));
    }
}
