//! Filename decomposition.
//!
//! Names are NFC-normalized so decomposed on-disk names (as some
//! filesystems store them) compare equal to the composed text typed in links.

use std::ffi::OsStr;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// `(full_name, stem, extension)` view of one path.
///
/// `extension` keeps its leading dot and is empty for extension-less names,
/// so `stem + extension == full_name` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileName {
    pub full_name: String,
    pub stem: String,
    pub extension: String,
}

impl FileName {
    pub fn from_path(path: &Path) -> Self {
        let full_name = path.file_name().map(nfc).unwrap_or_default();
        let extension = path
            .extension()
            .map(|ext| format!(".{}", nfc(ext)))
            .unwrap_or_default();
        let stem = full_name
            .strip_suffix(extension.as_str())
            .unwrap_or(full_name.as_str())
            .to_string();

        Self {
            full_name,
            stem,
            extension,
        }
    }
}

/// Returns the name of the immediate parent directory, if any.
pub fn parent_dir_name(path: &Path) -> Option<String> {
    path.parent().and_then(Path::file_name).map(nfc)
}

fn nfc(name: &OsStr) -> String {
    name.to_string_lossy().nfc().collect()
}

#[cfg(test)]
mod tests {
    use super::{parent_dir_name, FileName};
    use std::path::Path;

    #[test]
    fn splits_name_stem_and_extension() {
        let name = FileName::from_path(Path::new("/vault/Inbox/my note.md"));
        assert_eq!(name.full_name, "my note.md");
        assert_eq!(name.stem, "my note");
        assert_eq!(name.extension, ".md");
    }

    #[test]
    fn keeps_inner_dots_in_stem() {
        let name = FileName::from_path(Path::new("archive.2024.txt"));
        assert_eq!(name.stem, "archive.2024");
        assert_eq!(name.extension, ".txt");
    }

    #[test]
    fn extensionless_name_has_empty_extension() {
        let name = FileName::from_path(Path::new("/vault/README"));
        assert_eq!(name.stem, "README");
        assert_eq!(name.extension, "");
    }

    #[test]
    fn parent_dir_name_is_immediate_parent_only() {
        assert_eq!(
            parent_dir_name(Path::new("/vault/Inbox/sub/a.md")).as_deref(),
            Some("sub")
        );
        assert_eq!(
            parent_dir_name(Path::new("/vault/Inbox/a.md")).as_deref(),
            Some("Inbox")
        );
    }

    #[test]
    fn decomposed_names_compose_to_nfc() {
        let name = FileName::from_path(Path::new("/vault/\u{30AB}\u{3099}\u{30A4}\u{30C9}.md"));
        assert_eq!(name.stem, "\u{30AC}\u{30A4}\u{30C9}");
        assert_eq!(name.full_name, "\u{30AC}\u{30A4}\u{30C9}.md");
        assert_eq!(name.extension, ".md");

        assert_eq!(
            parent_dir_name(Path::new("/vault/Entwu\u{308}rfe/a.md")).as_deref(),
            Some("Entw\u{FC}rfe")
        );
    }
}
