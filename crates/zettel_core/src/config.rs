//! Run configuration.
//!
//! # Responsibility
//! - Hold exclusion sets, extension lists, inbox names and phase toggles as
//!   one immutable value handed to every component.
//! - Load overrides from a TOML file where every key is optional.
//!
//! # Invariants
//! - Extensions start with `.` and have at least one more character.
//! - Name sets never contain empty entries.

use crate::error::{NormalizeError, NormalizeResult};
use crate::service::identifier::IdentifierScheme;
use crate::store::FrontMatterFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Which phases a run executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhaseToggles {
    pub front_matter: bool,
    pub rename_notes: bool,
    pub rename_images: bool,
    pub convert_wikilinks: bool,
}

impl Default for PhaseToggles {
    fn default() -> Self {
        Self {
            front_matter: true,
            rename_notes: true,
            rename_images: true,
            convert_wikilinks: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizerConfig {
    /// Directory names never descended into.
    pub exclude_dirs: BTreeSet<String>,
    /// File names never returned by the catalog.
    pub exclude_files: BTreeSet<String>,
    pub note_extensions: Vec<String>,
    pub image_extensions: Vec<String>,
    /// Parent directory names whose notes get `draft: true`.
    pub inbox_dirs: BTreeSet<String>,
    /// Format used when a note has no front matter yet.
    pub front_matter_format: FrontMatterFormat,
    pub identifier_scheme: IdentifierScheme,
    pub phases: PhaseToggles,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            exclude_dirs: names(&["Backup", "Template", "tmp", "node_modules"]),
            exclude_files: names(&["tags"]),
            note_extensions: vec![".md".to_string(), ".txt".to_string()],
            image_extensions: [".png", ".jpg", ".jpeg", ".svg", ".gif"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            inbox_dirs: names(&["Inbox", "Draft", "Pending"]),
            front_matter_format: FrontMatterFormat::default(),
            identifier_scheme: IdentifierScheme::default(),
            phases: PhaseToggles::default(),
        }
    }
}

impl NormalizerConfig {
    /// Parses TOML overrides on top of the defaults.
    ///
    /// # Errors
    /// - `InvalidConfig` for syntax errors, unknown keys or failed validation.
    pub fn from_toml_str(text: &str) -> NormalizeResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|err| NormalizeError::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> NormalizeResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| NormalizeError::io(path, err))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> NormalizeResult<()> {
        for ext in self.note_extensions.iter().chain(&self.image_extensions) {
            if !ext.starts_with('.') || ext.len() < 2 {
                return Err(NormalizeError::InvalidConfig(format!(
                    "extension `{ext}` must start with `.`"
                )));
            }
        }
        let name_sets = [
            ("exclude_dirs", &self.exclude_dirs),
            ("exclude_files", &self.exclude_files),
            ("inbox_dirs", &self.inbox_dirs),
        ];
        for (field, set) in name_sets {
            if set.iter().any(|name| name.trim().is_empty()) {
                return Err(NormalizeError::InvalidConfig(format!(
                    "`{field}` contains an empty name"
                )));
            }
        }
        Ok(())
    }

    pub fn is_inbox_dir(&self, name: &str) -> bool {
        self.inbox_dirs.contains(name)
    }
}

fn names(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::NormalizerConfig;
    use crate::error::NormalizeError;
    use crate::service::identifier::IdentifierScheme;
    use crate::store::FrontMatterFormat;

    #[test]
    fn defaults_match_vault_conventions() {
        let config = NormalizerConfig::default();
        assert!(config.exclude_dirs.contains("Backup"));
        assert!(config.exclude_files.contains("tags"));
        assert!(config.is_inbox_dir("Inbox"));
        assert!(!config.is_inbox_dir("Projects"));
        assert_eq!(config.front_matter_format, FrontMatterFormat::Yaml);
        assert_eq!(config.identifier_scheme, IdentifierScheme::Random);
        assert!(config.phases.rename_images);
        assert!(!config.phases.convert_wikilinks);
    }

    #[test]
    fn toml_overrides_only_listed_keys() {
        let config = NormalizerConfig::from_toml_str(
            "front_matter_format = \"toml\"\ninbox_dirs = [\"Fleeting\"]\n\n[phases]\nrename_images = false\n",
        )
        .expect("valid config");

        assert_eq!(config.front_matter_format, FrontMatterFormat::Toml);
        assert!(config.is_inbox_dir("Fleeting"));
        assert!(!config.is_inbox_dir("Inbox"));
        assert!(!config.phases.rename_images);
        assert!(config.phases.rename_notes);
        assert_eq!(config.note_extensions, vec![".md", ".txt"]);
    }

    #[test]
    fn rejects_unknown_keys_and_bad_extensions() {
        let unknown = NormalizerConfig::from_toml_str("colour = \"blue\"").unwrap_err();
        assert!(matches!(unknown, NormalizeError::InvalidConfig(_)));

        let bad_ext = NormalizerConfig::from_toml_str("note_extensions = [\"md\"]").unwrap_err();
        assert!(bad_ext.to_string().contains("must start with"));
    }
}
