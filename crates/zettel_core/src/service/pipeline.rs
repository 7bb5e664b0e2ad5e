//! Run orchestration across the normalization phases.
//!
//! # Responsibility
//! - Validate root/target paths before any file is touched.
//! - Run the enabled phases in order, re-enumerating files for each.
//!
//! # Invariants
//! - Phase order: front matter, rename notes, rename images, wiki-link
//!   conversion.
//! - A failed move aborts the run; per-file recoveries do not.

use crate::catalog::{list_files, FileKind};
use crate::config::NormalizerConfig;
use crate::error::{NormalizeError, NormalizeResult};
use crate::links::convert::{convert_wikilinks, ConversionSummary};
use crate::service::front_matter_service::{FrontMatterNormalizer, FrontMatterSummary};
use crate::service::rename_service::{RenameEngine, RenameSummary};
use log::info;
use std::path::Path;

/// Per-phase totals; `None` for phases that did not run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub front_matter: Option<FrontMatterSummary>,
    pub notes: Option<RenameSummary>,
    pub images: Option<RenameSummary>,
    pub conversion: Option<ConversionSummary>,
}

pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Runs every enabled phase over `target`, resolving links across `root`.
    ///
    /// # Errors
    /// - `PathNotFound` when `root` is not a directory or `target` is missing.
    /// - Any fatal rename error (`TargetExists`, move `Io`).
    pub fn run(&self, root: &Path, target: &Path) -> NormalizeResult<RunSummary> {
        validate_paths(root, target)?;
        let phases = self.config.phases;
        let mut summary = RunSummary::default();
        info!(
            "event=run module=pipeline status=start root={} target={}",
            root.display(),
            target.display()
        );

        if phases.front_matter {
            let notes = list_files(target, FileKind::Note, &self.config);
            summary.front_matter = Some(FrontMatterNormalizer::new(&self.config).normalize(&notes));
        }

        let mut engine = RenameEngine::new(&self.config);
        if phases.rename_notes {
            let notes = list_files(target, FileKind::Note, &self.config);
            summary.notes = Some(engine.rename_notes(&notes, root)?);
        }
        if phases.rename_images {
            let images = list_files(target, FileKind::Image, &self.config);
            summary.images = Some(engine.rename_images(&images, root)?);
        }

        if phases.convert_wikilinks {
            let notes = list_files(target, FileKind::Note, &self.config);
            summary.conversion = Some(convert_wikilinks(&notes));
        }

        info!("event=run module=pipeline status=ok");
        Ok(summary)
    }
}

/// Checks that `root` is a directory and `target` exists.
pub fn validate_paths(root: &Path, target: &Path) -> NormalizeResult<()> {
    if !root.is_dir() {
        return Err(NormalizeError::PathNotFound(root.to_path_buf()));
    }
    if !target.exists() {
        return Err(NormalizeError::PathNotFound(target.to_path_buf()));
    }
    Ok(())
}
