//! Rename use-case: move files to identifier names and repair links.
//!
//! # Responsibility
//! - Skip files whose stem already has an identifier shape.
//! - Move every other file to an allocated identifier path.
//! - Record the identifier in note front matter under `uid`.
//! - Trigger the corpus-wide reference rewrite for each moved file.
//!
//! # Invariants
//! - A failed move stops the whole phase; later steps assume it happened.
//! - `uid` injection and link rewrite failures are logged, never rolled back.
//! - Only note files (text) receive a `uid` field.

use crate::catalog::{matches_kind, FileKind};
use crate::config::NormalizerConfig;
use crate::error::{NormalizeError, NormalizeResult};
use crate::links::reference_rewriter::ReferenceRewriter;
use crate::model::file_name::FileName;
use crate::model::front_matter::{FieldKey, FieldValue, FrontMatter};
use crate::service::identifier::{is_identifier_stem, IdentifierAllocator};
use crate::store::{insert_after_opening_line, parse_any, store_for};
use crate::text_io::{read_note_text, write_note_text};
use log::{debug, error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Totals of one rename phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameSummary {
    pub renamed: usize,
    /// Renames whose reference scan changed at least one linking file.
    pub linked_files_updated: usize,
}

pub struct RenameEngine<'a> {
    config: &'a NormalizerConfig,
    allocator: IdentifierAllocator,
    rewriter: ReferenceRewriter<'a>,
}

impl<'a> RenameEngine<'a> {
    pub fn new(config: &'a NormalizerConfig) -> Self {
        Self {
            config,
            allocator: IdentifierAllocator::new(config.identifier_scheme),
            rewriter: ReferenceRewriter::new(config),
        }
    }

    pub fn rename_notes(&mut self, files: &[PathBuf], root: &Path) -> NormalizeResult<RenameSummary> {
        self.rename_all(files, root, FileKind::Note)
    }

    pub fn rename_images(&mut self, files: &[PathBuf], root: &Path) -> NormalizeResult<RenameSummary> {
        self.rename_all(files, root, FileKind::Image)
    }

    fn rename_all(
        &mut self,
        files: &[PathBuf],
        root: &Path,
        kind: FileKind,
    ) -> NormalizeResult<RenameSummary> {
        info!(
            "event=rename module=rename status=start kind={} targets={}",
            kind.name(),
            files.len()
        );
        let mut summary = RenameSummary::default();

        for (index, file) in files.iter().enumerate() {
            let name = FileName::from_path(file);
            if is_identifier_stem(&name.stem) {
                debug!(
                    "event=rename_skip module=rename reason=has_identifier file={}",
                    file.display()
                );
                continue;
            }

            let new_path = self.allocator.allocate(file, root)?;
            move_file(file, &new_path)?;
            summary.renamed += 1;
            info!(
                "event=rename_done module=rename from={} to={}",
                file.display(),
                new_path.display()
            );

            if matches_kind(&new_path, FileKind::Note, self.config) {
                let uid = FileName::from_path(&new_path).stem;
                if let Err(err) = self.inject_uid(&new_path, &uid) {
                    error!("event=uid_inject module=rename status=error error={err}");
                }
            }

            if self.rewriter.rewrite_references(file, &new_path, root) {
                summary.linked_files_updated += 1;
            }
            debug!(
                "event=rename module=rename progress={}/{}",
                index + 1,
                files.len()
            );
        }

        info!(
            "event=rename module=rename status=ok kind={} renamed={} linked_files_updated={}",
            kind.name(),
            summary.renamed,
            summary.linked_files_updated
        );
        Ok(summary)
    }

    /// Writes `uid` into the note's front matter.
    ///
    /// Parsed blocks are updated structurally; a detected but unparseable
    /// block gets a raw line after its opening delimiter; a note without a
    /// block gets a fresh block in the configured format.
    pub fn inject_uid(&self, path: &Path, uid: &str) -> NormalizeResult<()> {
        let content = read_note_text(path)?;
        let value = FieldValue::Text(uid.to_string());

        let updated = match parse_any(&content) {
            Some((format, Ok(mut document))) => {
                document.front_matter.set(FieldKey::Uid, value);
                store_for(format).serialize(&document.front_matter, &document.body)
            }
            Some((format, Err(err))) => {
                warn!(
                    "event=uid_inject module=rename status=fallback file={} error={err}",
                    path.display()
                );
                let line = store_for(format).raw_field_line(&FieldKey::Uid, &value);
                insert_after_opening_line(&content, &line)
            }
            None => {
                let front_matter: FrontMatter = [(FieldKey::Uid, value)].into_iter().collect();
                store_for(self.config.front_matter_format).serialize(&front_matter, &content)
            }
        };
        write_note_text(path, &updated)
    }
}

/// Moves `from` to `to`, falling back to copy + remove across filesystems.
///
/// # Errors
/// - `PathNotFound` when `from` is gone.
/// - `TargetExists` when `to` is occupied.
/// - `Io` when neither rename nor copy succeeds.
pub fn move_file(from: &Path, to: &Path) -> NormalizeResult<()> {
    if fs::symlink_metadata(from).is_err() {
        return Err(NormalizeError::PathNotFound(from.to_path_buf()));
    }
    if fs::symlink_metadata(to).is_ok() {
        return Err(NormalizeError::TargetExists(to.to_path_buf()));
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            fs::copy(from, to).map_err(|_| NormalizeError::io(from, rename_err))?;
            fs::remove_file(from).map_err(|err| NormalizeError::io(from, err))
        }
    }
}
