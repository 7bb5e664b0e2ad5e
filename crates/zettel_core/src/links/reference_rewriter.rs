//! Corpus-wide reference rewrite after one rename.
//!
//! # Responsibility
//! - Re-enumerate every note under the vault root and rewrite links that
//!   point at the old filename.
//! - Write back only files that actually changed.
//!
//! # Invariants
//! - The corpus is enumerated after the move, so the renamed file is scanned
//!   under its new path and its own self-references are fixed too.
//! - A failed read or write on one linking file is logged and never rolls
//!   back the rename that triggered the scan.

use crate::catalog::{list_files, FileKind};
use crate::config::NormalizerConfig;
use crate::links::rewrite::LinkPattern;
use crate::model::file_name::FileName;
use crate::text_io::{read_note_text, write_note_text};
use log::{debug, error, warn};
use std::path::Path;

/// Totals of one corpus scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub files_scanned: usize,
    pub files_updated: usize,
    pub lines_updated: usize,
}

impl RewriteReport {
    pub fn found_any(&self) -> bool {
        self.lines_updated > 0
    }
}

pub struct ReferenceRewriter<'a> {
    config: &'a NormalizerConfig,
}

impl<'a> ReferenceRewriter<'a> {
    pub fn new(config: &'a NormalizerConfig) -> Self {
        Self { config }
    }

    /// Rewrites references to `old_path` so they point at `new_path`.
    ///
    /// Returns `true` when at least one line in the corpus changed.
    pub fn rewrite_references(&self, old_path: &Path, new_path: &Path, root: &Path) -> bool {
        self.rewrite_with_report(old_path, new_path, root).found_any()
    }

    pub fn rewrite_with_report(&self, old_path: &Path, new_path: &Path, root: &Path) -> RewriteReport {
        let old = FileName::from_path(old_path);
        let new_name = FileName::from_path(new_path).full_name;
        let pattern = LinkPattern::new(&old);
        let candidates = list_files(root, FileKind::Note, self.config);

        debug!(
            "event=rewrite_scan module=links status=start old={} new={} candidates={}",
            old.full_name,
            new_name,
            candidates.len()
        );

        let mut report = RewriteReport::default();
        for candidate in &candidates {
            report.files_scanned += 1;
            let content = match read_note_text(candidate) {
                Ok(content) => content,
                Err(err) => {
                    warn!("event=rewrite_read module=links status=skipped error={err}");
                    continue;
                }
            };

            let mut changed = 0;
            let lines: Vec<String> = content
                .split('\n')
                .map(|line| match pattern.rewrite_line(line, &new_name) {
                    Some(rewrite) => {
                        changed += 1;
                        debug!(
                            "event=rewrite_line module=links file={} wiki={} markdown={}",
                            candidate.display(),
                            rewrite.wiki_links,
                            rewrite.markdown_links
                        );
                        rewrite.line
                    }
                    None => line.to_string(),
                })
                .collect();

            if changed == 0 {
                continue;
            }
            report.lines_updated += changed;
            match write_note_text(candidate, &lines.join("\n")) {
                Ok(()) => report.files_updated += 1,
                Err(err) => error!("event=rewrite_write module=links status=error error={err}"),
            }
        }

        debug!(
            "event=rewrite_scan module=links status=ok lines_updated={} files_updated={}",
            report.lines_updated, report.files_updated
        );
        report
    }
}
