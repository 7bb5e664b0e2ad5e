//! Front-matter normalization use-case.
//!
//! # Responsibility
//! - Split notes into "has front matter" and "lacks front matter".
//! - Back-fill missing canonical fields, or create a fresh block.
//! - Remove hashtag-only lines from the body of every file it writes.
//!
//! # Invariants
//! - `date` is written once and never overwritten.
//! - `update` is the only field recomputed on every pass.
//! - Present fields keep their value and position.
//! - A file is written only when a field was added or `update` changed.
//! - One unreadable or undecodable file never aborts the batch.

use crate::config::NormalizerConfig;
use crate::error::NormalizeResult;
use crate::model::file_name::{parent_dir_name, FileName};
use crate::model::front_matter::{FieldKey, FieldValue, FrontMatter};
use crate::store::{detect_format, parse_any, store_for};
use crate::text_io::{
    creation_time, format_timestamp, modification_time, read_note_text, write_note_text,
};
use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static HASHTAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)#([^\s#]+)").expect("valid hashtag regex"));
static HASHTAG_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[^#\s]").expect("valid hashtag line regex"));

/// Totals of one normalization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrontMatterSummary {
    /// Files read and classified.
    pub checked: usize,
    /// Files that received a fresh block.
    pub created: usize,
    /// Files whose existing block was back-filled or refreshed.
    pub updated: usize,
    /// Files left untouched because of a read, decode or write failure.
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateOutcome {
    Updated,
    Unchanged,
    Unparseable,
}

pub struct FrontMatterNormalizer<'a> {
    config: &'a NormalizerConfig,
}

impl<'a> FrontMatterNormalizer<'a> {
    pub fn new(config: &'a NormalizerConfig) -> Self {
        Self { config }
    }

    /// Normalizes front matter for every file in `files`.
    pub fn normalize(&self, files: &[PathBuf]) -> FrontMatterSummary {
        info!(
            "event=front_matter_check module=normalizer status=start format={} targets={}",
            self.config.front_matter_format,
            files.len()
        );
        let mut summary = FrontMatterSummary::default();
        let mut with_block = Vec::new();
        let mut without_block = Vec::new();

        for (index, file) in files.iter().enumerate() {
            match read_note_text(file) {
                Ok(content) => {
                    summary.checked += 1;
                    match detect_format(&content) {
                        Some(format) => {
                            debug!("event=front_matter_detected module=normalizer format={format} file={}", file.display());
                            with_block.push(file);
                        }
                        None => without_block.push(file),
                    }
                }
                Err(err) => {
                    error!("event=front_matter_read module=normalizer status=skipped error={err}");
                    summary.skipped += 1;
                }
            }
            info!(
                "event=front_matter_check module=normalizer progress={}/{}",
                index + 1,
                files.len()
            );
        }

        info!(
            "event=front_matter_update module=normalizer status=start targets={}",
            with_block.len()
        );
        for (index, file) in with_block.iter().enumerate() {
            match self.update_existing(file) {
                Ok(UpdateOutcome::Updated) => summary.updated += 1,
                Ok(UpdateOutcome::Unchanged) => {}
                Ok(UpdateOutcome::Unparseable) => summary.skipped += 1,
                Err(err) => {
                    error!("event=front_matter_update module=normalizer status=error error={err}");
                    summary.skipped += 1;
                }
            }
            debug!(
                "event=front_matter_update module=normalizer progress={}/{}",
                index + 1,
                with_block.len()
            );
        }
        info!(
            "event=front_matter_update module=normalizer status=ok updated={}",
            summary.updated
        );

        info!(
            "event=front_matter_create module=normalizer status=start targets={}",
            without_block.len()
        );
        for (index, file) in without_block.iter().enumerate() {
            match self.create_fresh(file) {
                Ok(()) => summary.created += 1,
                Err(err) => {
                    error!("event=front_matter_create module=normalizer status=error error={err}");
                    summary.skipped += 1;
                }
            }
            debug!(
                "event=front_matter_create module=normalizer progress={}/{}",
                index + 1,
                without_block.len()
            );
        }
        info!(
            "event=front_matter_create module=normalizer status=ok created={}",
            summary.created
        );

        summary
    }

    /// Computes the canonical field set for `path` with body `body`.
    ///
    /// Order: `title`, `aliases`, `date`, `update`, `tags`, `draft`.
    pub fn canonical_fields(
        &self,
        path: &Path,
        body: &str,
    ) -> NormalizeResult<Vec<(FieldKey, FieldValue)>> {
        let name = FileName::from_path(path);
        let is_draft = parent_dir_name(path)
            .map(|dir| self.config.is_inbox_dir(&dir))
            .unwrap_or(false);

        Ok(vec![
            (FieldKey::Title, FieldValue::Text(name.stem)),
            (FieldKey::Aliases, FieldValue::List(Vec::new())),
            (
                FieldKey::Date,
                FieldValue::Text(format_timestamp(creation_time(path)?)),
            ),
            (
                FieldKey::Update,
                FieldValue::Text(format_timestamp(modification_time(path)?)),
            ),
            (FieldKey::Tags, FieldValue::List(extract_tags(body))),
            (FieldKey::Draft, FieldValue::Bool(is_draft)),
        ])
    }

    fn create_fresh(&self, path: &Path) -> NormalizeResult<()> {
        let content = read_note_text(path)?;
        let front_matter: FrontMatter = self.canonical_fields(path, &content)?.into_iter().collect();

        let store = store_for(self.config.front_matter_format);
        let rendered = store.serialize(&front_matter, &strip_hashtag_lines(&content));
        write_note_text(path, &with_single_trailing_newline(&rendered))?;
        debug!(
            "event=front_matter_create module=normalizer status=ok format={} file={}",
            store.format(),
            path.display()
        );
        Ok(())
    }

    fn update_existing(&self, path: &Path) -> NormalizeResult<UpdateOutcome> {
        let content = read_note_text(path)?;
        let Some((format, parsed)) = parse_any(&content) else {
            return Ok(UpdateOutcome::Unchanged);
        };
        let mut document = match parsed {
            Ok(document) => document,
            Err(err) => {
                warn!(
                    "event=front_matter_parse module=normalizer status=skipped file={} error={err}",
                    path.display()
                );
                return Ok(UpdateOutcome::Unparseable);
            }
        };

        let mut changed = false;
        for (key, value) in self.canonical_fields(path, &document.body)? {
            if key == FieldKey::Update {
                let current = document.front_matter.get(&key).map(FieldValue::plain_text);
                if current.as_deref() != Some(value.plain_text().as_str()) {
                    debug!(
                        "event=front_matter_refresh module=normalizer field=update old={:?} new={}",
                        current,
                        value.plain_text()
                    );
                    document.front_matter.set(key, value);
                    changed = true;
                }
            } else if document.front_matter.insert_missing(key.clone(), value) {
                debug!("event=front_matter_backfill module=normalizer field={key}");
                changed = true;
            }
        }

        if !changed {
            return Ok(UpdateOutcome::Unchanged);
        }
        let rendered =
            store_for(format).serialize(&document.front_matter, &strip_hashtag_lines(&document.body));
        write_note_text(path, &with_single_trailing_newline(&rendered))?;
        Ok(UpdateOutcome::Updated)
    }
}

/// Collects `#token` occurrences in first-seen order, duplicates included.
///
/// A token starts after a line start or whitespace and runs until the next
/// whitespace or `#`. Fenced code blocks are not scanned.
pub fn extract_tags(body: &str) -> Vec<String> {
    prose_marks(body)
        .into_iter()
        .filter(|(_, prose)| *prose)
        .flat_map(|(line, _)| {
            HASHTAG_RE
                .captures_iter(line)
                .map(|caps| caps[1].to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Drops lines that are themselves a hashtag declaration.
///
/// `#tag` and `  #tag more` go; `text with #inline`, `# Heading` and
/// anything inside a fenced code block stay.
pub fn strip_hashtag_lines(body: &str) -> String {
    prose_marks(body)
        .into_iter()
        .filter(|(line, prose)| !(*prose && HASHTAG_LINE_RE.is_match(line.trim_start())))
        .map(|(line, _)| line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pairs each line with whether it is prose, i.e. outside a ``` or ~~~ fence.
///
/// A fence closes on a line opening with the same marker character, at least
/// as long as the opener. An unclosed fence runs to the end of the body.
fn prose_marks(body: &str) -> Vec<(&str, bool)> {
    let mut open: Option<(char, usize)> = None;
    body.split('\n')
        .map(|line| {
            let fence = fence_marker(line.trim_start());
            match (open, fence) {
                (None, Some(marker)) => {
                    open = Some(marker);
                    (line, false)
                }
                (Some((ch, len)), Some((fch, flen))) if ch == fch && flen >= len => {
                    open = None;
                    (line, false)
                }
                (Some(_), _) => (line, false),
                (None, None) => (line, true),
            }
        })
        .collect()
}

fn fence_marker(line: &str) -> Option<(char, usize)> {
    let ch = line.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = line.chars().take_while(|c| *c == ch).count();
    (len >= 3).then_some((ch, len))
}

/// Trims trailing newlines down to exactly one.
pub fn with_single_trailing_newline(content: &str) -> String {
    format!("{}\n", content.trim_end_matches('\n'))
}
