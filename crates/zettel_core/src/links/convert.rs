//! Bulk conversion of remaining wiki-links into Markdown links.

use crate::text_io::{read_note_text, write_note_text};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::PathBuf;

static WIKILINK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\[(?P<target>[^\]|]+?)\s*(?:\|\s*(?P<alias>[^\]]+?)\s*)?\]\]")
        .expect("valid wikilink regex")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub files_modified: usize,
    pub links_converted: usize,
}

/// Converts `[[target]]` / `[[target | alias]]` to `[label](target.md)`.
///
/// A trailing `.md` on the target is dropped before re-appending it; the
/// label is the alias when present, else the target without extension.
pub fn convert_line(line: &str) -> (String, usize) {
    let mut converted = 0;
    let rewritten = WIKILINK_RE.replace_all(line, |caps: &Captures<'_>| {
        converted += 1;
        let target = caps["target"].trim();
        let target = target.strip_suffix(".md").unwrap_or(target);
        let label = caps.name("alias").map(|m| m.as_str()).unwrap_or(target);
        format!("[{label}]({target}.md)")
    });
    (rewritten.into_owned(), converted)
}

pub fn convert_wikilinks(files: &[PathBuf]) -> ConversionSummary {
    info!(
        "event=convert_wikilinks module=links status=start targets={}",
        files.len()
    );
    let mut summary = ConversionSummary::default();

    for file in files {
        let content = match read_note_text(file) {
            Ok(content) => content,
            Err(err) => {
                warn!("event=convert_read module=links status=skipped error={err}");
                continue;
            }
        };

        let mut links_in_file = 0;
        let lines: Vec<String> = content
            .split('\n')
            .map(|line| {
                let (rewritten, count) = convert_line(line);
                links_in_file += count;
                rewritten
            })
            .collect();
        if links_in_file == 0 {
            continue;
        }

        match write_note_text(file, &lines.join("\n")) {
            Ok(()) => {
                summary.files_modified += 1;
                summary.links_converted += links_in_file;
                debug!(
                    "event=convert_file module=links file={} links={links_in_file}",
                    file.display()
                );
            }
            Err(err) => warn!("event=convert_write module=links status=error error={err}"),
        }
    }

    info!(
        "event=convert_wikilinks module=links status=ok files_modified={} links_converted={}",
        summary.files_modified, summary.links_converted
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::convert_line;

    #[test]
    fn converts_plain_and_aliased_links() {
        assert_eq!(
            convert_line("see [[Idea]] and [[Other.md | the other]]"),
            (
                "see [Idea](Idea.md) and [the other](Other.md)".to_string(),
                2
            )
        );
    }

    #[test]
    fn leaves_lines_without_links_alone() {
        assert_eq!(convert_line("no links [x](y.md)"), ("no links [x](y.md)".to_string(), 0));
    }
}
