//! Line-level link substitution for one renamed file.
//!
//! # Responsibility
//! - Rewrite `[[stem]]`, `[[stem.ext]]` and `[[stem | alias]]` into
//!   `[label](new_name)`.
//! - Rewrite the path of relative `[label](dir/old_name)` links to `new_name`.
//!
//! # Invariants
//! - Pure: no I/O, the same input always yields the same output.
//! - Absolute URLs (`http…`, `scheme://…`) are never rewritten.
//! - A Markdown path only matches at a `/` boundary, so `othersource.md`
//!   never matches `source.md`.

use crate::model::file_name::FileName;
use regex::{Captures, Regex};

/// Substitution counts for one rewritten line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRewrite {
    pub line: String,
    pub wiki_links: usize,
    pub markdown_links: usize,
}

/// Compiled link patterns for one old filename.
#[derive(Debug, Clone)]
pub struct LinkPattern {
    wiki: Regex,
    markdown: Regex,
}

impl LinkPattern {
    pub fn new(old: &FileName) -> Self {
        let stem = regex::escape(&old.stem);
        let extension = regex::escape(&old.extension);
        let full_name = regex::escape(&old.full_name);

        let wiki = format!(
            r"\[\[(?P<target>{stem}(?:{extension})?)(?:\s*\|\s*(?P<alias>[^\]]+?))?\s*\]\]"
        );
        let markdown = format!(
            r"\[(?P<label>[^\]]*)\]\((?P<path>(?:[^()\n]*/)?{full_name})(?P<anchor>#[^()\s]*)?\)"
        );

        // Both patterns are built from escaped literals around a fixed shape.
        Self {
            wiki: Regex::new(&wiki).expect("escaped wiki-link pattern is valid"),
            markdown: Regex::new(&markdown).expect("escaped markdown-link pattern is valid"),
        }
    }

    /// Rewrites every matching link in `line`; `None` when nothing matched.
    pub fn rewrite_line(&self, line: &str, new_name: &str) -> Option<LineRewrite> {
        let mut wiki_links = 0;
        let after_wiki = self.wiki.replace_all(line, |caps: &Captures<'_>| {
            wiki_links += 1;
            let label = caps
                .name("alias")
                .or_else(|| caps.name("target"))
                .map(|m| m.as_str())
                .unwrap_or_default();
            format!("[{label}]({new_name})")
        });

        let mut markdown_links = 0;
        let rewritten = self.markdown.replace_all(&after_wiki, |caps: &Captures<'_>| {
            let path = &caps["path"];
            if is_absolute_url(path) {
                return caps[0].to_string();
            }
            markdown_links += 1;
            let anchor = caps.name("anchor").map(|m| m.as_str()).unwrap_or_default();
            format!("[{}]({new_name}{anchor})", &caps["label"])
        });

        if wiki_links + markdown_links == 0 {
            return None;
        }
        Some(LineRewrite {
            line: rewritten.into_owned(),
            wiki_links,
            markdown_links,
        })
    }
}

fn is_absolute_url(path: &str) -> bool {
    path.starts_with("http") || path.contains("://")
}

/// One-shot form of [`LinkPattern::rewrite_line`].
pub fn rewrite_line(line: &str, old: &FileName, new_name: &str) -> Option<String> {
    LinkPattern::new(old)
        .rewrite_line(line, new_name)
        .map(|rewrite| rewrite.line)
}
