//! Front-matter store: detect, parse and serialize delimited metadata blocks.
//!
//! # Responsibility
//! - Recognize YAML (`---`), TOML (`+++`) and JSON (`{`) blocks by the first
//!   non-empty line of a file.
//! - Decode a block into an ordered `FrontMatter` plus the remaining body.
//! - Render a `FrontMatter` back as a delimited block followed by one blank
//!   separator line and the body.
//!
//! # Invariants
//! - Parsing never panics; a detected but broken block is a
//!   `FrontMatterError` the caller recovers from.
//! - `serialize(parse(x))` is stable: leading blank lines of the body are
//!   folded into the single separator line.

use crate::model::front_matter::{FieldKey, FieldValue, FrontMatter};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod json;
mod toml_block;
mod yaml;

pub use json::JsonStore;
pub use toml_block::TomlStore;
pub use yaml::YamlStore;

/// Supported block formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontMatterFormat {
    #[default]
    Yaml,
    Toml,
    Json,
}

impl FrontMatterFormat {
    pub fn name(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }

    pub fn opening_delimiter(self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
            Self::Json => "{",
        }
    }
}

impl Display for FrontMatterFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontMatterError {
    /// Opening delimiter found but no closing delimiter before end of file.
    Unterminated { format: FrontMatterFormat },
    /// Block is delimited but its content does not decode.
    Malformed {
        format: FrontMatterFormat,
        message: String,
    },
}

impl Display for FrontMatterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unterminated { format } => {
                write!(f, "{format} front matter has no closing delimiter")
            }
            Self::Malformed { format, message } => {
                write!(f, "malformed {format} front matter: {message}")
            }
        }
    }
}

impl Error for FrontMatterError {}

/// Decoded block plus the text following its closing delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub front_matter: FrontMatter,
    pub body: String,
}

/// Format-specific front-matter codec.
pub trait FrontMatterStore {
    fn format(&self) -> FrontMatterFormat;

    /// Decodes the block at the top of `content`.
    fn parse(&self, content: &str) -> Result<ParsedDocument, FrontMatterError>;

    /// Renders the delimited block (without the trailing separator).
    fn render_block(&self, front_matter: &FrontMatter) -> String;

    /// One `key <sep> value` line for raw insertion into an unparseable block.
    fn raw_field_line(&self, key: &FieldKey, value: &FieldValue) -> String;

    /// Renders the block, one blank separator line, then `body`.
    fn serialize(&self, front_matter: &FrontMatter, body: &str) -> String {
        format!(
            "{}\n\n{}",
            self.render_block(front_matter),
            body.trim_start_matches('\n')
        )
    }
}

static YAML_STORE: YamlStore = YamlStore;
static TOML_STORE: TomlStore = TomlStore;
static JSON_STORE: JsonStore = JsonStore;

pub fn store_for(format: FrontMatterFormat) -> &'static dyn FrontMatterStore {
    match format {
        FrontMatterFormat::Yaml => &YAML_STORE,
        FrontMatterFormat::Toml => &TOML_STORE,
        FrontMatterFormat::Json => &JSON_STORE,
    }
}

/// Detects the block format from the first non-empty line.
pub fn detect_format(content: &str) -> Option<FrontMatterFormat> {
    let first = content.lines().map(str::trim).find(|line| !line.is_empty())?;
    match first {
        "---" => Some(FrontMatterFormat::Yaml),
        "+++" => Some(FrontMatterFormat::Toml),
        "{" => Some(FrontMatterFormat::Json),
        _ => None,
    }
}

/// Detects and parses in one step; `None` when no block is present.
pub fn parse_any(
    content: &str,
) -> Option<(FrontMatterFormat, Result<ParsedDocument, FrontMatterError>)> {
    let format = detect_format(content)?;
    Some((format, store_for(format).parse(content)))
}

/// Inserts `line` directly after the opening delimiter line.
///
/// Used when a block is detected but cannot be decoded.
pub fn insert_after_opening_line(content: &str, line: &str) -> String {
    let mut lines: Vec<&str> = content.split('\n').collect();
    let index = lines
        .iter()
        .position(|candidate| !candidate.trim().is_empty())
        .map(|opening| opening + 1)
        .unwrap_or(0)
        .min(lines.len());
    lines.insert(index, line);
    lines.join("\n")
}

/// Splits a line-delimited block (`---` / `+++`).
///
/// Returns `(block_text, body)`; `None` when the closing delimiter is missing.
pub(crate) fn split_line_delimited(content: &str, delimiter: &str) -> Option<(String, String)> {
    let lines: Vec<&str> = content.split('\n').collect();
    let start = lines.iter().position(|line| !line.trim().is_empty())?;
    if lines[start].trim() != delimiter {
        return None;
    }
    let end = lines
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, line)| line.trim() == delimiter)
        .map(|(index, _)| index)?;

    let block = lines[start + 1..end].join("\n");
    let body = lines[end + 1..].join("\n");
    Some((block, body.trim_start_matches('\n').to_string()))
}

#[cfg(test)]
mod tests {
    use super::{detect_format, insert_after_opening_line, parse_any, FrontMatterFormat};

    #[test]
    fn detects_each_format_by_first_non_empty_line() {
        assert_eq!(detect_format("---\na: b\n---\n"), Some(FrontMatterFormat::Yaml));
        assert_eq!(detect_format("\n\n+++\na = 1\n+++\n"), Some(FrontMatterFormat::Toml));
        assert_eq!(detect_format("{\n\"a\": 1\n}\n"), Some(FrontMatterFormat::Json));
        assert_eq!(detect_format("# Heading\n---\n"), None);
        assert_eq!(detect_format(""), None);
    }

    #[test]
    fn parse_any_reports_unterminated_block() {
        let (format, parsed) = parse_any("---\ntitle: x\nbody").expect("format detected");
        assert_eq!(format, FrontMatterFormat::Yaml);
        assert!(parsed.is_err());
    }

    #[test]
    fn parse_any_returns_none_without_block() {
        assert!(parse_any("plain note").is_none());
    }

    #[test]
    fn raw_insertion_goes_after_opening_delimiter() {
        let updated = insert_after_opening_line("\n---\ntitle: x", "uid: abc");
        assert_eq!(updated, "\n---\nuid: abc\ntitle: x");
    }
}
