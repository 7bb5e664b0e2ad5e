//! YAML (`---`) front matter.
//!
//! The block is validated with `serde_yaml`, but values are kept as their raw
//! text per top-level key so comments, quoting and nested layouts survive a
//! back-fill round trip.

use super::{split_line_delimited, FrontMatterError, FrontMatterFormat, FrontMatterStore, ParsedDocument};
use crate::model::front_matter::{FieldKey, FieldValue, FrontMatter};

const DELIMITER: &str = "---";

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlStore;

impl FrontMatterStore for YamlStore {
    fn format(&self) -> FrontMatterFormat {
        FrontMatterFormat::Yaml
    }

    fn parse(&self, content: &str) -> Result<ParsedDocument, FrontMatterError> {
        let (block, body) = split_line_delimited(content, DELIMITER).ok_or(
            FrontMatterError::Unterminated {
                format: FrontMatterFormat::Yaml,
            },
        )?;

        let decoded: serde_yaml::Value =
            serde_yaml::from_str(&block).map_err(|err| FrontMatterError::Malformed {
                format: FrontMatterFormat::Yaml,
                message: err.to_string(),
            })?;
        if !matches!(decoded, serde_yaml::Value::Mapping(_) | serde_yaml::Value::Null) {
            return Err(FrontMatterError::Malformed {
                format: FrontMatterFormat::Yaml,
                message: "top level is not a mapping".to_string(),
            });
        }

        Ok(ParsedDocument {
            front_matter: split_raw_entries(&block),
            body,
        })
    }

    fn render_block(&self, front_matter: &FrontMatter) -> String {
        let mut lines = vec![DELIMITER.to_string()];
        lines.extend(
            front_matter
                .iter()
                .map(|(key, value)| self.raw_field_line(key, value)),
        );
        lines.push(DELIMITER.to_string());
        lines.join("\n")
    }

    fn raw_field_line(&self, key: &FieldKey, value: &FieldValue) -> String {
        let key = render_key(key.as_str());
        let rendered = render_value(value);
        if rendered.is_empty() || rendered.starts_with('\n') {
            format!("{key}:{rendered}")
        } else {
            format!("{key}: {rendered}")
        }
    }
}

/// Splits block text into `key -> raw value` entries.
///
/// A top-level `key:` line opens an entry; indented lines, list items,
/// comments and blank lines continue the previous entry.
fn split_raw_entries(block: &str) -> FrontMatter {
    let mut entries: Vec<(String, String)> = Vec::new();

    for line in block.split('\n') {
        let opens_entry = line
            .chars()
            .next()
            .is_some_and(|first| !first.is_whitespace() && first != '#' && first != '-');
        match split_key(line) {
            Some((key, value)) if opens_entry => {
                entries.push((key, value.trim().to_string()));
            }
            _ => {
                // Comments ahead of the first key have no owner and are dropped.
                if let Some((_, raw)) = entries.last_mut() {
                    raw.push('\n');
                    raw.push_str(line);
                }
            }
        }
    }

    entries
        .into_iter()
        .map(|(key, raw)| (FieldKey::parse(&key), FieldValue::Raw(raw.trim_end().to_string())))
        .collect()
}

/// Splits `key: value` at the mapping separator.
///
/// Quoted keys end at their closing quote, so colons inside them never
/// split. A plain key ends at the first `:` followed by whitespace or the
/// end of the line.
fn split_key(line: &str) -> Option<(String, &str)> {
    match line.chars().next()? {
        '"' => {
            let mut escaped = false;
            let close = line
                .char_indices()
                .skip(1)
                .find(|(_, c)| {
                    let closes = *c == '"' && !escaped;
                    escaped = *c == '\\' && !escaped;
                    closes
                })
                .map(|(index, _)| index)?;
            let key = line[1..close].replace("\\\"", "\"").replace("\\\\", "\\");
            separator_value(&line[close + 1..]).map(|value| (key, value))
        }
        '\'' => {
            let close = line[1..].find('\'').map(|index| index + 1)?;
            let key = line[1..close].to_string();
            separator_value(&line[close + 1..]).map(|value| (key, value))
        }
        _ => {
            let bytes = line.as_bytes();
            let colon = line.char_indices().find(|(index, c)| {
                *c == ':'
                    && bytes
                        .get(index + 1)
                        .map_or(true, |next| next.is_ascii_whitespace())
            })?;
            Some((line[..colon.0].trim().to_string(), &line[colon.0 + 1..]))
        }
    }
}

fn separator_value(rest: &str) -> Option<&str> {
    rest.trim_start().strip_prefix(':')
}

/// Plain key unless YAML would misread it; keys with `:` are always quoted.
fn render_key(key: &str) -> String {
    if key.contains(':') || scalar(key) != key {
        double_quoted(key)
    } else {
        key.to_string()
    }
}

fn render_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => scalar(text),
        FieldValue::List(items) => {
            let rendered: Vec<String> = items.iter().map(|item| flow_item(item)).collect();
            format!("[{}]", rendered.join(", "))
        }
        FieldValue::Bool(flag) => flag.to_string(),
        FieldValue::Raw(raw) => raw.clone(),
    }
}

/// Plain scalar unless YAML would read it as something else.
fn scalar(text: &str) -> String {
    let needs_quotes = text.is_empty()
        || text.trim() != text
        || text.starts_with(|c: char| "[]{}#&*!|>'\"%@`,?:-".contains(c))
        || text.contains(": ")
        || text.contains(" #")
        || text.ends_with(':')
        || matches!(text, "true" | "false" | "null" | "~" | "yes" | "no");
    if needs_quotes {
        double_quoted(text)
    } else {
        text.to_string()
    }
}

/// Flow-sequence items additionally cannot contain `,`, `[` or `]`.
fn flow_item(text: &str) -> String {
    if text.contains([',', '[', ']', '{', '}']) {
        double_quoted(text)
    } else {
        scalar(text)
    }
}

fn double_quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
