//! TOML (`+++`) front matter.

use super::{split_line_delimited, FrontMatterError, FrontMatterFormat, FrontMatterStore, ParsedDocument};
use crate::model::front_matter::{FieldKey, FieldValue, FrontMatter};

const DELIMITER: &str = "+++";

#[derive(Debug, Clone, Copy, Default)]
pub struct TomlStore;

impl FrontMatterStore for TomlStore {
    fn format(&self) -> FrontMatterFormat {
        FrontMatterFormat::Toml
    }

    fn parse(&self, content: &str) -> Result<ParsedDocument, FrontMatterError> {
        let (block, body) = split_line_delimited(content, DELIMITER).ok_or(
            FrontMatterError::Unterminated {
                format: FrontMatterFormat::Toml,
            },
        )?;
        let table: toml::Table = block.parse().map_err(|err: toml::de::Error| {
            FrontMatterError::Malformed {
                format: FrontMatterFormat::Toml,
                message: err.message().to_string(),
            }
        })?;

        let front_matter = table
            .into_iter()
            .map(|(key, value)| (FieldKey::parse(&key), from_toml(value)))
            .collect();
        Ok(ParsedDocument { front_matter, body })
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
        format!("{} = {}", render_key(key.as_str()), render_value(value))
    }
}

fn from_toml(value: toml::Value) -> FieldValue {
    match value {
        toml::Value::String(text) => FieldValue::Text(text),
        toml::Value::Boolean(flag) => FieldValue::Bool(flag),
        toml::Value::Array(items) if items.iter().all(toml::Value::is_str) => FieldValue::List(
            items
                .into_iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
        ),
        other => FieldValue::Raw(other.to_string()),
    }
}

fn render_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        key.to_string()
    } else {
        toml::Value::String(key.to_string()).to_string()
    }
}

fn render_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(text) => toml::Value::String(text.clone()).to_string(),
        FieldValue::List(items) => toml::Value::Array(
            items
                .iter()
                .map(|item| toml::Value::String(item.clone()))
                .collect(),
        )
        .to_string(),
        FieldValue::Bool(flag) => flag.to_string(),
        FieldValue::Raw(raw) => raw.clone(),
    }
}
