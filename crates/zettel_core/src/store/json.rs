//! JSON (`{` … `}`) front matter.
//!
//! The closing brace is found by tracking brace depth outside of string
//! literals; the body starts on the line after it.

use super::{FrontMatterError, FrontMatterFormat, FrontMatterStore, ParsedDocument};
use crate::model::front_matter::{FieldKey, FieldValue, FrontMatter};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStore;

impl FrontMatterStore for JsonStore {
    fn format(&self) -> FrontMatterFormat {
        FrontMatterFormat::Json
    }

    fn parse(&self, content: &str) -> Result<ParsedDocument, FrontMatterError> {
        let start = content
            .find('{')
            .filter(|index| content[..*index].trim().is_empty())
            .ok_or(FrontMatterError::Unterminated {
                format: FrontMatterFormat::Json,
            })?;
        let end = closing_brace(&content[start..])
            .map(|offset| start + offset)
            .ok_or(FrontMatterError::Unterminated {
                format: FrontMatterFormat::Json,
            })?;

        let object: Map<String, Value> = serde_json::from_str(&content[start..=end]).map_err(
            |err| FrontMatterError::Malformed {
                format: FrontMatterFormat::Json,
                message: err.to_string(),
            },
        )?;

        let rest = &content[end + 1..];
        let body = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => "",
        };

        let front_matter = object
            .into_iter()
            .map(|(key, value)| (FieldKey::parse(&key), from_json(value)))
            .collect();
        Ok(ParsedDocument {
            front_matter,
            body: body.trim_start_matches('\n').to_string(),
        })
    }

    fn render_block(&self, front_matter: &FrontMatter) -> String {
        let object: Map<String, Value> = front_matter
            .iter()
            .map(|(key, value)| (key.as_str().to_string(), to_json(value)))
            .collect();
        serde_json::to_string_pretty(&Value::Object(object)).unwrap_or_else(|_| "{}".to_string())
    }

    fn raw_field_line(&self, key: &FieldKey, value: &FieldValue) -> String {
        format!(
            "  {}: {},",
            Value::String(key.as_str().to_string()),
            to_json(value)
        )
    }
}

/// Byte offset of the brace closing the object that starts at offset 0.
fn closing_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

fn from_json(value: Value) -> FieldValue {
    match value {
        Value::String(text) => FieldValue::Text(text),
        Value::Bool(flag) => FieldValue::Bool(flag),
        Value::Array(items) if items.iter().all(Value::is_string) => FieldValue::List(
            items
                .into_iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
        ),
        other => FieldValue::Raw(other.to_string()),
    }
}

fn to_json(value: &FieldValue) -> Value {
    match value {
        FieldValue::Text(text) => Value::String(text.clone()),
        FieldValue::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
        FieldValue::Bool(flag) => Value::Bool(*flag),
        FieldValue::Raw(raw) => {
            serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{closing_brace, JsonStore};
    use crate::model::front_matter::{FieldKey, FieldValue, FrontMatter};
    use crate::store::{FrontMatterError, FrontMatterStore};

    #[test]
    fn parses_object_and_body() {
        let content = "{\n  \"title\": \"Test\",\n  \"meta\": {\"n\": 1},\n  \"tags\": [\"a\"]\n}\n\nbody line\n";
        let doc = JsonStore.parse(content).expect("valid json front matter");

        assert_eq!(doc.front_matter.get(&FieldKey::Title), Some(&FieldValue::Text("Test".into())));
        assert_eq!(
            doc.front_matter.get(&FieldKey::Other("meta".into())),
            Some(&FieldValue::Raw("{\"n\":1}".into()))
        );
        assert_eq!(doc.body, "body line\n");
    }

    #[test]
    fn braces_inside_strings_do_not_close_block() {
        assert_eq!(closing_brace("{\"a\": \"}\"}"), Some(9));
        assert_eq!(closing_brace("{\"a\": {"), None);
    }

    #[test]
    fn unterminated_object_is_reported() {
        let err = JsonStore.parse("{\n\"title\": \"x\"\nbody").unwrap_err();
        assert!(matches!(err, FrontMatterError::Unterminated { .. }));
    }

    #[test]
    fn serializes_pretty_object_with_typed_values() {
        let fm: FrontMatter = [
            (FieldKey::Title, FieldValue::Text("t".into())),
            (FieldKey::Tags, FieldValue::List(vec!["a".into(), "b".into()])),
            (FieldKey::Draft, FieldValue::Bool(true)),
        ]
        .into_iter()
        .collect();

        let rendered = JsonStore.serialize(&fm, "body\n");
        assert_eq!(
            rendered,
            "{\n  \"title\": \"t\",\n  \"tags\": [\n    \"a\",\n    \"b\"\n  ],\n  \"draft\": true\n}\n\nbody\n"
        );
        let reparsed = JsonStore.parse(&rendered).unwrap();
        assert_eq!(reparsed.front_matter, fm);
    }
}
