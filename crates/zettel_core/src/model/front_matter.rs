//! Front-matter record.
//!
//! # Responsibility
//! - Address the canonical fields (`title`, `aliases`, `date`, `update`,
//!   `tags`, `draft`) and the identifier field (`uid`) through typed keys.
//! - Carry any other user key through `FieldKey::Other` untouched.
//!
//! # Invariants
//! - Keys are unique within one `FrontMatter`.
//! - Entries keep insertion order; replacing a value keeps its slot.

use std::fmt::{Display, Formatter};

/// Typed front-matter key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Title,
    Aliases,
    Date,
    Update,
    Tags,
    Draft,
    Uid,
    Other(String),
}

impl FieldKey {
    /// Canonical field set in the order a fresh block is written.
    pub const CANONICAL: [FieldKey; 6] = [
        FieldKey::Title,
        FieldKey::Aliases,
        FieldKey::Date,
        FieldKey::Update,
        FieldKey::Tags,
        FieldKey::Draft,
    ];

    pub fn parse(key: &str) -> Self {
        match key {
            "title" => Self::Title,
            "aliases" => Self::Aliases,
            "date" => Self::Date,
            "update" => Self::Update,
            "tags" => Self::Tags,
            "draft" => Self::Draft,
            "uid" => Self::Uid,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::Aliases => "aliases",
            Self::Date => "date",
            Self::Update => "update",
            Self::Tags => "tags",
            Self::Draft => "draft",
            Self::Uid => "uid",
            Self::Other(key) => key.as_str(),
        }
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One front-matter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Scalar string.
    Text(String),
    /// Flat list of strings, rendered inline (`[a, b]`).
    List(Vec<String>),
    /// Boolean flag.
    Bool(bool),
    /// Format-native literal written back verbatim.
    Raw(String),
}

impl FieldValue {
    /// Scalar text view used for value comparisons across formats.
    ///
    /// `Raw` values lose one layer of matching surrounding quotes.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::List(items) => format!("[{}]", items.join(", ")),
            Self::Bool(flag) => flag.to_string(),
            Self::Raw(raw) => unquote(raw.trim()).to_string(),
        }
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Ordered front-matter block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    entries: Vec<(FieldKey, FieldValue)>,
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &FieldKey) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, key: &FieldKey) -> bool {
        self.get(key).is_some()
    }

    /// Sets `key`, replacing in place when present, appending otherwise.
    ///
    /// Returns the previous value.
    pub fn set(&mut self, key: FieldKey, value: FieldValue) -> Option<FieldValue> {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Appends `key` only when absent. Returns whether it was added.
    pub fn insert_missing(&mut self, key: FieldKey, value: FieldValue) -> bool {
        if self.contains(&key) {
            return false;
        }
        self.entries.push((key, value));
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &FieldValue)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }
}

impl FromIterator<(FieldKey, FieldValue)> for FrontMatter {
    fn from_iter<I: IntoIterator<Item = (FieldKey, FieldValue)>>(iter: I) -> Self {
        let mut front_matter = Self::new();
        for (key, value) in iter {
            front_matter.set(key, value);
        }
        front_matter
    }
}
