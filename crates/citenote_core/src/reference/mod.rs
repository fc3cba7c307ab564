/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Bibliographic entries.
//!
//! [`EntryData`] is a record exactly as decoded from the export: an `id` plus
//! whatever CSL-JSON fields the reference manager wrote. [`Entry`] is the
//! normalized, immutable form the templates are rendered from.

pub mod date;
pub mod name;

pub use name::{author_string, Name};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// A value that could be either a number or a string.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StringOrNumber {
    String(String),
    Number(i64),
}

impl std::fmt::Display for StringOrNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", s),
            Self::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A raw record from the export.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EntryData {
    /// The citation key.
    pub id: StringOrNumber,
    /// All remaining CSL-JSON fields, untouched.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EntryData {
    pub fn new(id: &str) -> Self {
        Self {
            id: StringOrNumber::String(id.to_string()),
            fields: Map::new(),
        }
    }

    /// Builder-style helper for constructing records in code.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }
}

/// A normalized bibliographic entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: String,
    pub authors: Vec<Name>,
    /// "Family, G.; Family2, G2." derived from `authors`.
    pub author_string: String,
    pub year: Option<i32>,
    pub ref_type: Option<String>,
    pub title: Option<String>,
    pub title_short: Option<String>,
    pub container_title: Option<String>,
    pub publisher: Option<String>,
    pub publisher_place: Option<String>,
    pub page: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
    pub abstract_text: Option<String>,
    data: EntryData,
}

impl Entry {
    /// The record this entry was normalized from.
    pub fn data(&self) -> &EntryData {
        &self.data
    }

    /// Link that selects the item in a running Zotero instance.
    pub fn zotero_select_uri(&self) -> String {
        format!("zotero://select/items/@{}", self.id)
    }

    /// The named fields templates can refer to.
    pub fn template_context(&self) -> Value {
        json!({
            "citekey": self.id,
            "authors": self.authors,
            "authorString": self.author_string,
            "year": self.year,
            "type": self.ref_type,
            "title": self.title,
            "titleShort": self.title_short,
            "containerTitle": self.container_title,
            "publisher": self.publisher,
            "publisherPlace": self.publisher_place,
            "page": self.page,
            "DOI": self.doi,
            "URL": self.url,
            "abstract": self.abstract_text,
            "zoteroSelectURI": self.zotero_select_uri(),
        })
    }
}

impl From<EntryData> for Entry {
    fn from(data: EntryData) -> Self {
        let fields = &data.fields;
        let authors: Vec<Name> = fields
            .get("author")
            .or_else(|| fields.get("authors"))
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Name::from_value).collect())
            .unwrap_or_default();
        let text = |key: &str| fields.get(key).and_then(name::scalar_text);

        Entry {
            id: data.id.to_string(),
            author_string: author_string(&authors),
            authors,
            year: date::year_of(fields),
            ref_type: text("type"),
            title: text("title"),
            title_short: text("title-short"),
            container_title: text("container-title"),
            publisher: text("publisher"),
            publisher_place: text("publisher-place"),
            page: text("page"),
            doi: text("DOI"),
            url: text("URL"),
            abstract_text: text("abstract"),
            data,
        }
    }
}
