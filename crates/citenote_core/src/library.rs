/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! The library index: every entry of an export, keyed by citation key.

use crate::reference::{Entry, EntryData};
use indexmap::IndexMap;
use thiserror::Error;

/// Why an export could not be turned into a [`Library`].
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("export is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    #[error("export is not a JSON array of records: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A citation key that is not in the library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no entry with citation key '{0}' in the library")]
pub struct UnknownCitekey(pub String);

/// Entries keyed by citation key, in export order.
#[derive(Debug, Clone, Default)]
pub struct Library {
    entries: IndexMap<String, Entry>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an export buffer into a library.
    ///
    /// The whole buffer must decode and parse; there is no partial recovery.
    /// When a citation key occurs more than once the later record wins.
    pub fn load(buffer: &[u8]) -> Result<Self, LibraryError> {
        let text = std::str::from_utf8(buffer)?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let records: Vec<EntryData> = serde_json::from_str(text)?;
        let library: Library = records.into_iter().map(Entry::from).collect();
        log::debug!("decoded {} entries from {} bytes", library.len(), buffer.len());
        Ok(library)
    }

    /// Look up an entry. `None` is the not-found case.
    pub fn get(&self, citekey: &str) -> Option<&Entry> {
        self.entries.get(citekey)
    }

    /// Look up an entry, turning a miss into an error.
    pub fn lookup(&self, citekey: &str) -> Result<&Entry, UnknownCitekey> {
        self.get(citekey)
            .ok_or_else(|| UnknownCitekey(citekey.to_string()))
    }

    pub fn contains(&self, citekey: &str) -> bool {
        self.entries.contains_key(citekey)
    }

    pub fn insert(&mut self, entry: Entry) {
        self.entries.insert(entry.id.clone(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn citekeys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }
}

impl FromIterator<Entry> for Library {
    fn from_iter<T: IntoIterator<Item = Entry>>(iter: T) -> Self {
        let mut library = Library::new();
        for entry in iter {
            library.insert(entry);
        }
        library
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_indexes_by_id() {
        let library = Library::load(br#"[{"id": "a"}, {"id": "b"}, {"id": "c"}]"#).unwrap();
        assert_eq!(library.len(), 3);
        for key in ["a", "b", "c"] {
            assert_eq!(library.get(key).unwrap().id, key);
        }
        assert_eq!(library.citekeys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_duplicate_ids_last_write_wins() {
        let library =
            Library::load(br#"[{"id": "a", "year": 2000}, {"id": "a", "year": 2020}]"#).unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library.get("a").unwrap().year, Some(2020));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let mut buffer = "\u{feff}".as_bytes().to_vec();
        buffer.extend_from_slice(br#"[{"id": "bom"}]"#);
        assert!(Library::load(&buffer).unwrap().contains("bom"));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = Library::load(&[b'[', 0xff, 0xfe, b']']).unwrap_err();
        assert!(matches!(err, LibraryError::Decode(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Library::load(br#"[{"id": "a"},"#).unwrap_err(),
            LibraryError::Parse(_)
        ));
        // Top level must be an array of records with ids.
        assert!(matches!(
            Library::load(br#"{"id": "a"}"#).unwrap_err(),
            LibraryError::Parse(_)
        ));
        assert!(matches!(
            Library::load(br#"[{"title": "no id"}]"#).unwrap_err(),
            LibraryError::Parse(_)
        ));
    }

    #[test]
    fn test_lookup_unknown() {
        let library = Library::load(b"[]").unwrap();
        assert!(library.is_empty());
        assert_eq!(
            library.lookup("nonexistent").unwrap_err(),
            UnknownCitekey("nonexistent".to_string())
        );
    }
}
