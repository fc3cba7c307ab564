/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

#![allow(dead_code)]

use citenote_core::Config;
use citenote_processor::{FsVault, LiteratureNotes};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const EXPORT_NAME: &str = "My Library.json";

pub fn smith2019() -> Value {
    json!({
        "id": "smith2019",
        "authors": [{"given": "Jane", "family": "Smith"}],
        "year": 2019
    })
}

pub fn doe2020() -> Value {
    json!({
        "id": "doe2020",
        "type": "book",
        "title": "Notes on Notes",
        "author": [{"family": "Doe", "given": "John Paul"}, {"literal": "The Collective"}],
        "issued": {"date-parts": [[2020, 5]]},
        "publisher": "Field Press"
    })
}

/// A temporary vault with `records` written as the export.
pub fn vault_with_export(records: &[Value]) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    write_export(dir.path(), records);
    dir
}

pub fn write_export(root: &Path, records: &[Value]) {
    let bytes = serde_json::to_vec(records).expect("records serialize");
    std::fs::write(root.join(EXPORT_NAME), bytes).expect("write export");
}

pub fn config_with_export() -> Config {
    Config {
        citation_export_path: Some(EXPORT_NAME.into()),
        ..Default::default()
    }
}

pub async fn loaded_notes(dir: &TempDir, config: Config) -> Arc<LiteratureNotes<FsVault>> {
    let notes = LiteratureNotes::new(Arc::new(FsVault::new(dir.path())), config)
        .expect("templates compile");
    notes.init().await.expect("export loads");
    Arc::new(notes)
}
