/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

#![allow(dead_code)]

use serde_json::{json, Value};

/// A CSL-JSON record with one author and a `date-parts` year.
pub fn make_article(id: &str, family: &str, given: &str, year: i32, title: &str) -> Value {
    json!({
        "id": id,
        "type": "article-journal",
        "title": title,
        "author": [{"family": family, "given": given}],
        "issued": {"date-parts": [[year]]}
    })
}

/// Serialize records into an export buffer.
pub fn export(records: &[Value]) -> Vec<u8> {
    serde_json::to_vec(records).expect("records serialize")
}
