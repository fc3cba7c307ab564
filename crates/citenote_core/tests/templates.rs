/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

mod common;
use common::*;

use citenote_core::options::{DEFAULT_CONTENT_TEMPLATE, DEFAULT_PATH_TEMPLATE, DEFAULT_TITLE_TEMPLATE};
use citenote_core::template::TemplateError;
use citenote_core::{CompiledTemplate, Library};
use serde_json::json;

#[test]
fn test_default_templates_compile() {
    for source in [DEFAULT_TITLE_TEMPLATE, DEFAULT_PATH_TEMPLATE, DEFAULT_CONTENT_TEMPLATE] {
        CompiledTemplate::compile(source).unwrap();
    }
}

#[test]
fn test_citekey_round_trip() {
    let library = Library::load(&export(&[json!({"id": "doe2020"})])).unwrap();
    let template = CompiledTemplate::compile("{{citekey}}").unwrap();
    let entry = library.get("doe2020").unwrap();
    assert_eq!(template.render(&entry.template_context()), "doe2020");
}

#[test]
fn test_default_content_for_entry() {
    let library = Library::load(&export(&[make_article(
        "smith2019",
        "Smith",
        "Jane",
        2019,
        "Cells",
    )]))
    .unwrap();
    let entry = library.get("smith2019").unwrap();
    let content = CompiledTemplate::compile(DEFAULT_CONTENT_TEMPLATE)
        .unwrap()
        .render(&entry.template_context());

    assert_eq!(
        content,
        "---\ntitle: Cells\nauthors: Smith, J.\nyear: 2019\n---\n\n"
    );
}

#[test]
fn test_author_loop_over_entry() {
    let record = json!({
        "id": "pair",
        "author": [
            {"family": "Smith", "given": "Jane"},
            {"literal": "ACME"}
        ]
    });
    let library = Library::load(&export(&[record])).unwrap();
    let template = CompiledTemplate::compile(
        "{{#each authors}}{{#if literal}}{{literal}}{{else}}{{given}} {{family}}{{/if}}{{#unless @last}} & {{/unless}}{{/each}}",
    )
    .unwrap();
    assert_eq!(
        template.render(&library.get("pair").unwrap().template_context()),
        "Jane Smith & ACME"
    );
}

#[test]
fn test_syntax_error_reports_offset() {
    let err = CompiledTemplate::compile("Notes/{{#if year}}{{year}}").unwrap_err();
    assert_eq!(
        err,
        TemplateError::Syntax {
            offset: 6,
            message: "'#if' block is never closed".to_string()
        }
    );
}
