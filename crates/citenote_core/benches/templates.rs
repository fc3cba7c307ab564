/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use citenote_core::{CompiledTemplate, Library};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const CONTENT_TEMPLATE: &str = "---\ntitle: {{title}}\nauthors:\n{{#each authors}}\n  - {{family}}, {{given}}\n{{/each}}\nyear: {{#if year}}{{year}}{{else}}n.d.{{/if}}\n---\n\n";

fn export(n: usize) -> Vec<u8> {
    let records: Vec<serde_json::Value> = (0..n)
        .map(|i| {
            serde_json::json!({
                "id": format!("item{}", i),
                "type": "article-journal",
                "title": format!("Article number {}", i),
                "author": [
                    {"family": "Smith", "given": "Jane Quinn"},
                    {"family": "Doe", "given": "Jean-Paul"}
                ],
                "issued": {"date-parts": [[1990 + (i % 30) as i64]]}
            })
        })
        .collect();
    serde_json::to_vec(&records).unwrap()
}

fn bench_templates(c: &mut Criterion) {
    c.bench_function("Compile content template", |b| {
        b.iter(|| CompiledTemplate::compile(black_box(CONTENT_TEMPLATE)).unwrap())
    });

    let library = Library::load(&export(100)).unwrap();
    let template = CompiledTemplate::compile(CONTENT_TEMPLATE).unwrap();
    c.bench_function("Render content template (100 entries)", |b| {
        b.iter(|| {
            for entry in library.iter() {
                black_box(template.render(&entry.template_context()));
            }
        })
    });

    let buffer = export(1000);
    c.bench_function("Load library (1000 entries)", |b| {
        b.iter(|| Library::load(black_box(&buffer)).unwrap())
    });
}

criterion_group!(benches, bench_templates);
criterion_main!(benches);
