/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use super::{Block, BlockKind, DataVar, Node, Path};
use serde_json::Value;
use std::borrow::Cow;

/// One level of context: the value `this` refers to, plus loop data when the
/// level was pushed by `#each`.
struct Scope<'a> {
    value: &'a Value,
    iteration: Option<Iteration<'a>>,
}

#[derive(Clone, Copy)]
struct Iteration<'a> {
    index: usize,
    len: usize,
    key: Option<&'a str>,
}

pub(super) fn render(nodes: &[Node], context: &Value) -> String {
    let mut out = String::new();
    let mut scopes = vec![Scope {
        value: context,
        iteration: None,
    }];
    render_nodes(nodes, context, &mut scopes, &mut out);
    out
}

fn render_nodes<'a>(
    nodes: &[Node],
    root: &'a Value,
    scopes: &mut Vec<Scope<'a>>,
    out: &mut String,
) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Variable(path) => {
                if let Some(value) = resolve(path, root, scopes) {
                    write_value(&value, out);
                }
            }
            Node::Block(block) => render_block(block, root, scopes, out),
        }
    }
}

fn render_block<'a>(block: &Block, root: &'a Value, scopes: &mut Vec<Scope<'a>>, out: &mut String) {
    let value = resolve(&block.path, root, scopes);

    match block.kind {
        BlockKind::If | BlockKind::Unless => {
            let truthy = value.as_deref().is_some_and(is_truthy);
            let show_body = truthy == (block.kind == BlockKind::If);
            let branch = if show_body { &block.body } else { &block.inverse };
            render_nodes(branch, root, scopes, out);
        }
        BlockKind::Each => {
            let rendered_any = match value {
                Some(Cow::Borrowed(value)) => render_each(block, value, root, scopes, out),
                _ => false,
            };
            if !rendered_any {
                render_nodes(&block.inverse, root, scopes, out);
            }
        }
        BlockKind::With => match value {
            Some(Cow::Borrowed(value)) if is_truthy(value) => {
                scopes.push(Scope {
                    value,
                    iteration: None,
                });
                render_nodes(&block.body, root, scopes, out);
                scopes.pop();
            }
            _ => render_nodes(&block.inverse, root, scopes, out),
        },
    }
}

/// Render the body once per element; returns false when there was nothing
/// to iterate over.
fn render_each<'a>(
    block: &Block,
    value: &'a Value,
    root: &'a Value,
    scopes: &mut Vec<Scope<'a>>,
    out: &mut String,
) -> bool {
    let items: Vec<(Option<&'a str>, &'a Value)> = match value {
        Value::Array(items) => items.iter().map(|item| (None, item)).collect(),
        Value::Object(map) => map.iter().map(|(k, v)| (Some(k.as_str()), v)).collect(),
        _ => return false,
    };

    let len = items.len();
    for (index, (key, item)) in items.into_iter().enumerate() {
        scopes.push(Scope {
            value: item,
            iteration: Some(Iteration { index, len, key }),
        });
        render_nodes(&block.body, root, scopes, out);
        scopes.pop();
    }
    len > 0
}

fn resolve<'a>(path: &Path, root: &'a Value, scopes: &[Scope<'a>]) -> Option<Cow<'a, Value>> {
    match path {
        Path::Scoped { depth, segments } => {
            let scope = scopes.len().checked_sub(depth + 1).map(|i| &scopes[i])?;
            walk(scope.value, segments).map(Cow::Borrowed)
        }
        Path::Root(segments) => walk(root, segments).map(Cow::Borrowed),
        Path::Data(var) => {
            let iteration = scopes.iter().rev().find_map(|s| s.iteration)?;
            let value = match var {
                DataVar::Index => Value::from(iteration.index),
                DataVar::First => Value::Bool(iteration.index == 0),
                DataVar::Last => Value::Bool(iteration.index + 1 == iteration.len),
                DataVar::Key => match iteration.key {
                    Some(key) => Value::String(key.to_string()),
                    None => Value::from(iteration.index),
                },
            };
            Some(Cow::Owned(value))
        }
    }
}

fn walk<'a>(value: &'a Value, segments: &[String]) -> Option<&'a Value> {
    segments.iter().try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Falsy values: `false`, `null`, `""`, `0` and `[]`.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null | Value::Object(_) => {}
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(s),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
        }
    }
}
