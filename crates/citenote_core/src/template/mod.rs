/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Logic-less templates for literature notes.
//!
//! The language is the Handlebars subset needed for notes: `{{field}}`
//! interpolation with dotted paths, the `#if`, `#unless`, `#each` and `#with`
//! blocks with an optional `{{else}}`, and comments. There are no helpers
//! with arguments and nothing is ever evaluated. A field missing from the
//! context renders as empty text.
//!
//! ```rust
//! use citenote_core::template::CompiledTemplate;
//! use serde_json::json;
//!
//! let template = CompiledTemplate::compile("{{authorString}} ({{year}})").unwrap();
//! let title = template.render(&json!({"authorString": "Smith, J.", "year": 2019}));
//! assert_eq!(title, "Smith, J. (2019)");
//! ```

mod parser;
mod render;

use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

/// A template source that could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },
}

impl TemplateError {
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }
}

/// A compiled template, ready to render any number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTemplate {
    source: String,
    nodes: Vec<Node>,
}

impl CompiledTemplate {
    /// Compile a template source.
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        let nodes = parser::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            nodes,
        })
    }

    /// The source this template was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render against a context of named fields.
    pub fn render(&self, context: &Value) -> String {
        render::render(&self.nodes, context)
    }
}

impl FromStr for CompiledTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

/// Compile a template source.
pub fn compile(source: &str) -> Result<CompiledTemplate, TemplateError> {
    CompiledTemplate::compile(source)
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Text(String),
    Variable(Path),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Block {
    pub kind: BlockKind,
    pub path: Path,
    pub body: Vec<Node>,
    pub inverse: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockKind {
    If,
    Unless,
    Each,
    With,
}

impl BlockKind {
    fn from_helper(name: &str) -> Option<Self> {
        match name {
            "if" => Some(Self::If),
            "unless" => Some(Self::Unless),
            "each" => Some(Self::Each),
            "with" => Some(Self::With),
            _ => None,
        }
    }
}

/// Where a tag looks up its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Path {
    /// `name`, `a.b`, `this`, `../name`: `depth` counts the `../` steps.
    Scoped { depth: usize, segments: Vec<String> },
    /// `@root.a.b`
    Root(Vec<String>),
    /// `@index`, `@first`, `@last`, `@key`
    Data(DataVar),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DataVar {
    Index,
    First,
    Last,
    Key,
}

impl Path {
    pub(crate) fn parse(raw: &str) -> Result<Self, String> {
        if let Some(rest) = raw.strip_prefix("@root") {
            let rest = match rest {
                "" => "",
                _ => rest
                    .strip_prefix('.')
                    .ok_or_else(|| format!("invalid path '{}'", raw))?,
            };
            return Ok(Path::Root(segments(rest, raw)?));
        }
        if let Some(name) = raw.strip_prefix('@') {
            let var = match name {
                "index" => DataVar::Index,
                "first" => DataVar::First,
                "last" => DataVar::Last,
                "key" => DataVar::Key,
                _ => return Err(format!("unknown data variable '{}'", raw)),
            };
            return Ok(Path::Data(var));
        }

        let mut rest = raw;
        let mut depth = 0;
        while let Some(stripped) = rest.strip_prefix("../") {
            depth += 1;
            rest = stripped;
        }
        let rest = match rest {
            "this" | "." => "",
            _ => rest
                .strip_prefix("this.")
                .or_else(|| rest.strip_prefix("./"))
                .unwrap_or(rest),
        };
        Ok(Path::Scoped {
            depth,
            segments: segments(rest, raw)?,
        })
    }
}

fn segments(rest: &str, raw: &str) -> Result<Vec<String>, String> {
    if rest.is_empty() {
        return Ok(Vec::new());
    }
    rest.split('.')
        .map(|segment| {
            if segment.is_empty() || segment.contains(['/', '@']) || segment == ".." {
                Err(format!("invalid path '{}'", raw))
            } else {
                Ok(segment.to_string())
            }
        })
        .collect()
}
