/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use citenote_core::{ConfigError, LibraryError, TemplateError, UnknownCitekey};
use std::fmt;
use thiserror::Error;

/// Which of the three note templates an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Title,
    Path,
    Content,
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateKind::Title => write!(f, "title"),
            TemplateKind::Path => write!(f, "path"),
            TemplateKind::Content => write!(f, "content"),
        }
    }
}

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("citation export path is not set; update the configuration")]
    ConfigMissing,

    #[error("cannot load library: {0}")]
    Library(#[from] LibraryError),

    #[error("invalid literature note {which} template: {source}")]
    Template {
        which: TemplateKind,
        #[source]
        source: TemplateError,
    },

    #[error("unknown citation key '{0}'")]
    UnknownCitekey(String),

    #[error("invalid note path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<UnknownCitekey> for NoteError {
    fn from(e: UnknownCitekey) -> Self {
        NoteError::UnknownCitekey(e.0)
    }
}
