/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Core data model for citenote.
//!
//! This crate decodes a CSL-JSON export into a [`Library`] of normalized
//! [`Entry`] values, compiles the logic-less note templates, and defines the
//! persisted [`Config`]. It does no I/O beyond reading and writing the
//! configuration file; note synthesis and file creation live in
//! `citenote_processor`.
//!
//! # Example
//!
//! ```rust
//! use citenote_core::{CompiledTemplate, Library};
//!
//! let export = br#"[{"id": "smith2019", "author": [{"given": "Jane", "family": "Smith"}], "issued": {"date-parts": [[2019]]}}]"#;
//! let library = Library::load(export).unwrap();
//! let entry = library.get("smith2019").unwrap();
//!
//! let title = CompiledTemplate::compile("{{authorString}} ({{year}})").unwrap();
//! assert_eq!(title.render(&entry.template_context()), "Smith, J. (2019)");
//! ```

pub mod library;
pub mod options;
pub mod reference;
pub mod template;

pub use library::{Library, LibraryError, UnknownCitekey};
pub use options::{Config, ConfigError, ConfigFormat};
pub use reference::{Entry, EntryData, Name};
pub use template::{CompiledTemplate, TemplateError};
