/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Literature note synthesis and creation.
//!
//! [`NoteSynthesizer`] turns a citation key into a note title, vault path and
//! initial content. [`FileMaterializer`] realizes a path in a [`Vault`]
//! exactly once. [`LiteratureNotes`] ties both to a reloadable library and
//! configuration and exposes the operations a host application calls.
//!
//! # Example
//!
//! ```rust
//! use citenote_core::{Config, Library};
//! use citenote_processor::{NoteSynthesizer, NoteTemplates};
//! use std::sync::Arc;
//!
//! let library = Library::load(br#"[{"id": "doe2020"}]"#).unwrap();
//! let templates = NoteTemplates::compile(&Config::default()).unwrap();
//! let synthesizer = NoteSynthesizer::new(Arc::new(library), Arc::new(templates));
//!
//! assert_eq!(
//!     synthesizer.path_for("doe2020").unwrap().as_str(),
//!     "Reading notes/@doe2020.md"
//! );
//! ```

pub mod error;
pub mod host;
pub mod materializer;
pub mod notepath;
pub mod session;
pub mod synthesizer;
pub mod vault;

pub use error::{NoteError, TemplateKind};
pub use host::{Editor, Position, Workspace};
pub use materializer::FileMaterializer;
pub use notepath::{sanitize_title, NotePath};
pub use session::LiteratureNotes;
pub use synthesizer::{NoteSynthesizer, NoteTemplates, SynthesizedNote};
pub use vault::{FileHandle, FsVault, Vault};
