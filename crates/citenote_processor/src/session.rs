/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! The long-lived literature notes state and its user-facing operations.

use crate::error::NoteError;
use crate::host::{Editor, Workspace};
use crate::materializer::FileMaterializer;
use crate::notepath::NotePath;
use crate::synthesizer::{wiki_link, NoteSynthesizer, NoteTemplates};
use crate::vault::{FileHandle, Vault};
use citenote_core::{Config, Library};
use std::sync::{Arc, PoisonError, RwLock};

/// Owns the configuration, compiled templates and library of one vault.
///
/// The configuration together with its compiled templates, and the library,
/// are immutable snapshots behind locks that are held only long enough to
/// clone or swap the `Arc`. Reloads build the replacement
/// first and swap it in whole, so a failed reload leaves the previous state
/// active and a request never sees half of one generation.
pub struct LiteratureNotes<V> {
    materializer: FileMaterializer<V>,
    settings: RwLock<Arc<Settings>>,
    library: RwLock<Arc<Library>>,
}

/// A configuration and the templates compiled from it, swapped together.
struct Settings {
    config: Arc<Config>,
    templates: Arc<NoteTemplates>,
}

impl Settings {
    fn compile(config: Config) -> Result<Self, NoteError> {
        let templates = NoteTemplates::compile(&config)?;
        Ok(Self {
            config: Arc::new(config),
            templates: Arc::new(templates),
        })
    }
}

fn snapshot<T>(lock: &RwLock<Arc<T>>) -> Arc<T> {
    lock.read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn replace<T>(lock: &RwLock<Arc<T>>, value: T) {
    *lock.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(value);
}

impl<V: Vault> LiteratureNotes<V> {
    /// Compile the configured templates. The library starts empty; call
    /// [`init`](Self::init) to load it.
    pub fn new(vault: Arc<V>, config: Config) -> Result<Self, NoteError> {
        let settings = Settings::compile(config)?;
        Ok(Self {
            materializer: FileMaterializer::new(vault),
            settings: RwLock::new(Arc::new(settings)),
            library: RwLock::new(Arc::new(Library::new())),
        })
    }

    pub fn vault(&self) -> &Arc<V> {
        self.materializer.vault()
    }

    /// Startup load. A missing export path only logs a warning and leaves
    /// the library empty; any other failure is returned.
    pub async fn init(&self) -> Result<usize, NoteError> {
        match self.reload_from_export().await {
            Err(NoteError::ConfigMissing) => {
                log::warn!("{}", NoteError::ConfigMissing);
                Ok(0)
            }
            other => other,
        }
    }

    /// Replace the library with one parsed from `bytes`, returning its size.
    /// On failure the previous library stays active.
    pub fn reload_library(&self, bytes: &[u8]) -> Result<usize, NoteError> {
        match Library::load(bytes) {
            Ok(library) => {
                let count = library.len();
                replace(&self.library, library);
                log::info!("loaded {} library entries", count);
                Ok(count)
            }
            Err(e) => {
                log::warn!("library reload failed, keeping previous library: {}", e);
                Err(e.into())
            }
        }
    }

    /// Read the configured export through the vault and reload from it.
    pub async fn reload_from_export(&self) -> Result<usize, NoteError> {
        let path = self
            .config()
            .citation_export_path
            .clone()
            .ok_or(NoteError::ConfigMissing)?;
        log::debug!("reading export {}", path.display());
        let bytes = self.vault().read_file(&path).await?;
        self.reload_library(&bytes)
    }

    /// Swap in a new configuration. Templates are compiled before anything
    /// changes; on error the old configuration and templates remain.
    ///
    /// The library is not reloaded, even if the export path changed.
    pub fn apply_config(&self, config: Config) -> Result<(), NoteError> {
        let settings = Settings::compile(config)?;
        replace(&self.settings, settings);
        Ok(())
    }

    pub fn config(&self) -> Arc<Config> {
        snapshot(&self.settings).config.clone()
    }

    pub fn library(&self) -> Arc<Library> {
        snapshot(&self.library)
    }

    /// A synthesizer over the current library and templates.
    pub fn synthesizer(&self) -> NoteSynthesizer {
        let settings = snapshot(&self.settings);
        NoteSynthesizer::new(self.library(), settings.templates.clone())
    }

    pub fn title_for(&self, citekey: &str) -> Result<String, NoteError> {
        self.synthesizer().title_for(citekey)
    }

    pub fn path_for(&self, citekey: &str) -> Result<NotePath, NoteError> {
        self.synthesizer().path_for(citekey)
    }

    pub fn content_for(&self, citekey: &str) -> Result<String, NoteError> {
        self.synthesizer().content_for(citekey)
    }

    /// Return the note file for `citekey`, creating it from the content
    /// template if it does not exist. Existing notes are never rewritten.
    pub async fn get_or_create_literature_note_file(
        &self,
        citekey: &str,
    ) -> Result<FileHandle, NoteError> {
        let note = self.synthesizer().synthesize(citekey)?;
        let handle = self
            .materializer
            .get_or_create_with(note.path.as_path(), &note.content)
            .await?;
        Ok(handle)
    }

    pub async fn open_literature_note<W: Workspace + ?Sized>(
        &self,
        citekey: &str,
        workspace: &W,
        new_pane: bool,
    ) -> Result<FileHandle, NoteError> {
        let handle = self.get_or_create_literature_note_file(citekey).await?;
        workspace.open_file(&handle, new_pane).await?;
        Ok(handle)
    }

    /// Ensure the note exists, then insert a wiki link to it at the editor's
    /// cursor. Returns the inserted text.
    pub async fn insert_literature_note_link<E: Editor + ?Sized>(
        &self,
        citekey: &str,
        editor: &mut E,
    ) -> Result<String, NoteError> {
        let synthesizer = self.synthesizer();
        let note = synthesizer.synthesize(citekey)?;
        self.materializer
            .get_or_create_with(note.path.as_path(), &note.content)
            .await?;

        let link = wiki_link(&note);
        let at = editor.cursor();
        editor.insert_text(&link, at)?;
        Ok(link)
    }
}
