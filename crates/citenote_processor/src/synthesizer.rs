/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Literature note synthesis.
//!
//! The pipeline runs in a fixed order: entry → title → path. The title
//! template sees the entry's fields, the path template sees only
//! `{{noteTitle}}`, and the content template sees the entry's fields again.

use crate::error::{NoteError, TemplateKind};
use crate::notepath::{sanitize_title, NotePath};
use citenote_core::{CompiledTemplate, Config, Entry, Library};
use serde_json::json;
use std::sync::Arc;

/// The three note templates, compiled together from one configuration.
#[derive(Debug, Clone)]
pub struct NoteTemplates {
    pub title: CompiledTemplate,
    pub path: CompiledTemplate,
    pub content: CompiledTemplate,
    pub path_replacement: String,
}

impl NoteTemplates {
    /// Compile all three templates; the first failure is reported with the
    /// template it came from.
    pub fn compile(config: &Config) -> Result<Self, NoteError> {
        let compile = |which: TemplateKind, source: &str| {
            CompiledTemplate::compile(source).map_err(|source| NoteError::Template { which, source })
        };

        let templates = Self {
            title: compile(TemplateKind::Title, &config.literature_note_title_template)?,
            path: compile(TemplateKind::Path, &config.literature_note_path_template)?,
            content: compile(TemplateKind::Content, &config.literature_note_content_template)?,
            path_replacement: config.path_replacement.clone(),
        };
        log::debug!("compiled literature note templates");
        Ok(templates)
    }
}

/// Title, path and initial content for one citation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedNote {
    pub title: String,
    pub path: NotePath,
    pub content: String,
}

/// Renders notes from one library snapshot and one set of templates.
///
/// Cloning is cheap; both halves are shared.
#[derive(Debug, Clone)]
pub struct NoteSynthesizer {
    library: Arc<Library>,
    templates: Arc<NoteTemplates>,
}

impl NoteSynthesizer {
    pub fn new(library: Arc<Library>, templates: Arc<NoteTemplates>) -> Self {
        Self { library, templates }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn templates(&self) -> &NoteTemplates {
        &self.templates
    }

    fn entry(&self, citekey: &str) -> Result<&Entry, NoteError> {
        Ok(self.library.lookup(citekey)?)
    }

    pub fn title_for(&self, citekey: &str) -> Result<String, NoteError> {
        let entry = self.entry(citekey)?;
        Ok(self.templates.title.render(&entry.template_context()))
    }

    pub fn path_for(&self, citekey: &str) -> Result<NotePath, NoteError> {
        let title = self.title_for(citekey)?;
        self.path_for_title(&title)
    }

    fn path_for_title(&self, title: &str) -> Result<NotePath, NoteError> {
        let note_title = sanitize_title(title, &self.templates.path_replacement);
        let rendered = self.templates.path.render(&json!({ "noteTitle": note_title }));
        NotePath::parse(&rendered)
    }

    pub fn content_for(&self, citekey: &str) -> Result<String, NoteError> {
        let entry = self.entry(citekey)?;
        Ok(self.templates.content.render(&entry.template_context()))
    }

    /// Title, path and content in one pass over the same entry.
    pub fn synthesize(&self, citekey: &str) -> Result<SynthesizedNote, NoteError> {
        let entry = self.entry(citekey)?;
        let context = entry.template_context();
        let title = self.templates.title.render(&context);
        let path = self.path_for_title(&title)?;
        let content = self.templates.content.render(&context);
        Ok(SynthesizedNote {
            title,
            path,
            content,
        })
    }

    /// Wiki link to the note. When sanitizing changed the file name the link
    /// targets the file and shows the title.
    pub fn link_for(&self, citekey: &str) -> Result<String, NoteError> {
        let note = self.synthesize(citekey)?;
        Ok(wiki_link(&note))
    }
}

pub(crate) fn wiki_link(note: &SynthesizedNote) -> String {
    let stem = note.path.file_stem();
    if stem == note.title {
        format!("[[{}]]", note.title)
    } else {
        format!("[[{}|{}]]", stem, note.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthesizer(export: &[u8], config: Config) -> NoteSynthesizer {
        let library = Library::load(export).unwrap();
        let templates = NoteTemplates::compile(&config).unwrap();
        NoteSynthesizer::new(Arc::new(library), Arc::new(templates))
    }

    const SMITH: &[u8] =
        br#"[{"id": "smith2019", "authors": [{"given": "Jane", "family": "Smith"}], "year": 2019}]"#;

    #[test]
    fn test_smith2019_scenario() {
        let synth = synthesizer(
            SMITH,
            Config {
                literature_note_title_template: "{{authorString}} ({{year}})".to_string(),
                literature_note_path_template: "Literature/{{noteTitle}}.md".to_string(),
                ..Default::default()
            },
        );
        assert_eq!(synth.title_for("smith2019").unwrap(), "Smith, J. (2019)");
        assert_eq!(
            synth.path_for("smith2019").unwrap().as_str(),
            "Literature/Smith, J. (2019).md"
        );
        assert_eq!(synth.link_for("smith2019").unwrap(), "[[Smith, J. (2019)]]");
    }

    #[test]
    fn test_default_templates() {
        let synth = synthesizer(SMITH, Config::default());
        let note = synth.synthesize("smith2019").unwrap();
        assert_eq!(note.title, "@smith2019");
        assert_eq!(note.path.as_str(), "Reading notes/@smith2019.md");
        assert_eq!(
            note.content,
            "---\ntitle: \nauthors: Smith, J.\nyear: 2019\n---\n\n"
        );
    }

    #[test]
    fn test_unknown_citekey() {
        let synth = synthesizer(SMITH, Config::default());
        for result in [
            synth.title_for("nonexistent").map(|_| ()),
            synth.path_for("nonexistent").map(|_| ()),
            synth.content_for("nonexistent").map(|_| ()),
        ] {
            assert!(matches!(result, Err(NoteError::UnknownCitekey(k)) if k == "nonexistent"));
        }
    }

    #[test]
    fn test_title_cannot_add_directories() {
        let synth = synthesizer(
            br#"[{"id": "x", "title": "Input/Output: a survey"}]"#,
            Config {
                literature_note_title_template: "{{title}}".to_string(),
                ..Default::default()
            },
        );
        let note = synth.synthesize("x").unwrap();
        assert_eq!(note.title, "Input/Output: a survey");
        assert_eq!(note.path.as_str(), "Reading notes/Input_Output_ a survey.md");
        assert_eq!(
            synth.link_for("x").unwrap(),
            "[[Input_Output_ a survey|Input/Output: a survey]]"
        );
    }

    #[test]
    fn test_path_template_traversal_rejected() {
        let synth = synthesizer(
            SMITH,
            Config {
                literature_note_path_template: "../{{noteTitle}}.md".to_string(),
                ..Default::default()
            },
        );
        assert!(matches!(
            synth.path_for("smith2019"),
            Err(NoteError::InvalidPath { .. })
        ));
    }

    #[test]
    fn test_bad_template_names_its_kind() {
        let err = NoteTemplates::compile(&Config {
            literature_note_content_template: "{{#each authors}}".to_string(),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(
            err,
            NoteError::Template {
                which: TemplateKind::Content,
                ..
            }
        ));
    }
}
