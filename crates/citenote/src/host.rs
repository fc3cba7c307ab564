/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Command-line stand-ins for the editor and workspace of a note app.

use async_trait::async_trait;
use citenote_processor::{Editor, FileHandle, Position, Workspace};
use std::io;
use std::path::{Path, PathBuf};

/// A markdown file treated as an editor buffer.
///
/// The cursor is the given position, or the end of the file. Insertions edit
/// the buffer; [`save`](Self::save) writes it back.
pub struct FileEditor {
    path: PathBuf,
    text: String,
    cursor: Position,
}

impl FileEditor {
    /// Open `path`; a missing file starts as an empty buffer.
    pub async fn open(path: &Path, cursor: Option<Position>) -> io::Result<Self> {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e),
        };
        let cursor = cursor.unwrap_or_else(|| end_of(&text));
        Ok(Self {
            path: path.to_path_buf(),
            text,
            cursor,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub async fn save(&self) -> io::Result<()> {
        tokio::fs::write(&self.path, &self.text).await
    }
}

fn end_of(text: &str) -> Position {
    let line = text.matches('\n').count();
    let last = text.rsplit('\n').next().unwrap_or("");
    Position::new(line, last.chars().count())
}

/// Byte offset of a line/character position, if it lies within the text.
fn byte_offset(text: &str, at: Position) -> Option<usize> {
    let mut line_start = 0;
    for _ in 0..at.line {
        line_start += text[line_start..].find('\n')? + 1;
    }
    let line_end = text[line_start..]
        .find('\n')
        .map_or(text.len(), |i| line_start + i);
    // A CRLF line ends before its '\r'.
    let line = text[line_start..line_end].trim_end_matches('\r');
    let line_end = line_start + line.len();

    if at.ch == line.chars().count() {
        return Some(line_end);
    }
    line.char_indices().nth(at.ch).map(|(i, _)| line_start + i)
}

impl Editor for FileEditor {
    fn cursor(&self) -> Position {
        self.cursor
    }

    fn insert_text(&mut self, text: &str, at: Position) -> io::Result<()> {
        let offset = byte_offset(&self.text, at).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "position {}:{} is outside {}",
                    at.line,
                    at.ch,
                    self.path.display()
                ),
            )
        })?;
        self.text.insert_str(offset, text);
        log::debug!("inserted {} bytes into {}", text.len(), self.path.display());
        Ok(())
    }
}

/// Opens notes with the platform's default application.
pub struct SystemOpener {
    root: PathBuf,
}

impl SystemOpener {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

#[async_trait]
impl Workspace for SystemOpener {
    async fn open_file(&self, handle: &FileHandle, new_pane: bool) -> io::Result<()> {
        let path = self.root.join(handle.path());
        if new_pane {
            log::debug!("new panes are up to the default application");
        }
        tokio::task::spawn_blocking(move || opener::open(&path))
            .await
            .map_err(io::Error::other)?
            .map_err(io::Error::other)
    }
}
