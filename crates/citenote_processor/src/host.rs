/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Collaborators supplied by the host application.

use crate::vault::FileHandle;
use async_trait::async_trait;
use std::io;

/// A zero-based cursor position in an editor buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// The active editor a link is inserted into.
pub trait Editor {
    fn cursor(&self) -> Position;

    fn insert_text(&mut self, text: &str, at: Position) -> io::Result<()>;
}

/// Opens files for the user.
#[async_trait]
pub trait Workspace: Send + Sync {
    async fn open_file(&self, handle: &FileHandle, new_pane: bool) -> io::Result<()>;
}
