/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! The storage collaborator.
//!
//! Notes live in a vault addressed by relative paths. [`FsVault`] maps the
//! vault onto a directory; hosts with their own storage implement [`Vault`].

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// An existing file in the vault, by vault-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle {
    path: PathBuf,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
pub trait Vault: Send + Sync {
    /// Read a file's bytes. Absolute paths may point outside the vault.
    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    async fn file_exists(&self, path: &Path) -> io::Result<bool>;

    /// Create a new file. Fails with [`io::ErrorKind::AlreadyExists`] rather
    /// than replacing an existing file.
    async fn create_file(&self, path: &Path, content: &str) -> io::Result<FileHandle>;
}

/// A vault rooted at a directory on the local file system.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location on disk of a vault path.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

#[async_trait]
impl Vault for FsVault {
    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(self.resolve(path)).await
    }

    async fn file_exists(&self, path: &Path) -> io::Result<bool> {
        match fs::metadata(self.resolve(path)).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_file(&self, path: &Path, content: &str) -> io::Result<FileHandle> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;

        log::debug!("created {}", target.display());
        Ok(FileHandle::new(path))
    }
}
