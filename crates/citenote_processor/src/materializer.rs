/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Idempotent note file creation.

use crate::vault::{FileHandle, Vault};
use dashmap::DashMap;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Creates vault files at most once.
///
/// Calls for the same path are serialized on a per-path async mutex, so the
/// existence check and the creation cannot interleave with another task's.
/// Existing files are returned untouched.
pub struct FileMaterializer<V> {
    vault: Arc<V>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl<V: Vault> FileMaterializer<V> {
    pub fn new(vault: Arc<V>) -> Self {
        Self {
            vault,
            locks: DashMap::new(),
        }
    }

    pub fn vault(&self) -> &Arc<V> {
        &self.vault
    }

    /// Return the file at `path`, creating it empty if missing.
    pub async fn get_or_create(&self, path: &Path) -> io::Result<FileHandle> {
        self.get_or_create_with(path, "").await
    }

    /// Return the file at `path`, creating it with `content` if missing.
    pub async fn get_or_create_with(&self, path: &Path, content: &str) -> io::Result<FileHandle> {
        let entry = PathLock::acquire(&self.locks, path);
        let _guard = entry.mutex().lock().await;
        self.create_if_missing(path, content).await
    }

    async fn create_if_missing(&self, path: &Path, content: &str) -> io::Result<FileHandle> {
        if self.vault.file_exists(path).await? {
            return Ok(FileHandle::new(path));
        }
        match self.vault.create_file(path, content).await {
            Ok(handle) => Ok(handle),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                // Something other than a file, such as a directory, is in the way.
                if !self.vault.file_exists(path).await? {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("{} exists but is not a file", path.display()),
                    ));
                }
                log::debug!("{} appeared while creating it", path.display());
                Ok(FileHandle::new(path))
            }
            Err(e) => Err(e),
        }
    }

    /// Paths with a lock currently held or awaited.
    pub fn pending(&self) -> usize {
        self.locks.len()
    }
}

/// A checked-out entry of the lock map. Dropping it, including when the
/// owning future is cancelled, removes the entry once nobody else holds it.
struct PathLock<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    key: String,
    mutex: Arc<Mutex<()>>,
}

impl<'a> PathLock<'a> {
    fn acquire(locks: &'a DashMap<String, Arc<Mutex<()>>>, path: &Path) -> Self {
        let key = path.to_string_lossy().into_owned();
        let mutex = locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        Self { locks, key, mutex }
    }

    fn mutex(&self) -> &Mutex<()> {
        &self.mutex
    }
}

impl Drop for PathLock<'_> {
    fn drop(&mut self) {
        // The map's reference and ours are the only ones left.
        self.locks.remove_if(&self.key, |_, l| {
            Arc::ptr_eq(l, &self.mutex) && Arc::strong_count(l) == 2
        });
    }
}
