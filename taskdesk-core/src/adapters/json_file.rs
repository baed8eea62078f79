//! JSON file record store
//!
//! Each collection lives in one pretty-printed JSON array file. Concurrent
//! access is serialized at two levels:
//!
//! - an in-process `RwLock` per store instance (reads share, writes exclude)
//! - an OS file lock on a sidecar `<file>.lock`, so separate store instances
//!   and separate processes pointed at the same file also serialize
//!
//! Writes go to a temp file in the same directory which is fsynced and then
//! renamed over the target, so readers see either the old or the new
//! collection and never a partial one.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::domain::result::{Error, Result};
use crate::ports::RecordStore;

/// Held OS lock on the sidecar file; released on drop
struct FileLock {
    file: File,
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[derive(Clone, Copy)]
enum LockMode {
    Shared,
    Exclusive,
}

/// File-backed implementation of [`RecordStore`]
pub struct JsonFileStore<T> {
    path: PathBuf,
    lock_path: PathBuf,
    // Guards no data: it orders access to the file, so poisoning is harmless
    gate: RwLock<()>,
    _records: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    /// Create a store for the collection at `path`
    ///
    /// Nothing touches the filesystem until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock_path = sidecar_lock_path(&path);
        Self {
            path,
            lock_path,
            gate: RwLock::new(()),
            _records: PhantomData,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Take the OS lock on the sidecar file
    ///
    /// Writers create the sidecar. Readers never do: a missing sidecar means no
    /// writer has run yet, and renames keep the data file whole regardless, so
    /// the read proceeds without an OS lock (`None`).
    fn lock_file(&self, mode: LockMode) -> io::Result<Option<FileLock>> {
        let file = match mode {
            LockMode::Shared => match File::open(&self.lock_path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => return Err(e),
            },
            LockMode::Exclusive => OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .open(&self.lock_path)?,
        };
        match mode {
            LockMode::Shared => file.lock_shared()?,
            LockMode::Exclusive => file.lock_exclusive()?,
        }
        Ok(Some(FileLock { file }))
    }

    fn lock_for_write(&self) -> Result<Option<FileLock>> {
        self.lock_file(LockMode::Exclusive).map_err(|e| {
            tracing::error!(
                path = %self.lock_path.display(),
                error = %e,
                "cannot lock store for writing"
            );
            Error::persistence(&self.path, e)
        })
    }
}

impl<T> JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    fn read_unlocked(&self) -> Result<Vec<T>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::Io(e)),
        };

        serde_json::from_slice(&bytes).map_err(|source| {
            tracing::error!(
                path = %self.path.display(),
                error = %source,
                "store file is malformed"
            );
            Error::CorruptStore {
                path: self.path.clone(),
                source,
            }
        })
    }

    fn write_unlocked(&self, records: &[T]) -> Result<()> {
        let content = serde_json::to_string_pretty(records)?;
        let dir = self.parent_dir();

        let mut tmp =
            NamedTempFile::new_in(dir).map_err(|e| Error::persistence(&self.path, e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| Error::persistence(&self.path, e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| Error::persistence(&self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| Error::persistence(&self.path, e.error))?;

        tracing::debug!(path = %self.path.display(), count = records.len(), "replaced collection");
        Ok(())
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        fs::create_dir_all(self.parent_dir()).map_err(|e| {
            tracing::error!(
                path = %self.path.display(),
                error = %e,
                "cannot create store directory"
            );
            Error::persistence(&self.path, e)
        })
    }
}

impl<T> RecordStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Vec<T>> {
        let _guard = self.gate.read().unwrap_or_else(PoisonError::into_inner);

        let _lock = self.lock_file(LockMode::Shared)?;
        let records = self.read_unlocked()?;
        tracing::debug!(path = %self.path.display(), count = records.len(), "loaded collection");
        Ok(records)
    }

    fn replace(&self, records: &[T]) -> Result<()> {
        let _guard = self.gate.write().unwrap_or_else(PoisonError::into_inner);
        self.ensure_parent_dir()?;
        let _lock = self.lock_for_write()?;
        self.write_unlocked(records)
    }

    fn update<R, F>(&self, mutate: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R>,
    {
        let _guard = self.gate.write().unwrap_or_else(PoisonError::into_inner);
        self.ensure_parent_dir()?;
        let _lock = self.lock_for_write()?;

        let mut records = self.read_unlocked()?;
        let outcome = mutate(&mut records)?;
        self.write_unlocked(&records)?;
        Ok(outcome)
    }
}

fn sidecar_lock_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("store"));
    name.push(".lock");
    path.with_file_name(name)
}
