//! The users.json document
//!
//! [`JsonFile`] owns the path of one JSON document. Loading a missing file
//! yields the default value. Storing renders the whole document in memory
//! first, writes it to a hidden sibling, syncs, and renames it into place, so
//! readers only ever see the previous or the new contents.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// One JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling the document is staged in before the rename
    fn staging_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path.with_file_name(format!(".{}.partial", name))
    }

    fn fail(&self, action: &str, err: impl std::fmt::Display) -> LedgerError {
        LedgerError::Storage(format!("cannot {} {}: {}", action, self.path.display(), err))
    }

    /// Parse the document, or `T::default()` if it does not exist yet
    pub fn load<T: DeserializeOwned + Default>(&self) -> LedgerResult<T> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
            Err(e) => return Err(self.fail("read", e)),
        };
        serde_json::from_slice(&bytes).map_err(|e| self.fail("parse", e))
    }

    /// Replace the document with `value`
    pub fn store<T: Serialize>(&self, value: &T) -> LedgerResult<()> {
        let mut rendered = serde_json::to_vec_pretty(value).map_err(|e| self.fail("encode", e))?;
        rendered.push(b'\n');

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| self.fail("create directory for", e))?;
        }

        let staging = self.staging_path();
        let staged = fs::File::create(&staging).and_then(|mut file| {
            file.write_all(&rendered)?;
            file.sync_all()
        });
        if let Err(e) = staged.and_then(|()| fs::rename(&staging, &self.path)) {
            let _ = fs::remove_file(&staging);
            return Err(self.fail("write", e));
        }
        Ok(())
    }
}
