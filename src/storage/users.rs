//! User repositories
//!
//! The service layer sees storage only through [`UserRepository`]. Both
//! implementations guard the whole store with one reader/writer lock: lookups
//! take the read lock, saves take the write lock. Users are handed out as
//! owned copies; changes become visible only once saved.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use super::file_io::JsonFile;
use crate::error::{LedgerError, LedgerResult};
use crate::models::User;

/// Keyed storage for user ledgers
pub trait UserRepository: Send + Sync {
    /// Fetch a user, failing with `NotFound` if absent
    fn get_by_id(&self, id: &str) -> LedgerResult<User>;

    /// Insert or replace a user
    fn save(&self, user: &User) -> LedgerResult<()>;

    /// IDs of all stored users, sorted
    fn list_ids(&self) -> LedgerResult<Vec<String>>;

    fn exists(&self, id: &str) -> LedgerResult<bool> {
        match self.get_by_id(id) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

type UserMap = BTreeMap<String, User>;

fn read_lock(lock: &RwLock<UserMap>) -> LedgerResult<RwLockReadGuard<'_, UserMap>> {
    lock.read()
        .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
}

fn write_lock(lock: &RwLock<UserMap>) -> LedgerResult<RwLockWriteGuard<'_, UserMap>> {
    lock.write()
        .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
}

/// Process-local store; contents are lost when it is dropped
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<UserMap>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn get_by_id(&self, id: &str) -> LedgerResult<User> {
        read_lock(&self.users)?
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::user_not_found(id))
    }

    fn save(&self, user: &User) -> LedgerResult<()> {
        write_lock(&self.users)?.insert(user.id.clone(), user.clone());
        Ok(())
    }

    fn list_ids(&self) -> LedgerResult<Vec<String>> {
        Ok(read_lock(&self.users)?.keys().cloned().collect())
    }
}

/// Store backed by a single users.json file
pub struct JsonUserRepository {
    file: JsonFile,
    users: RwLock<UserMap>,
}

impl JsonUserRepository {
    /// Create a repository for `path`; call [`load`](Self::load) before use
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: JsonFile::new(path),
            users: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create and load in one step
    pub fn open(path: PathBuf) -> LedgerResult<Self> {
        let repo = Self::new(path);
        repo.load()?;
        Ok(repo)
    }

    /// Replace in-memory contents with what is on disk
    pub fn load(&self) -> LedgerResult<()> {
        let from_disk: UserMap = self.file.load()?;
        let mut users = write_lock(&self.users)?;
        *users = from_disk;
        debug!(path = %self.file.path().display(), count = users.len(), "users loaded");
        Ok(())
    }
}

impl UserRepository for JsonUserRepository {
    fn get_by_id(&self, id: &str) -> LedgerResult<User> {
        read_lock(&self.users)?
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::user_not_found(id))
    }

    fn save(&self, user: &User) -> LedgerResult<()> {
        let mut users = write_lock(&self.users)?;
        let previous = users.insert(user.id.clone(), user.clone());

        // Keep memory and disk in step if the write fails
        if let Err(e) = self.file.store(&*users) {
            match previous {
                Some(old) => users.insert(user.id.clone(), old),
                None => users.remove(&user.id),
            };
            return Err(e);
        }

        debug!(user = %user.id, path = %self.file.path().display(), "user saved");
        Ok(())
    }

    fn list_ids(&self) -> LedgerResult<Vec<String>> {
        Ok(read_lock(&self.users)?.keys().cloned().collect())
    }
}
