//! Citizen and staff sessions.
//!
//! A session is a bearer token plus the user record the backend returned at
//! login. Citizen and staff sessions live under separate keys so that both
//! may be signed in on the same store without colliding:
//!
//! | kind    | token key    | user key    |
//! |---------|--------------|-------------|
//! | citizen | `token`      | `user`      |
//! | staff   | `adminToken` | `adminUser` |

use crate::error::{LaporError, LaporResult};
use crate::models::{CitizenUser, StaffAccount};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Citizen,
    Staff,
}

impl SessionKind {
    pub const fn token_key(self) -> &'static str {
        match self {
            SessionKind::Citizen => "token",
            SessionKind::Staff => "adminToken",
        }
    }

    pub const fn user_key(self) -> &'static str {
        match self {
            SessionKind::Citizen => "user",
            SessionKind::Staff => "adminUser",
        }
    }
}

/// User records that can own a session.
pub trait SessionUser: Serialize + DeserializeOwned {
    const KIND: SessionKind;
}

impl SessionUser for CitizenUser {
    const KIND: SessionKind = SessionKind::Citizen;
}

impl SessionUser for StaffAccount {
    const KIND: SessionKind = SessionKind::Staff;
}

/// Key-value persistence in the manner of browser local storage.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> LaporResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> LaporResult<()>;
    fn remove(&self, key: &str) -> LaporResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session<U> {
    pub token: String,
    pub user: U,
}

pub type CitizenSession = Session<CitizenUser>;
pub type StaffSession = Session<StaffAccount>;

impl<U: SessionUser> Session<U> {
    pub fn new(token: impl Into<String>, user: U) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    /// Load the stored session, if both halves are present and readable.
    ///
    /// A user record that no longer parses is treated as signed out.
    pub fn hydrate(store: &dyn SessionStore) -> LaporResult<Option<Self>> {
        let kind = U::KIND;
        let token = store.get(kind.token_key())?;
        let user = store.get(kind.user_key())?;

        let (token, user) = match (token, user) {
            (Some(token), Some(user)) if !token.is_empty() => (token, user),
            _ => return Ok(None),
        };

        match serde_json::from_str::<U>(&user) {
            Ok(user) => Ok(Some(Self { token, user })),
            Err(e) => {
                log::warn!("Stored {:?} user record is unreadable: {}", kind, e);
                Ok(None)
            }
        }
    }

    /// Write-on-login.
    pub fn persist(&self, store: &dyn SessionStore) -> LaporResult<()> {
        let kind = U::KIND;
        let user =
            serde_json::to_string(&self.user).map_err(|e| LaporError::Session(e.to_string()))?;
        store.set(kind.token_key(), &self.token)?;
        store.set(kind.user_key(), &user)?;
        Ok(())
    }

    /// Clear-on-logout.
    pub fn clear(store: &dyn SessionStore) -> LaporResult<()> {
        let kind = U::KIND;
        store.remove(kind.token_key())?;
        store.remove(kind.user_key())
    }
}

/// In-process store, lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> LaporError {
    LaporError::Session("session store lock poisoned".to_string())
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> LaporResult<Option<String>> {
        Ok(self.entries.read().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> LaporResult<()> {
        self.entries
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> LaporResult<()> {
        self.entries.write().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object on disk.
///
/// The whole file is rewritten on every mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> LaporResult<Self> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => HashMap::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                LaporError::Session(format!("{} is not a session file: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(LaporError::Session(e.to_string())),
        };

        log::debug!("Session store opened at {:?}", path);
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Open the store named by `session.store_path`.
    pub fn from_config() -> LaporResult<Self> {
        Self::open(crate::app_config::session().store_path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &HashMap<String, String>) -> LaporResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| LaporError::Session(e.to_string()))?;
            }
        }
        let contents =
            serde_json::to_string_pretty(entries).map_err(|e| LaporError::Session(e.to_string()))?;
        std::fs::write(&self.path, contents).map_err(|e| LaporError::Session(e.to_string()))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> LaporResult<Option<String>> {
        Ok(self.entries.read().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> LaporResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> LaporResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

/// Shared handle passed to call sites instead of reading storage ad hoc.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    pub fn citizen(&self) -> LaporResult<Option<CitizenSession>> {
        CitizenSession::hydrate(self.store())
    }

    pub fn staff(&self) -> LaporResult<Option<StaffSession>> {
        StaffSession::hydrate(self.store())
    }

    pub fn sign_in<U: SessionUser>(&self, session: &Session<U>) -> LaporResult<()> {
        session.persist(self.store())?;
        log::info!("Signed in {:?} session", U::KIND);
        Ok(())
    }

    pub fn sign_out(&self, kind: SessionKind) -> LaporResult<()> {
        match kind {
            SessionKind::Citizen => CitizenSession::clear(self.store())?,
            SessionKind::Staff => StaffSession::clear(self.store())?,
        }
        log::info!("Signed out {:?} session", kind);
        Ok(())
    }

    /// Staff session or a `Session` error when signed out.
    pub fn require_staff(&self) -> LaporResult<StaffSession> {
        self.staff()?
            .ok_or_else(|| LaporError::Session("staff login required".to_string()))
    }

    /// Citizen session or a `Session` error when signed out.
    pub fn require_citizen(&self) -> LaporResult<CitizenSession> {
        self.citizen()?
            .ok_or_else(|| LaporError::Session("citizen login required".to_string()))
    }
}
