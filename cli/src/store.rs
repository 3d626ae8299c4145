//! File-backed key/value store for CLI sessions.
//!
//! DESIGN
//! ======
//! The whole map is one small JSON object, rewritten on every change so the
//! three session keys stay consistent on disk. The file is created with
//! owner-only permissions on Unix and removed once the map is empty.
//!
//! ERROR HANDLING
//! ==============
//! `KeyValueStore` writes are infallible by contract; write failures are
//! logged and the in-memory view stays authoritative for this process.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use campus::KeyValueStore;

/// State file location relative to the home directory.
const STATE_PATH: &str = ".campus/session.json";

/// `~/.campus/session.json`, if a home directory is known.
pub fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(STATE_PATH))
}

pub struct FileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl FileStore {
    /// Load `path`. A missing file is an empty store; an unreadable JSON body
    /// is discarded with a warning.
    ///
    /// # Errors
    ///
    /// Returns IO errors other than not-found.
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                tracing::warn!(path = %path.display(), %error, "ignoring malformed state file");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        Ok(Self { path, entries: RefCell::new(entries) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> io::Result<()> {
        let entries = self.entries.borrow();
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            };
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&*entries).map_err(io::Error::other)?;
        fs::write(&self.path, contents)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn persist_or_warn(&self) {
        if let Err(error) = self.persist() {
            tracing::warn!(path = %self.path.display(), %error, "failed to write state file");
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        self.persist_or_warn();
    }

    fn remove(&self, key: &str) {
        let removed = self.entries.borrow_mut().remove(key).is_some();
        if removed {
            self.persist_or_warn();
        }
    }
}
