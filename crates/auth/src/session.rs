use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use crate::SessionError;

/// Key-value flag holding the signed-in email between runs.
pub trait SessionStore {
    fn load(&self) -> Result<Option<String>, SessionError>;
    fn store(&self, email: &str) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

/// JSON file `{ "<key>": "<email>" }`, normally
/// `<project_root>/data/<app_id>.session.json`.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
    key: String,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    fn read_entries(&self) -> Result<HashMap<String, String>, SessionError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&data)?)
    }

    fn write_entries(&self, entries: &HashMap<String, String>) -> Result<(), SessionError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.read_entries()?.remove(&self.key))
    }

    fn store(&self, email: &str) -> Result<(), SessionError> {
        let mut entries = self.read_entries()?;
        entries.insert(self.key.clone(), email.to_string());
        self.write_entries(&entries)?;
        debug!(key = %self.key, "session flag stored");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut entries = self.read_entries()?;
        if entries.remove(&self.key).is_some() {
            self.write_entries(&entries)?;
            debug!(key = %self.key, "session flag cleared");
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    email: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Mutex::new(Some(email.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.email.lock().map_err(|_| SessionError::Poisoned)?.clone())
    }

    fn store(&self, email: &str) -> Result<(), SessionError> {
        *self.email.lock().map_err(|_| SessionError::Poisoned)? = Some(email.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.email.lock().map_err(|_| SessionError::Poisoned)? = None;
        Ok(())
    }
}
