//! File-backed session store.

use crate::paths::ContextQaPaths;
use crate::storage::AtomicTomlFile;
use contextqa_core::session::{SessionId, SessionRecord, SessionStore};
use contextqa_core::{ClientError, Result};
use std::path::PathBuf;

/// `SessionStore` persisting the active session in `session.toml`.
///
/// The file exists exactly while a session is active; `clear` deletes it.
pub struct FileSessionStore {
    file: AtomicTomlFile<SessionRecord>,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    /// Opens the store at its default location.
    pub fn new_default() -> Result<Self> {
        let path = ContextQaPaths::default()
            .session_file()
            .map_err(|e| ClientError::storage(e.to_string()))?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<SessionId>> {
        let record = self.file.load()?;
        Ok(record.and_then(|r| r.session_id()))
    }

    fn set(&self, session_id: &SessionId) -> Result<()> {
        self.file.save(&SessionRecord::new(session_id))?;
        tracing::debug!("[SessionStore] Stored session {} at {:?}", session_id, self.path());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.file.remove()?;
        tracing::debug!("[SessionStore] Cleared session at {:?}", self.path());
        Ok(())
    }
}
