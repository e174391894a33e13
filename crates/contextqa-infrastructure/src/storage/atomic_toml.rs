//! Atomic TOML file operations.
//!
//! Small persisted records (the active session, the client config) live in
//! single TOML files. Writes go through a temporary file and a rename so a
//! crash never leaves a half-written record behind, and they are serialized
//! across processes with an advisory lock file.

use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during atomic TOML operations.
#[derive(Debug, Error)]
pub enum AtomicTomlError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("TOML serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Lock error on {path}: {message}")]
    Lock { path: PathBuf, message: String },
}

impl AtomicTomlError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<AtomicTomlError> for contextqa_core::ClientError {
    fn from(err: AtomicTomlError) -> Self {
        contextqa_core::ClientError::storage(err.to_string())
    }
}

/// A handle to one TOML file holding a single `T`.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(T))`: Successfully loaded and deserialized
    /// - `Ok(None)`: File doesn't exist or is blank
    /// - `Err`: Failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AtomicTomlError::io(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        toml::from_str(&content)
            .map(Some)
            .map_err(|source| AtomicTomlError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Writes `data` via temporary file + fsync + rename, under the lock.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        let toml_string = toml::to_string_pretty(data)?;

        let _lock = FileLock::acquire(&self.path)?;

        let tmp_path = self.temp_path();
        let mut tmp_file =
            File::create(&tmp_path).map_err(|e| AtomicTomlError::io(&tmp_path, e))?;
        tmp_file
            .write_all(toml_string.as_bytes())
            .and_then(|_| tmp_file.sync_all())
            .map_err(|e| AtomicTomlError::io(&tmp_path, e))?;
        drop(tmp_file);

        restrict_permissions(&tmp_path)?;

        fs::rename(&tmp_path, &self.path).map_err(|e| AtomicTomlError::io(&self.path, e))
    }

    /// Deletes the file under the lock. Succeeds if it was already gone.
    pub fn remove(&self) -> Result<(), AtomicTomlError> {
        let _lock = FileLock::acquire(&self.path)?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AtomicTomlError::io(&self.path, e)),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "record".to_string());
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), AtomicTomlError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| AtomicTomlError::io(path, e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), AtomicTomlError> {
    Ok(())
}

/// Exclusive advisory lock held for the guard's lifetime.
///
/// The `.lock` file is never removed: every process must lock the same
/// inode, so unlinking it would let a later opener lock a fresh file.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| AtomicTomlError::io(parent, e))?;
        }

        let lock_path = path.with_extension("lock");
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| AtomicTomlError::io(&lock_path, e))?;

        fs2::FileExt::lock_exclusive(&file).map_err(|e| AtomicTomlError::Lock {
            path: lock_path.clone(),
            message: e.to_string(),
        })?;

        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Record>::new(temp_dir.path().join("nested/record.toml"));

        let record = Record {
            name: "test".to_string(),
            count: 42,
        };
        file.save(&record).unwrap();

        assert_eq!(file.load().unwrap(), Some(record));
        // No temp file left behind; the lock file stays for later writers
        assert!(!temp_dir.path().join("nested/.record.toml.tmp").exists());
        assert!(temp_dir.path().join("nested/record.lock").exists());
    }

    #[test]
    fn test_missing_and_blank_files_load_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("record.toml");
        let file = AtomicTomlFile::<Record>::new(path.clone());
        assert!(file.load().unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("record.toml");
        fs::write(&path, "name = ").unwrap();

        let file = AtomicTomlFile::<Record>::new(path);
        assert!(matches!(file.load(), Err(AtomicTomlError::Parse { .. })));
    }

    #[test]
    fn test_lock_blocks_second_writer_until_released() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::time::Duration;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("record.toml");
        let held = FileLock::acquire(&path).unwrap();

        let acquired = Arc::new(AtomicBool::new(false));
        let waiter = {
            let path = path.clone();
            let acquired = Arc::clone(&acquired);
            std::thread::spawn(move || {
                let _lock = FileLock::acquire(&path).unwrap();
                acquired.store(true, Ordering::SeqCst);
            })
        };

        std::thread::sleep(Duration::from_millis(100));
        assert!(!acquired.load(Ordering::SeqCst));

        drop(held);
        waiter.join().unwrap();
        assert!(acquired.load(Ordering::SeqCst));

        // Later lockers contend on the same file
        assert!(path.with_extension("lock").exists());
        let _again = FileLock::acquire(&path).unwrap();
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicTomlFile::<Record>::new(temp_dir.path().join("record.toml"));
        file.save(&Record {
            name: "x".to_string(),
            count: 1,
        })
        .unwrap();

        file.remove().unwrap();
        assert!(file.load().unwrap().is_none());
        file.remove().unwrap();
    }
}
