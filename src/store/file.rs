//! File-backed store.
//!
//! Each key lives in its own file so one gate's write can never clobber
//! another gate's data.

use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::AuthError;

/// Stores each value in `{directory}/{hex(key)}.kv`.
///
/// Keys are hex-encoded into file names, so any key is safe to use and
/// none can escape the directory.
///
/// # Example
///
/// ```rust,ignore
/// use portcullis::FileStore;
///
/// let store = FileStore::new("/home/me/.local/share/myapp/attempts")?;
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Creates the store, creating the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory).map_err(|e| {
            AuthError::StorageError(format!("Failed to create store directory: {e}"))
        })?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() * 2 + 3);
        for byte in key.bytes() {
            let _ = write!(name, "{byte:02x}");
        }
        name.push_str(".kv");
        self.directory.join(name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AuthError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AuthError::StorageError(format!(
                "Failed to read store file: {e}"
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("tmp");

        // write-then-rename so a crash never leaves half a value behind
        std::fs::write(&tmp, value)
            .map_err(|e| AuthError::StorageError(format!("Failed to write store file: {e}")))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| AuthError::StorageError(format!("Failed to replace store file: {e}")))
    }

    fn remove(&self, key: &str) -> Result<(), AuthError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::StorageError(format!(
                "Failed to delete store file: {e}"
            ))),
        }
    }
}
