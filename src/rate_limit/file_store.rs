//! File-backed key-value storage.
//!
//! Each key is stored as `{key}.json` in the configured directory, so the
//! attempt history survives a restart the way browser storage survives a
//! page reload.

use std::path::PathBuf;

use async_trait::async_trait;

use super::store::KeyValueStore;
use crate::ThrottleError;

/// # Example
///
/// ```rust,ignore
/// use login_throttle::FileStore;
///
/// let store = FileStore::new("/var/lib/myapp/throttle")?;
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, ThrottleError> {
        let dir = directory.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            ThrottleError::StorageUnavailable(format!("Failed to create storage directory: {e}"))
        })?;
        Ok(Self { directory: dir })
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf, ThrottleError> {
        // keys become file names; no separators or dots
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(ThrottleError::InvalidKey(key.to_owned()));
        }
        Ok(self.directory.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ThrottleError> {
        let path = self.entry_path(key)?;

        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            log::warn!(target: "login_throttle", "msg=\"storage read failed\", path=\"{}\", error=\"{e}\"", path.display());
            ThrottleError::StorageUnavailable(format!("Failed to read entry: {e}"))
        })?;

        Ok(Some(content))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), ThrottleError> {
        let path = self.entry_path(key)?;
        let staging = path.with_extension("json.tmp");

        std::fs::write(&staging, value)
            .map_err(|e| ThrottleError::StorageUnavailable(format!("Failed to write entry: {e}")))?;

        // rename so readers never observe a partial write
        std::fs::rename(&staging, &path).map_err(|e| {
            let _ = std::fs::remove_file(&staging);
            ThrottleError::StorageUnavailable(format!("Failed to replace entry: {e}"))
        })?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ThrottleError> {
        let path = self.entry_path(key)?;

        if path.exists() {
            std::fs::remove_file(&path).map_err(|e| {
                ThrottleError::StorageUnavailable(format!("Failed to delete entry: {e}"))
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::env;

    use rand::Rng;
    use rand::distributions::Alphanumeric;

    use super::*;

    fn temp_dir() -> PathBuf {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();
        env::temp_dir().join(format!("login_throttle_store_test_{suffix}"))
    }

    fn cleanup(dir: &PathBuf) {
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let dir = temp_dir();
        let store = FileStore::new(&dir).unwrap();

        assert!(store.get("login_attempts").await.unwrap().is_none());

        store.set("login_attempts", "[]").await.unwrap();
        assert_eq!(
            store.get("login_attempts").await.unwrap().as_deref(),
            Some("[]")
        );
        assert!(dir.join("login_attempts.json").exists());
        assert!(!dir.join("login_attempts.json.tmp").exists());

        cleanup(&dir);
    }

    #[tokio::test]
    async fn test_survives_new_instance() {
        let dir = temp_dir();

        FileStore::new(&dir)
            .unwrap()
            .set("login_attempts", "[1,2]")
            .await
            .unwrap();

        let reopened = FileStore::new(&dir).unwrap();
        assert_eq!(
            reopened.get("login_attempts").await.unwrap().as_deref(),
            Some("[1,2]")
        );

        cleanup(&dir);
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = temp_dir();
        let store = FileStore::new(&dir).unwrap();

        store.set("login_attempts", "[]").await.unwrap();
        store.remove("login_attempts").await.unwrap();
        assert!(store.get("login_attempts").await.unwrap().is_none());

        // missing key
        store.remove("login_attempts").await.unwrap();

        cleanup(&dir);
    }

    #[tokio::test]
    async fn test_path_traversal_prevention() {
        let dir = temp_dir();
        let store = FileStore::new(&dir).unwrap();

        let result = store.get("../etc/passwd").await;
        assert_eq!(
            result.unwrap_err(),
            ThrottleError::InvalidKey("../etc/passwd".to_owned())
        );

        assert!(store.set("a/b", "[]").await.is_err());
        assert!(store.set("", "[]").await.is_err());

        cleanup(&dir);
    }
}
