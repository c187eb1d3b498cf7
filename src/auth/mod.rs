//! Persisted bearer token.
//!
//! The token is stored under a fixed key and looked up every time a request
//! is configured, so a login or logout is picked up by the next call without
//! rebuilding any client. Lookups never block on the filesystem after the
//! first one: [`FileTokenStore`] keeps the value in memory and writes changes
//! through to disk.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::errors::Result;

/// Key the token is persisted under.
pub const TOKEN_KEY: &str = "auth_token";

/// Storage for the bearer token.
pub trait TokenStore: Send + Sync {
    /// Current token, if any. Read failures count as "no token".
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Token kept in a small JSON key/value file.
///
/// The file is read on the first lookup only; this store is assumed to be its
/// sole writer.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    /// `None` until the file has been read.
    cached: Mutex<Option<Option<String>>>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> BTreeMap<String, String> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let mut cached = lock(&self.cached);
        if let Some(token) = cached.as_ref() {
            return token.clone();
        }
        let token = self
            .read_entries()
            .remove(TOKEN_KEY)
            .filter(|token| !token.is_empty());
        *cached = Some(token.clone());
        token
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut cached = lock(&self.cached);
        let mut entries = self.read_entries();
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_entries(&entries)?;
        *cached = Some(Some(token.to_string()));
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut cached = lock(&self.cached);
        let mut entries = self.read_entries();
        if entries.remove(TOKEN_KEY).is_some() {
            self.write_entries(&entries)?;
        }
        *cached = Some(None);
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Token held in memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        lock(&self.token).clone()
    }

    fn save(&self, token: &str) -> Result<()> {
        *lock(&self.token) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *lock(&self.token) = None;
        Ok(())
    }
}

/// Authentication state as seen by the rest of the client.
#[derive(Clone)]
pub struct AuthState {
    tokens: Arc<dyn TokenStore>,
}

impl AuthState {
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        Self { tokens }
    }

    pub fn token(&self) -> Option<String> {
        self.tokens.load()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Persist a token obtained elsewhere.
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.tokens.save(token)
    }

    /// Forget the persisted token.
    pub fn logout(&self) -> Result<()> {
        tracing::info!("Clearing persisted auth token");
        self.tokens.clear()
    }

    pub fn store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(temp_dir.path().join("nested/auth.json"));

        assert!(store.load().is_none());
        store.save("1|secret").unwrap();
        assert_eq!(store.load().as_deref(), Some("1|secret"));

        // A second handle on the same file sees the persisted value
        let other = FileTokenStore::new(store.path());
        assert_eq!(other.load().as_deref(), Some("1|secret"));

        store.clear().unwrap();
        assert!(store.load().is_none());
        assert!(FileTokenStore::new(store.path()).load().is_none());
    }

    #[test]
    fn test_file_store_reads_disk_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("auth.json");
        std::fs::write(&path, r#"{"auth_token":"1|secret"}"#).unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.load().as_deref(), Some("1|secret"));

        // Later lookups are served from memory
        std::fs::remove_file(&path).unwrap();
        assert_eq!(store.load().as_deref(), Some("1|secret"));

        // Writes still reach the file
        store.save("2|fresh").unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("2|fresh"));
        assert_eq!(store.load().as_deref(), Some("2|fresh"));
    }

    #[test]
    fn test_file_store_keeps_unrelated_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("auth.json");
        std::fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let store = FileTokenStore::new(&path);
        store.save("token").unwrap();
        store.clear().unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("theme"));
        assert!(!raw.contains(TOKEN_KEY));
    }

    #[test]
    fn test_corrupt_file_reads_as_no_token() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("auth.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(FileTokenStore::new(path).load().is_none());
    }

    #[test]
    fn test_auth_state_logout() {
        let auth = AuthState::new(Arc::new(MemoryTokenStore::with_token("abc")));
        assert!(auth.is_authenticated());
        auth.logout().unwrap();
        assert!(!auth.is_authenticated());
    }
}
