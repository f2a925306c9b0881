// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential store: the session token and user profile in secure storage.
//!
//! Every save, clear and load also updates the API client's shared
//! `Authorization` header. A missing token means "not logged in" and is
//! never an error.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{AppError, Result};
use crate::models::{Session, User};
use crate::services::api::AuthHeader;
use crate::services::seal::{DeviceKey, DEVICE_KEY_LEN};

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "userToken";
/// Storage key for the serialized user.
pub const USER_KEY: &str = "userInfo";

/// Key/value secure storage backend.
pub trait SecureStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Deleting a key that does not exist succeeds.
    fn delete(&self, key: &str) -> Result<()>;
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl SecureStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.remove(key);
        Ok(())
    }
}

/// File-backed storage. Each value is sealed with a device key that is
/// created on first use; files are owner-only on unix.
///
/// Layout:
/// - `<dir>/device.key` raw key bytes
/// - `<dir>/<key>.sealed` sealed value
pub struct FileStorage {
    dir: PathBuf,
    key: DeviceKey,
}

impl FileStorage {
    const KEY_FILE: &'static str = "device.key";

    /// Open the store in `dir`, creating the directory and device key if
    /// they do not exist yet.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        create_private_dir(&dir)?;

        let key_path = dir.join(Self::KEY_FILE);
        let key = match read_device_key(&key_path)? {
            Some(key) => key,
            None => create_device_key(&key_path)?,
        };

        Ok(Self { dir, key })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.sealed", key))
    }
}

impl SecureStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key);
        match fs::read_to_string(&path) {
            Ok(sealed) => self.key.open(&sealed, key).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let sealed = self.key.seal(value, key)?;
        let path = self.value_path(key);
        let tmp = path.with_extension("sealed.tmp");
        write_private_file(&tmp, sealed.as_bytes())?;
        fs::rename(&tmp, &path).map_err(|e| io_error(&path, e))
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.value_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

/// Read the device key, `None` if it has not been created yet.
fn read_device_key(path: &Path) -> Result<Option<DeviceKey>> {
    match fs::read(path) {
        Ok(bytes) if bytes.len() == DEVICE_KEY_LEN => Ok(Some(DeviceKey::from_bytes(&bytes)?)),
        Ok(_) => Err(AppError::Storage(format!(
            "Device key at {} is corrupt",
            path.display()
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error(path, e)),
    }
}

/// Generate and persist a device key. The key is written in full to a
/// private temp file and then linked into place, which fails if another
/// process got there first; in that case its key is used instead.
fn create_device_key(path: &Path) -> Result<DeviceKey> {
    let (key, bytes) = DeviceKey::generate()?;

    static ATTEMPT: AtomicU64 = AtomicU64::new(0);
    let attempt = ATTEMPT.fetch_add(1, Ordering::Relaxed);
    let tmp = path.with_extension(format!("key.{}.{}.tmp", std::process::id(), attempt));
    write_private_file(&tmp, &bytes)?;
    let linked = fs::hard_link(&tmp, path);
    if let Err(e) = fs::remove_file(&tmp) {
        tracing::warn!(path = %tmp.display(), error = %e, "Failed to remove temp key file");
    }

    match linked {
        Ok(()) => {
            tracing::info!(path = %path.display(), "Created device key");
            Ok(key)
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            tracing::debug!(path = %path.display(), "Device key created concurrently");
            read_device_key(path)?.ok_or_else(|| {
                AppError::Storage(format!("Device key at {} disappeared", path.display()))
            })
        }
        Err(e) => Err(io_error(path, e)),
    }
}

fn io_error(path: &Path, err: std::io::Error) -> AppError {
    AppError::Storage(format!("{}: {}", path.display(), err))
}

fn create_private_dir(dir: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir).map_err(|e| io_error(dir, e))
}

fn write_private_file(path: &Path, contents: &[u8]) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path).map_err(|e| io_error(path, e))?;
    file.write_all(contents).map_err(|e| io_error(path, e))?;
    file.sync_all().map_err(|e| io_error(path, e))
}

/// What `load` found in storage.
#[derive(Debug, Clone, Default)]
pub struct StoredCredentials {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl StoredCredentials {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Both token and user, if present.
    pub fn session(self) -> Option<Session> {
        Some(Session {
            token: self.token?,
            user: self.user?,
        })
    }
}

/// Persists the session and keeps the shared auth header in sync with it.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn SecureStorage>,
    auth: AuthHeader,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn SecureStorage>, auth: AuthHeader) -> Self {
        Self { storage, auth }
    }

    /// Persist `token` and `user`, then install the bearer header.
    pub fn save(&self, token: &str, user: &User) -> Result<()> {
        let user_json = serde_json::to_string(user)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize user: {}", e)))?;

        self.storage.set(TOKEN_KEY, token)?;
        self.storage.set(USER_KEY, &user_json)?;
        self.auth.set_bearer(token);

        tracing::debug!("Credentials saved");
        Ok(())
    }

    /// Delete the stored session and drop the bearer header. The header is
    /// removed even if storage fails; the first storage error is returned.
    pub fn clear(&self) -> Result<()> {
        let token_result = self.storage.delete(TOKEN_KEY);
        let user_result = self.storage.delete(USER_KEY);
        self.auth.clear();

        token_result.and(user_result)?;
        tracing::debug!("Credentials cleared");
        Ok(())
    }

    /// Read the stored session, installing the bearer header when a token
    /// exists. Storage failures are logged and read as "absent".
    pub fn load(&self) -> StoredCredentials {
        let token = match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored token");
                None
            }
        };

        let user = match self.storage.get(USER_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<User>(&json) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "Stored user is not valid JSON");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored user");
                None
            }
        };

        if let Some(token) = &token {
            self.auth.set_bearer(token);
        }

        StoredCredentials { token, user }
    }
}
