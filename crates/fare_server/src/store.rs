//! JSON document store for registered users.
//!
//! The whole store is one versioned document, read at startup and rewritten
//! atomically (temp file, then rename) on every mutation so a crash never
//! leaves a half-written file behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fare_core::session::UserProfile;

use crate::password::PasswordRecord;

pub const STORE_FILE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("store io error: {0}")]
    Io(String),
    #[error("invalid store file: {0}")]
    InvalidFormat(String),
    #[error("email already exists")]
    DuplicateEmail,
}

/// One registered user: public profile plus hashed credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub profile: UserProfile,
    pub credentials: PasswordRecord,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserStore {
    pub version: u32,
    pub users: Vec<StoredUser>,
}

impl UserStore {
    pub fn empty() -> Self {
        Self {
            version: STORE_FILE_VERSION,
            users: Vec::new(),
        }
    }

    /// A missing file is an empty store; a malformed or wrong-version file is
    /// an error rather than silent data loss.
    pub fn load(path: &Path) -> Result<Self, UserStoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::empty())
            }
            Err(error) => {
                return Err(UserStoreError::Io(format!(
                    "failed to read store file '{}': {error}",
                    path.display()
                )))
            }
        };

        let store: UserStore = serde_json::from_str(&contents).map_err(|error| {
            UserStoreError::InvalidFormat(format!(
                "invalid store file '{}': {error}",
                path.display()
            ))
        })?;

        if store.version != STORE_FILE_VERSION {
            return Err(UserStoreError::InvalidFormat(format!(
                "unsupported store file version {} in '{}'",
                store.version,
                path.display()
            )));
        }

        Ok(store)
    }

    /// Email lookup is case-insensitive; the stored casing is preserved.
    pub fn find_by_email(&self, email: &str) -> Option<&StoredUser> {
        self.users
            .iter()
            .find(|user| user.profile.email.eq_ignore_ascii_case(email))
    }

    pub fn insert(&mut self, user: StoredUser) -> Result<(), UserStoreError> {
        if self.find_by_email(&user.profile.email).is_some() {
            return Err(UserStoreError::DuplicateEmail);
        }
        self.users.push(user);
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), UserStoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| {
                UserStoreError::Io(format!(
                    "failed to create store directory '{}': {error}",
                    parent.display()
                ))
            })?;
        }

        let serialized = serde_json::to_string_pretty(self)
            .map_err(|error| UserStoreError::Io(format!("failed to serialize store: {error}")))?;

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_nanos())
            .unwrap_or(0);
        let temp_path = path.with_extension(format!("json.tmp.{nanos}"));
        let mut temp_file = File::create(&temp_path).map_err(|error| {
            UserStoreError::Io(format!(
                "failed to create temp store file '{}': {error}",
                temp_path.display()
            ))
        })?;
        temp_file.write_all(serialized.as_bytes()).map_err(|error| {
            UserStoreError::Io(format!(
                "failed to write temp store file '{}': {error}",
                temp_path.display()
            ))
        })?;
        temp_file.sync_all().map_err(|error| {
            UserStoreError::Io(format!(
                "failed to flush temp store file '{}': {error}",
                temp_path.display()
            ))
        })?;

        fs::rename(&temp_path, path).map_err(|error| {
            let _ = fs::remove_file(&temp_path);
            UserStoreError::Io(format!(
                "failed to move temp store file '{}' to '{}': {error}",
                temp_path.display(),
                path.display()
            ))
        })
    }
}
