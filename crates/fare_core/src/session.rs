//! Read side of the persisted user session blob.
//!
//! The auth client writes the last authenticated profile here; the workflow
//! only reads it, for pickup-label personalization.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Profile of the last authenticated user. Field names on the wire follow the
/// auth backend's JSON contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    pub email: String,
    pub phone_number: String,
}

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("failed to read session file '{path}': {message}")]
    Io { path: String, message: String },
    #[error("invalid session file '{path}': {message}")]
    InvalidFormat { path: String, message: String },
}

/// Loader for the session blob.
pub struct SessionStore;

impl SessionStore {
    /// A missing file means no one has logged in yet and is not an error.
    pub fn load(path: &Path) -> Result<Option<UserProfile>, SessionStoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(SessionStoreError::Io {
                    path: path.display().to_string(),
                    message: error.to_string(),
                })
            }
        };
        let profile = serde_json::from_str(&contents).map_err(|error| {
            SessionStoreError::InvalidFormat {
                path: path.display().to_string(),
                message: error.to_string(),
            }
        })?;
        Ok(Some(profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let loaded = SessionStore::load(&dir.path().join("session.json")).expect("load");
        assert!(loaded.is_none());
    }

    #[test]
    fn malformed_blob_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session.json");
        fs::write(&path, "{ definitely-not-json ").expect("fixture");
        let result = SessionStore::load(&path);
        assert!(matches!(result, Err(SessionStoreError::InvalidFormat { .. })));
    }

    #[test]
    fn profile_round_trips_through_wire_names() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session.json");
        fs::write(
            &path,
            r#"{"firstName":"Ayesha","lastName":null,"email":"ayesha@example.com","phoneNumber":"+923001234567"}"#,
        )
        .expect("fixture");

        let profile = SessionStore::load(&path)
            .expect("load")
            .expect("profile present");
        assert_eq!(profile.first_name, "Ayesha");
        assert_eq!(profile.last_name, None);
        assert_eq!(profile.email, "ayesha@example.com");
    }
}
