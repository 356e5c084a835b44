//! Request handlers for the auth endpoints.
//!
//! Wire contract: camelCase JSON bodies, `{success, user}` on success and
//! `{success: false, error}` on failure. Unknown email and wrong password
//! return the same message so login failures leak nothing.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use fare_core::session::UserProfile;

use crate::password::{hash_password, verify_password};
use crate::state::AppState;
use crate::store::{StoredUser, UserStoreError};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthResponse {
    fn ok(user: UserProfile) -> Self {
        Self {
            success: true,
            user: Some(user),
            error: None,
        }
    }

    fn failure(message: &str) -> Self {
        Self {
            success: false,
            user: None,
            error: Some(message.to_string()),
        }
    }
}

/// Treat absent and blank fields the same way.
fn required(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> (StatusCode, Json<AuthResponse>) {
    let (Some(first_name), Some(email), Some(password), Some(phone_number)) = (
        required(request.first_name),
        required(request.email),
        required(request.password),
        required(request.phone_number),
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(AuthResponse::failure("Missing required fields")),
        );
    };

    let profile = UserProfile {
        first_name,
        last_name: required(request.last_name),
        email,
        phone_number,
    };
    let user = StoredUser {
        profile: profile.clone(),
        credentials: hash_password(&password),
    };

    let mut store = state.store.write().await;
    match store.insert(user) {
        Ok(()) => {}
        Err(UserStoreError::DuplicateEmail) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(AuthResponse::failure("Email already exists")),
            );
        }
        Err(error) => {
            warn!(%error, "user insert failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AuthResponse::failure("Server error")),
            );
        }
    }
    if let Err(error) = store.save(&state.store_path) {
        warn!(%error, "failed to persist user store");
        // Undo the in-memory insert so a retry starts clean.
        store.users.pop();
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(AuthResponse::failure("Server error")),
        );
    }

    info!(email = %profile.email, "user registered");
    (StatusCode::CREATED, Json(AuthResponse::ok(profile)))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> (StatusCode, Json<AuthResponse>) {
    let (Some(email), Some(password)) = (required(request.email), required(request.password))
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(AuthResponse::failure("Missing required fields")),
        );
    };

    let store = state.store.read().await;
    let Some(user) = store.find_by_email(&email) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(AuthResponse::failure("Invalid credentials")),
        );
    };
    if !verify_password(&user.credentials, &password) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(AuthResponse::failure("Invalid credentials")),
        );
    }

    info!(email = %user.profile.email, "user logged in");
    (StatusCode::OK, Json(AuthResponse::ok(user.profile.clone())))
}

/// Liveness probe.
pub async fn health() -> &'static str {
    "Backend is working"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::UserStore;
    use std::path::Path;

    fn app_state(dir: &Path) -> Arc<AppState> {
        let path = dir.join("users.json");
        Arc::new(AppState::new(path, UserStore::empty()))
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            first_name: Some("Ayesha".to_string()),
            last_name: None,
            email: Some(email.to_string()),
            password: Some("hunter2".to_string()),
            phone_number: Some("+923001234567".to_string()),
        }
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let state = app_state(dir.path());

        let (status, Json(response)) = register(
            State(state.clone()),
            Json(register_request("ayesha@example.com")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(response.success);
        let user = response.user.expect("registered user");
        assert_eq!(user.email, "ayesha@example.com");

        let (status, Json(response)) = login(
            State(state),
            Json(LoginRequest {
                email: Some("ayesha@example.com".to_string()),
                password: Some("hunter2".to_string()),
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(response.success);
        assert_eq!(
            response.user.expect("logged-in user").first_name,
            "Ayesha"
        );
    }

    #[tokio::test]
    async fn missing_fields_are_rejected_before_storage() {
        let dir = tempfile::tempdir().expect("temp dir");
        let state = app_state(dir.path());

        let mut request = register_request("ayesha@example.com");
        request.phone_number = Some("   ".to_string());
        let (status, Json(response)) = register(State(state.clone()), Json(request)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.as_deref(), Some("Missing required fields"));
        assert!(state.store.read().await.users.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let state = app_state(dir.path());

        let (status, _) = register(
            State(state.clone()),
            Json(register_request("ayesha@example.com")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, Json(response)) = register(
            State(state),
            Json(register_request("ayesha@example.com")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.as_deref(), Some("Email already exists"));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_identical() {
        let dir = tempfile::tempdir().expect("temp dir");
        let state = app_state(dir.path());
        register(
            State(state.clone()),
            Json(register_request("ayesha@example.com")),
        )
        .await;

        let (status, Json(wrong_password)) = login(
            State(state.clone()),
            Json(LoginRequest {
                email: Some("ayesha@example.com".to_string()),
                password: Some("not-the-password".to_string()),
            }),
        )
        .await;
        let (unknown_status, Json(unknown_email)) = login(
            State(state),
            Json(LoginRequest {
                email: Some("nobody@example.com".to_string()),
                password: Some("hunter2".to_string()),
            }),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.error, unknown_email.error);
    }

    #[tokio::test]
    async fn register_persists_store_to_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let state = app_state(dir.path());
        register(
            State(state.clone()),
            Json(register_request("ayesha@example.com")),
        )
        .await;

        let reloaded = UserStore::load(&state.store_path).expect("reload");
        assert_eq!(reloaded.users.len(), 1);
        let raw = std::fs::read_to_string(&state.store_path).expect("raw file");
        assert!(!raw.contains("hunter2"), "plaintext password persisted");
    }
}
