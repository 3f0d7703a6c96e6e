//! Admin authentication: login, logout, and durable token handling.
//!
//! The API issues a bearer token on login. The token is persisted to a
//! single file so the session survives restarts, and re-applied by
//! `check_auth` before entering a gated view. `check_auth` only checks
//! local presence; it never validates the token against the server.
//!
//! Login failures are non-fatal: the session stays unauthenticated, the
//! error field carries a human-readable message, and the caller may retry.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::client::AdminApi;

/// Fixed success marker the login endpoint returns alongside the token.
const LOGIN_SUCCESS_MESSAGE: &str = "Logged in";

/// Durable storage for the admin bearer token.
///
/// One opaque string at a fixed path; absent file means unauthenticated.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored token, if any. A missing, unreadable, or empty
    /// file all read as "no token".
    pub fn load(&self) -> Option<String> {
        let token = std::fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    /// Persist the token, creating parent directories as needed.
    pub fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)
    }

    /// Remove the stored token. Missing file is not an error.
    pub fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Response from `POST /api/admin/login`.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Extract the token from a well-formed login response.
///
/// Accepts only a non-empty token accompanied by the fixed success
/// marker; anything else means the credentials were not accepted.
fn accepted_token(response: LoginResponse) -> Option<String> {
    let token = response.token.filter(|token| !token.is_empty())?;
    (response.message.as_deref() == Some(LOGIN_SUCCESS_MESSAGE)).then_some(token)
}

/// Tracks whether the current actor is authenticated and owns the token
/// lifecycle: persist on login, re-apply on check, drop on logout.
pub struct AuthSession {
    api: Arc<AdminApi>,
    tokens: TokenStore,
    /// True once a token is installed on the API client.
    pub is_authenticated: bool,
    /// In-flight flag for the login call.
    pub loading: bool,
    /// Last login failure, human-readable.
    pub error: Option<String>,
}

impl AuthSession {
    /// Create an unauthenticated session.
    pub fn new(api: Arc<AdminApi>, tokens: TokenStore) -> Self {
        Self {
            api,
            tokens,
            is_authenticated: false,
            loading: false,
            error: None,
        }
    }

    /// Submit credentials as an URL-encoded form.
    ///
    /// Returns true only when the response carries a non-empty token and
    /// the fixed success marker. Network and service failures set the
    /// error field and leave the session unauthenticated; a well-formed
    /// response without the marker simply returns false.
    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        self.loading = true;
        self.error = None;

        let result = self
            .api
            .post_form("/api/admin/login", &[("login", username), ("password", password)])
            .await;
        self.loading = false;

        let value = match result {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Login request failed");
                self.error = Some(
                    e.payload_message()
                        .unwrap_or("Login failed")
                        .to_string(),
                );
                return false;
            }
        };

        let response: LoginResponse = match serde_json::from_value(value) {
            Ok(response) => response,
            Err(_) => return false,
        };

        let Some(token) = accepted_token(response) else {
            return false;
        };

        if let Err(e) = self.tokens.save(&token) {
            // The session is still usable for this process; it just will
            // not survive a restart.
            warn!(path = ?self.tokens.path(), error = %e, "Failed to persist auth token");
        }
        self.api.set_token(&token);
        self.is_authenticated = true;
        info!("Admin login successful");
        true
    }

    /// Drop the authenticated state, the durable token, and the default
    /// auth header.
    pub fn logout(&mut self) {
        self.is_authenticated = false;
        if let Err(e) = self.tokens.clear() {
            warn!(path = ?self.tokens.path(), error = %e, "Failed to remove auth token");
        }
        self.api.clear_token();
        info!("Admin logged out");
    }

    /// Re-apply a durably stored token, if present.
    ///
    /// Synchronous and idempotent: repeated calls converge on the same
    /// state, and no server round-trip is made.
    pub fn check_auth(&mut self) {
        if let Some(token) = self.tokens.load() {
            self.api.set_token(&token);
            self.is_authenticated = true;
            debug!("Stored auth token re-applied");
        }
    }
}
