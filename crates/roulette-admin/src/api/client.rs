//! HTTP client for the Stock Roulette admin API.
//!
//! Wraps `reqwest::Client` with the API base URL and the current bearer
//! token. The token is the single shared credential for the process: it is
//! set by login / check-auth, cleared by logout, and attached to every
//! outgoing request at send time.
//!
//! Response-shape normalization also lives here: collection endpoints may
//! return a bare JSON array or nest it under a named field, and anything
//! else coerces to an empty collection so callers always see a `Vec`.

use std::sync::RwLock;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

/// Request timeout for admin API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when talking to the admin API.
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// HTTP request failed (network, timeout, invalid URL).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status.
    #[error("API error: status {status}: {}", .message.as_deref().unwrap_or("request failed"))]
    Status {
        status: u16,
        /// Human-readable message extracted from the error payload, if any.
        message: Option<String>,
    },

    /// JSON parsing failed.
    #[error("JSON parsing failed: {0}")]
    Json(String),
}

impl ApiClientError {
    /// Returns the message the service itself attached to the failure,
    /// when one was present in the error payload.
    pub fn payload_message(&self) -> Option<&str> {
        match self {
            ApiClientError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Store-visible message for a failed action: the service's own
    /// message when the error payload carried one, else the per-action
    /// fallback.
    pub fn failure_message(&self, fallback: &str) -> String {
        self.payload_message().unwrap_or(fallback).to_string()
    }
}

/// Extract a human-readable message from a service error body.
///
/// The admin API reports errors as `{"message": ...}`; its FastAPI layer
/// uses `{"detail": ...}`. Both are consulted, `message` first.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    for key in ["message", "detail"] {
        if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
            return Some(msg.to_string());
        }
    }
    None
}

/// Normalize a collection response to a `Vec<T>`.
///
/// Accepts a bare array, an object with the array nested under `key`, or
/// anything else (which yields an empty vec). Element deserialization
/// failures are errors: a sequence of unreadable records is a fetch
/// failure, not an empty result.
pub fn extract_collection<T: DeserializeOwned>(
    value: serde_json::Value,
    key: &str,
) -> Result<Vec<T>, ApiClientError> {
    let collection = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove(key) {
            Some(serde_json::Value::Array(items)) => items,
            _ => return Ok(Vec::new()),
        },
        _ => return Ok(Vec::new()),
    };

    collection
        .into_iter()
        .map(|item| {
            serde_json::from_value(item)
                .map_err(|e| ApiClientError::Json(format!("Failed to parse {key} entry: {e}")))
        })
        .collect()
}

/// Client for the Stock Roulette admin API.
///
/// One instance per process, shared by every store. Construction and
/// teardown of the bearer token are tied to login/logout rather than held
/// in process-global state.
pub struct AdminApi {
    /// HTTP client for API requests.
    http: Client,
    /// Base URL for the admin API.
    base_url: String,
    /// Bearer token attached to requests once authenticated.
    token: RwLock<Option<String>>,
}

impl AdminApi {
    /// Create a new client for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// Install the bearer token used for subsequent requests.
    pub fn set_token(&self, token: &str) {
        let mut guard = self.token.write().unwrap();
        *guard = Some(token.to_string());
    }

    /// Remove the bearer token.
    pub fn clear_token(&self) {
        let mut guard = self.token.write().unwrap();
        *guard = None;
    }

    /// True if a bearer token is currently installed.
    pub fn has_token(&self) -> bool {
        self.token.read().unwrap().is_some()
    }

    /// Returns the currently installed token, if any.
    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token.read().unwrap().as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "Admin API error");
        Err(ApiClientError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        })
    }

    /// GET a JSON document.
    pub async fn get_json(&self, path: &str) -> Result<serde_json::Value, ApiClientError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self.authorize(self.http.get(&url)).send().await?;
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiClientError::Json(format!("Failed to parse response: {e}")))
    }

    /// POST an URL-encoded form and return the JSON response.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<serde_json::Value, ApiClientError> {
        let url = self.url(path);
        debug!(url = %url, "POST (form)");
        let response = self.authorize(self.http.post(&url)).form(form).send().await?;
        let response = Self::check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiClientError::Json(format!("Failed to parse response: {e}")))
    }

    /// POST with an empty body, ignoring any response body.
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiClientError> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let response = self.authorize(self.http.post(&url)).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// DELETE, ignoring any response body.
    pub async fn delete(&self, path: &str) -> Result<(), ApiClientError> {
        let url = self.url(path);
        debug!(url = %url, "DELETE");
        let response = self.authorize(self.http.delete(&url)).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// GET a binary payload.
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ApiClientError> {
        let url = self.url(path);
        debug!(url = %url, "GET (bytes)");
        let response = self.authorize(self.http.get(&url)).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = AdminApi::new("http://localhost:8000/");
        assert_eq!(api.url("/api/admin/sessions"), "http://localhost:8000/api/admin/sessions");
    }

    #[test]
    fn test_token_lifecycle() {
        let api = AdminApi::new("http://localhost:8000");
        assert!(!api.has_token());

        api.set_token("secret");
        assert!(api.has_token());
        assert_eq!(api.token(), Some("secret".to_string()));

        api.clear_token();
        assert!(!api.has_token());
        assert_eq!(api.token(), None);
    }

    #[test]
    fn test_error_message_prefers_message_over_detail() {
        assert_eq!(
            error_message(r#"{"message": "bad credentials", "detail": "other"}"#),
            Some("bad credentials".to_string())
        );
        assert_eq!(
            error_message(r#"{"detail": "Invalid credentials"}"#),
            Some("Invalid credentials".to_string())
        );
        assert_eq!(error_message("not json"), None);
        assert_eq!(error_message(r#"{"code": 42}"#), None);
    }

    #[test]
    fn test_payload_message() {
        let err = ApiClientError::Status {
            status: 401,
            message: Some("Invalid credentials".to_string()),
        };
        assert_eq!(err.payload_message(), Some("Invalid credentials"));

        let err = ApiClientError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.payload_message(), None);

        let err = ApiClientError::Json("oops".to_string());
        assert_eq!(err.payload_message(), None);
    }

    #[test]
    fn test_failure_message_prefers_payload() {
        let err = ApiClientError::Status {
            status: 404,
            message: Some("Session not found".to_string()),
        };
        assert_eq!(
            err.failure_message("Failed to delete session"),
            "Session not found"
        );

        let err = ApiClientError::Json("bad".to_string());
        assert_eq!(
            err.failure_message("Failed to delete session"),
            "Failed to delete session"
        );
    }

    #[test]
    fn test_status_error_display() {
        let err = ApiClientError::Status {
            status: 401,
            message: Some("Invalid credentials".to_string()),
        };
        assert_eq!(err.to_string(), "API error: status 401: Invalid credentials");

        let err = ApiClientError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "API error: status 500: request failed");
    }

    #[test]
    fn test_extract_collection_bare_array() {
        let value = json!([1, 2, 3]);
        let items: Vec<u32> = extract_collection(value, "sessions").unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[test]
    fn test_extract_collection_nested() {
        let value = json!({"sessions": [4, 5], "count": 2});
        let items: Vec<u32> = extract_collection(value, "sessions").unwrap();
        assert_eq!(items, vec![4, 5]);
    }

    #[test]
    fn test_extract_collection_malformed_shapes() {
        // Object without the expected key, nested non-array, and scalars
        // all coerce to an empty collection.
        let items: Vec<u32> = extract_collection(json!({"other": [1]}), "sessions").unwrap();
        assert!(items.is_empty());

        let items: Vec<u32> = extract_collection(json!({"sessions": "nope"}), "sessions").unwrap();
        assert!(items.is_empty());

        let items: Vec<u32> = extract_collection(json!(null), "sessions").unwrap();
        assert!(items.is_empty());

        let items: Vec<u32> = extract_collection(json!("text"), "sessions").unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_extract_collection_bad_element_is_error() {
        let value = json!([1, "not a number"]);
        let result: Result<Vec<u32>, _> = extract_collection(value, "sessions");
        assert!(matches!(result, Err(ApiClientError::Json(_))));
    }
}
