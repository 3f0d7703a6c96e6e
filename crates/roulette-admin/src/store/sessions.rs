//! Session collection store: fetch, filter, and lifecycle actions.
//!
//! The store holds the last fetched collection plus one shared loading
//! flag and error field. Actions are awaited to completion by the caller,
//! so each action's flag updates finish before the next begins; issuing
//! overlapping actions races on the shared flags (last to finish wins)
//! and is the caller's responsibility to avoid.
//!
//! Mutation policies differ by action: delete removes the entry locally
//! on success (the server state is fully known), while reset and archive
//! re-fetch the whole collection because they change derived fields the
//! client cannot compute itself.

use std::sync::Arc;

use tracing::{debug, warn};

use roulette_common::{Session, SessionFilterUpdate, SessionFilters};

use crate::api::{AdminApi, extract_collection};

/// Nested field name the sessions endpoint may wrap the collection in.
const SESSIONS_KEY: &str = "sessions";

/// Store for the admin session collection.
pub struct SessionStore {
    api: Arc<AdminApi>,
    /// Last fetched collection; always a sequence, possibly empty.
    pub sessions: Vec<Session>,
    /// Client-side filter state.
    pub filters: SessionFilters,
    /// In-flight flag shared by every action on this store.
    pub loading: bool,
    /// Last failure, human-readable.
    pub error: Option<String>,
}

impl SessionStore {
    /// Create an empty store backed by the given API client.
    pub fn new(api: Arc<AdminApi>) -> Self {
        Self {
            api,
            sessions: Vec::new(),
            filters: SessionFilters::default(),
            loading: false,
            error: None,
        }
    }

    /// Fetch the session collection from the server.
    ///
    /// The response may be a bare array or nested under `sessions`; any
    /// other shape yields an empty collection. On failure the local
    /// collection is forced empty rather than left stale.
    pub async fn fetch_sessions(&mut self) {
        self.loading = true;
        self.error = None;

        let result = self.api.get_json("/api/admin/sessions").await;
        match result.and_then(|value| extract_collection(value, SESSIONS_KEY)) {
            Ok(sessions) => {
                debug!(count = sessions.len(), "Fetched sessions");
                self.sessions = sessions;
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch sessions");
                self.error = Some(e.failure_message("Failed to fetch sessions"));
                self.sessions = Vec::new();
            }
        }
        self.loading = false;
    }

    /// Sessions satisfying every active filter predicate, in fetch order.
    ///
    /// Pure derived view over current state; never cached.
    pub fn filtered_sessions(&self) -> Vec<&Session> {
        self.sessions
            .iter()
            .filter(|session| self.filters.matches(session))
            .collect()
    }

    /// Delete a session by identifier.
    ///
    /// On success the matching entry is removed locally without a
    /// re-fetch; on failure the collection is left untouched and the
    /// error field records the message.
    pub async fn delete_session(&mut self, session_id: &str) {
        self.loading = true;
        self.error = None;

        let path = format!("/api/admin/sessions/{session_id}");
        match self.api.delete(&path).await {
            Ok(()) => {
                debug!(session_id = %session_id, "Session deleted");
                self.remove_local(session_id);
            }
            Err(e) => {
                warn!(error = %e, session_id = %session_id, "Failed to delete session");
                self.error = Some(e.failure_message("Failed to delete session"));
            }
        }
        self.loading = false;
    }

    /// Reset a session, then re-fetch the collection to pick up the
    /// server-side result.
    pub async fn reset_session(&mut self, session_id: &str) {
        self.lifecycle_action(session_id, "reset", "Failed to reset session")
            .await;
    }

    /// Archive a session, then re-fetch the collection.
    pub async fn archive_session(&mut self, session_id: &str) {
        self.lifecycle_action(session_id, "archive", "Failed to archive session")
            .await;
    }

    async fn lifecycle_action(&mut self, session_id: &str, action: &str, fallback: &str) {
        self.loading = true;
        self.error = None;

        let path = format!("/api/admin/sessions/{session_id}/{action}");
        match self.api.post_empty(&path).await {
            Ok(()) => {
                debug!(session_id = %session_id, action = %action, "Lifecycle action applied");
                // Pessimistic refresh: fetch_sessions manages its own flags.
                self.fetch_sessions().await;
                return;
            }
            Err(e) => {
                warn!(error = %e, session_id = %session_id, action = %action, "Lifecycle action failed");
                self.error = Some(e.failure_message(fallback));
            }
        }
        self.loading = false;
    }

    /// Merge a partial filter update; purely local, no fetch.
    pub fn set_filters(&mut self, update: SessionFilterUpdate) {
        self.filters.apply(update);
    }

    /// Clear the last error.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Remove the entry with the given identifier, if present.
    fn remove_local(&mut self, session_id: &str) {
        self.sessions.retain(|s| s.session_id != session_id);
    }
}
