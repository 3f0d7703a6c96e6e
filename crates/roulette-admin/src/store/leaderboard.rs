//! Leaderboard store: fetch and rank player performance records.

use std::sync::Arc;

use tracing::{debug, warn};

use roulette_common::LeaderboardEntry;

use crate::api::{AdminApi, extract_collection};

/// Nested field name the leaderboard endpoint may wrap the collection in.
const LEADERBOARD_KEY: &str = "leaderboard";

/// Store for the player leaderboard.
pub struct LeaderboardStore {
    api: Arc<AdminApi>,
    /// Last fetched collection; always a sequence, possibly empty.
    pub leaderboard: Vec<LeaderboardEntry>,
    /// In-flight flag.
    pub loading: bool,
    /// Last failure, human-readable.
    pub error: Option<String>,
}

impl LeaderboardStore {
    /// Create an empty store backed by the given API client.
    pub fn new(api: Arc<AdminApi>) -> Self {
        Self {
            api,
            leaderboard: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// Fetch the leaderboard from the server.
    ///
    /// Same normalization and failure policy as the session fetch: bare
    /// or nested collection shapes are accepted, anything else is empty,
    /// and failures force the local collection empty.
    pub async fn fetch_leaderboard(&mut self) {
        self.loading = true;
        self.error = None;

        let result = self.api.get_json("/api/admin/leaderboard").await;
        match result.and_then(|value| extract_collection(value, LEADERBOARD_KEY)) {
            Ok(leaderboard) => {
                debug!(count = leaderboard.len(), "Fetched leaderboard");
                self.leaderboard = leaderboard;
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch leaderboard");
                self.error = Some(e.failure_message("Failed to fetch leaderboard"));
                self.leaderboard = Vec::new();
            }
        }
        self.loading = false;
    }

    /// Entries ordered by total score, highest first.
    ///
    /// Returns a new sequence; the fetched collection is never reordered.
    /// The sort is stable so equal scores keep their fetch order across
    /// repeated reads.
    pub fn sorted_leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut sorted = self.leaderboard.clone();
        sorted.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(nickname: &str, total_score: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            rank: 0,
            player_id: 1,
            nickname: nickname.to_string(),
            total_score,
            total_profit: dec!(0),
            total_trades: 0,
            sessions_played: 1,
            average_score: total_score as f64,
            win_rate: 0.5,
        }
    }

    fn store_with(entries: Vec<LeaderboardEntry>) -> LeaderboardStore {
        let mut store = LeaderboardStore::new(Arc::new(AdminApi::new("http://localhost:8000")));
        store.leaderboard = entries;
        store
    }

    #[test]
    fn test_sorted_leaderboard_descending_by_score() {
        let store = store_with(vec![entry("a", 10), entry("b", 30), entry("c", 20)]);
        let sorted = store.sorted_leaderboard();
        let scores: Vec<i64> = sorted.iter().map(|e| e.total_score).collect();
        assert_eq!(scores, vec![30, 20, 10]);
    }

    #[test]
    fn test_sorted_leaderboard_does_not_mutate_source() {
        let store = store_with(vec![entry("a", 10), entry("b", 30)]);
        let _ = store.sorted_leaderboard();
        let original: Vec<i64> = store.leaderboard.iter().map(|e| e.total_score).collect();
        assert_eq!(original, vec![10, 30]);
    }

    #[test]
    fn test_sorted_leaderboard_stable_for_ties() {
        let store = store_with(vec![entry("first", 20), entry("second", 20), entry("top", 50)]);
        let sorted = store.sorted_leaderboard();
        assert_eq!(sorted[0].nickname, "top");
        // Equal scores keep fetch order.
        assert_eq!(sorted[1].nickname, "first");
        assert_eq!(sorted[2].nickname, "second");
    }

    #[test]
    fn test_sorted_leaderboard_empty() {
        let store = store_with(Vec::new());
        assert!(store.sorted_leaderboard().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_forces_empty_collection() {
        let mut store = LeaderboardStore::new(Arc::new(AdminApi::new("http://127.0.0.1:9")));
        store.leaderboard = vec![entry("stale", 99)];

        store.fetch_leaderboard().await;
        assert!(store.leaderboard.is_empty());
        assert!(!store.loading);
        assert_eq!(store.error.as_deref(), Some("Failed to fetch leaderboard"));
    }
}
