//! In-memory stores over remotely fetched admin collections.
//!
//! Each store owns one loading flag and one error field shared by all of
//! its actions; derived views (`filtered_sessions`, `sorted_leaderboard`)
//! are recomputed from current state on every read.

pub mod leaderboard;
pub mod sessions;

pub use leaderboard::LeaderboardStore;
pub use sessions::SessionStore;
