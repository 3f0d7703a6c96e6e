//! Domain types for the Stock Roulette admin API.
//!
//! Records are read-only snapshots of server state: the client never edits
//! a `Session` or `LeaderboardEntry` field directly, only replaces whole
//! collections after a fetch or removes entries after a confirmed delete.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Player is currently in the game.
    Active,
    /// Session was ended before the game completed.
    Ended,
    /// Game ran to completion.
    Finished,
}

impl SessionStatus {
    /// Returns the wire/display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Ended => "ended",
            SessionStatus::Finished => "finished",
        }
    }
}

impl std::str::FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SessionStatus::Active),
            "ended" => Ok(SessionStatus::Ended),
            "finished" => Ok(SessionStatus::Finished),
            other => Err(format!("unknown session status: {other}")),
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A game session as returned by `GET /api/admin/sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Server-assigned session identifier.
    pub session_id: String,
    /// Owning player identifier.
    pub player_id: i64,
    /// Player display name.
    pub player_nickname: String,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// When the session ended, if it has.
    pub ended_at: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Current monetary balance.
    pub balance: Decimal,
    /// Aggregate score.
    pub total_score: i64,
    /// Aggregate profit.
    pub total_profit: Decimal,
    /// Number of trades executed in the session.
    pub total_trades: u32,
}

/// A leaderboard row as returned by `GET /api/admin/leaderboard`.
///
/// `rank` is taken from the server as-is; the client orders rows by
/// `total_score` when rendering but does not rewrite the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Server-assigned rank (1-based).
    pub rank: u32,
    /// Player identifier.
    pub player_id: i64,
    /// Player display name.
    pub nickname: String,
    /// Aggregate score across sessions.
    pub total_score: i64,
    /// Aggregate profit across sessions.
    pub total_profit: Decimal,
    /// Total trades across sessions.
    pub total_trades: u32,
    /// Number of sessions played.
    pub sessions_played: u32,
    /// Mean score per session.
    pub average_score: f64,
    /// Fraction of winning sessions (0.0 - 1.0).
    pub win_rate: f64,
}

/// Status filter over the session collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Match every status.
    #[default]
    All,
    /// Match only the given status.
    Only(SessionStatus),
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            other => other.parse::<SessionStatus>().map(StatusFilter::Only),
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Only(status) => write!(f, "{status}"),
        }
    }
}

/// Client-side predicates over the session collection.
///
/// Purely local state: changing filters never triggers a fetch. A session
/// is included only when every active predicate matches; each predicate
/// is skipped at its neutral value (blank player, `All` status, unset
/// date bound).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionFilters {
    /// Case-insensitive substring match on the player nickname.
    pub player: String,
    /// Inclusive lower bound on the session start date.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the session start date.
    pub date_to: Option<NaiveDate>,
    /// Status filter.
    pub status: StatusFilter,
}

impl SessionFilters {
    /// Returns true if `session` satisfies every active predicate.
    pub fn matches(&self, session: &Session) -> bool {
        let matches_player = self.player.is_empty()
            || session
                .player_nickname
                .to_lowercase()
                .contains(&self.player.to_lowercase());

        let matches_status = match self.status {
            StatusFilter::All => true,
            StatusFilter::Only(status) => session.status == status,
        };

        let started = session.started_at.date_naive();
        let matches_from = self.date_from.is_none_or(|from| started >= from);
        let matches_to = self.date_to.is_none_or(|to| started <= to);

        matches_player && matches_status && matches_from && matches_to
    }

    /// Merge a partial update into the current filters.
    pub fn apply(&mut self, update: SessionFilterUpdate) {
        if let Some(player) = update.player {
            self.player = player;
        }
        if let Some(date_from) = update.date_from {
            self.date_from = date_from;
        }
        if let Some(date_to) = update.date_to {
            self.date_to = date_to;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

/// Partial filter update; `None` fields keep their current value.
///
/// The date bounds are doubly optional so a caller can both set and clear
/// a bound (`Some(None)` clears it).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionFilterUpdate {
    pub player: Option<String>,
    pub date_from: Option<Option<NaiveDate>>,
    pub date_to: Option<Option<NaiveDate>>,
    pub status: Option<StatusFilter>,
}
