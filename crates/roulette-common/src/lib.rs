//! Shared types for the Stock Roulette admin client.
//!
//! This crate contains:
//! - Domain records as returned by the admin API (`Session`, `LeaderboardEntry`)
//! - Session lifecycle status and filter types
//!
//! Monetary fields (balance, profit) use `rust_decimal::Decimal`.

pub mod types;

pub use types::{
    LeaderboardEntry, Session, SessionFilterUpdate, SessionFilters, SessionStatus, StatusFilter,
};
