//! Stock Roulette admin client.
//!
//! Client for the browser game's administrative API: authentication with
//! a durable bearer token, session collection management (fetch, filter,
//! delete, reset, archive), a leaderboard view, and CSV export.
//!
//! ## Modules
//!
//! - `api`: HTTP client, login/logout, and durable token handling
//! - `store`: in-memory stores over remotely fetched collections
//! - `export`: bulk CSV download with date-stamped filenames
//! - `routes`: admin route surface and the navigation guard
//! - `config`: configuration loading and validation

pub mod api;
pub mod config;
pub mod export;
pub mod routes;
pub mod store;

pub use api::{AdminApi, ApiClientError, AuthSession, TokenStore};
pub use config::AdminConfig;
pub use export::{ExportKind, Exporter, export_filename};
pub use routes::{AdminRoute, Navigation, guard};
pub use store::{LeaderboardStore, SessionStore};
