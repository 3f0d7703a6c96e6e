//! Admin API client modules.
//!
//! ## Modules
//!
//! - `client`: HTTP client with bearer auth and response normalization
//! - `auth`: login/logout and durable token handling

pub mod auth;
pub mod client;

pub use auth::{AuthSession, TokenStore};
pub use client::{AdminApi, ApiClientError, extract_collection};
