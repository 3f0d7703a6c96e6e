//! Admin route surface and the navigation guard.
//!
//! Two-state guard: routes either require auth or they do not. Entering a
//! guarded route first re-applies any durably stored token (`check_auth`),
//! then redirects to the login route if the session is still
//! unauthenticated. The check is synchronous and runs once per
//! navigation; it never validates the token against the server.

use tracing::debug;

use crate::api::AuthSession;

/// Navigable admin views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminRoute {
    /// Login form; the only ungated admin route.
    Login,
    /// Admin area root; resolves to the sessions view.
    Dashboard,
    /// Session management view.
    Sessions,
    /// Leaderboard view.
    Leaderboard,
}

impl AdminRoute {
    /// URL path of the route.
    pub fn path(&self) -> &'static str {
        match self {
            AdminRoute::Login => "/admin/login",
            AdminRoute::Dashboard => "/admin",
            AdminRoute::Sessions => "/admin/sessions",
            AdminRoute::Leaderboard => "/admin/leaderboard",
        }
    }

    /// True for routes inside the gated admin area.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, AdminRoute::Login)
    }

    /// Route actually shown after redirects (`/admin` → sessions).
    pub fn resolve(&self) -> AdminRoute {
        match self {
            AdminRoute::Dashboard => AdminRoute::Sessions,
            route => *route,
        }
    }
}

impl std::fmt::Display for AdminRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Navigation allowed; carries the resolved route.
    Proceed(AdminRoute),
    /// Unauthenticated access to a gated route.
    RedirectToLogin,
}

/// Gate a navigation attempt on the auth session state.
pub fn guard(route: AdminRoute, auth: &mut AuthSession) -> Navigation {
    if route.requires_auth() {
        auth.check_auth();
        if !auth.is_authenticated {
            debug!(route = %route, "Unauthenticated, redirecting to login");
            return Navigation::RedirectToLogin;
        }
    }
    Navigation::Proceed(route.resolve())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::{AdminApi, TokenStore};
    use tempfile::TempDir;

    fn auth_session(dir: &TempDir, stored_token: Option<&str>) -> AuthSession {
        let tokens = TokenStore::new(dir.path().join("token"));
        if let Some(token) = stored_token {
            tokens.save(token).unwrap();
        }
        AuthSession::new(Arc::new(AdminApi::new("http://localhost:8000")), tokens)
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(AdminRoute::Login.path(), "/admin/login");
        assert_eq!(AdminRoute::Dashboard.path(), "/admin");
        assert_eq!(AdminRoute::Sessions.path(), "/admin/sessions");
        assert_eq!(AdminRoute::Leaderboard.path(), "/admin/leaderboard");
    }

    #[test]
    fn test_requires_auth() {
        assert!(!AdminRoute::Login.requires_auth());
        assert!(AdminRoute::Dashboard.requires_auth());
        assert!(AdminRoute::Sessions.requires_auth());
        assert!(AdminRoute::Leaderboard.requires_auth());
    }

    #[test]
    fn test_dashboard_resolves_to_sessions() {
        assert_eq!(AdminRoute::Dashboard.resolve(), AdminRoute::Sessions);
        assert_eq!(AdminRoute::Sessions.resolve(), AdminRoute::Sessions);
        assert_eq!(AdminRoute::Login.resolve(), AdminRoute::Login);
    }

    #[test]
    fn test_guard_unauthenticated_redirects() {
        let dir = TempDir::new().unwrap();
        let mut auth = auth_session(&dir, None);

        assert_eq!(
            guard(AdminRoute::Sessions, &mut auth),
            Navigation::RedirectToLogin
        );
        assert!(!auth.is_authenticated);
    }

    #[test]
    fn test_guard_login_route_always_passes() {
        let dir = TempDir::new().unwrap();
        let mut auth = auth_session(&dir, None);

        assert_eq!(
            guard(AdminRoute::Login, &mut auth),
            Navigation::Proceed(AdminRoute::Login)
        );
    }

    #[test]
    fn test_guard_picks_up_stored_token() {
        let dir = TempDir::new().unwrap();
        let mut auth = auth_session(&dir, Some("stored-token"));
        assert!(!auth.is_authenticated);

        // The guard itself runs check_auth before deciding.
        assert_eq!(
            guard(AdminRoute::Leaderboard, &mut auth),
            Navigation::Proceed(AdminRoute::Leaderboard)
        );
        assert!(auth.is_authenticated);
    }

    #[test]
    fn test_guard_resolves_dashboard_redirect() {
        let dir = TempDir::new().unwrap();
        let mut auth = auth_session(&dir, Some("stored-token"));

        assert_eq!(
            guard(AdminRoute::Dashboard, &mut auth),
            Navigation::Proceed(AdminRoute::Sessions)
        );
    }

    #[test]
    fn test_guard_after_logout_redirects_again() {
        let dir = TempDir::new().unwrap();
        let mut auth = auth_session(&dir, Some("stored-token"));

        assert!(matches!(
            guard(AdminRoute::Sessions, &mut auth),
            Navigation::Proceed(_)
        ));

        auth.logout();
        assert_eq!(
            guard(AdminRoute::Sessions, &mut auth),
            Navigation::RedirectToLogin
        );
    }
}
