//! Route guard: decides whether a protected view renders for a session.
//!
//! The guard is a pure function of the session snapshot. Hosts turn the
//! decision into a redirect (client), an error exit (CLI), or content.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::types::{RoleSet, Session};

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";
/// Where authenticated users without the required role are sent.
pub const LANDING_PATH: &str = "/";

/// Outcome of a guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Session is still resolving; show a neutral waiting indicator.
    Pending,
    RedirectToLogin,
    RedirectToLanding,
    Granted,
}

impl Access {
    /// Redirect target, replacing the current history entry.
    #[must_use]
    pub const fn redirect_path(self) -> Option<&'static str> {
        match self {
            Access::RedirectToLogin => Some(LOGIN_PATH),
            Access::RedirectToLanding => Some(LANDING_PATH),
            Access::Pending | Access::Granted => None,
        }
    }
}

/// Allow-list for a protected view. `None` admits any authenticated role.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteGuard {
    allowed: Option<RoleSet>,
}

impl RouteGuard {
    /// Any signed-in user.
    #[must_use]
    pub const fn any() -> Self {
        Self { allowed: None }
    }

    #[must_use]
    pub const fn only(allowed: RoleSet) -> Self {
        Self { allowed: Some(allowed) }
    }

    #[must_use]
    pub const fn allowed(self) -> Option<RoleSet> {
        self.allowed
    }

    #[must_use]
    pub fn check(self, session: &Session) -> Access {
        if session.loading {
            return Access::Pending;
        }
        let Some(role) = session.role() else {
            return Access::RedirectToLogin;
        };
        match self.allowed {
            Some(allowed) if !allowed.contains(role) => Access::RedirectToLanding,
            _ => Access::Granted,
        }
    }
}
