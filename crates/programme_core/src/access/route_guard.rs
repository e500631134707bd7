//! Navigation guard.
//!
//! Rules, first match wins:
//! 1. A route that requires auth redirects anonymous users to login.
//! 2. The login route redirects authenticated users to the dashboard.
//! 3. A route that names a permission redirects users lacking it to the
//!    dashboard with a reason.
//! 4. Everything else is allowed.

use crate::access::permissions::PermissionSet;
use log::debug;
use serde::{Deserialize, Serialize};

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const PERMISSION_DENIED_REASON: &str = "You do not have permission to access this page";

/// Auth state as reported by the auth collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSnapshot {
    pub is_authenticated: bool,
    #[serde(default)]
    pub grants: PermissionSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequirement {
    pub path: String,
    #[serde(default)]
    pub requires_auth: bool,
    #[serde(default)]
    pub permission: Option<String>,
}

impl RouteRequirement {
    pub fn public(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_auth: false,
            permission: None,
        }
    }

    pub fn authenticated(path: impl Into<String>) -> Self {
        Self {
            requires_auth: true,
            ..Self::public(path)
        }
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectToLogin,
    RedirectToDashboard { reason: Option<String> },
}

pub fn guard_route(route: &RouteRequirement, auth: &AuthSnapshot) -> RouteDecision {
    let decision = if route.requires_auth && !auth.is_authenticated {
        RouteDecision::RedirectToLogin
    } else if route.path == LOGIN_PATH && auth.is_authenticated {
        RouteDecision::RedirectToDashboard { reason: None }
    } else if route
        .permission
        .as_deref()
        .is_some_and(|permission| !auth.grants.has(permission))
    {
        RouteDecision::RedirectToDashboard {
            reason: Some(PERMISSION_DENIED_REASON.to_string()),
        }
    } else {
        RouteDecision::Allow
    };

    debug!(
        "event=guard_route module=access path={} decision={:?}",
        route.path, decision
    );
    decision
}

#[cfg(test)]
mod tests {
    use super::{guard_route, AuthSnapshot, RouteDecision, RouteRequirement, LOGIN_PATH};
    use crate::access::permissions::PermissionSet;

    fn signed_in(permissions: &[&str]) -> AuthSnapshot {
        AuthSnapshot {
            is_authenticated: true,
            grants: PermissionSet::new(permissions.iter().copied(), Vec::<String>::new()),
        }
    }

    #[test]
    fn anonymous_user_goes_to_login() {
        let route = RouteRequirement::authenticated("/events/1/programme");
        assert_eq!(
            guard_route(&route, &AuthSnapshot::default()),
            RouteDecision::RedirectToLogin
        );
    }

    #[test]
    fn signed_in_user_skips_login_page() {
        let route = RouteRequirement::public(LOGIN_PATH);
        assert_eq!(
            guard_route(&route, &signed_in(&[])),
            RouteDecision::RedirectToDashboard { reason: None }
        );
    }

    #[test]
    fn missing_permission_redirects_with_reason() {
        let route = RouteRequirement::authenticated("/events/1/programme")
            .with_permission("events.update");
        match guard_route(&route, &signed_in(&["events.read"])) {
            RouteDecision::RedirectToDashboard { reason } => {
                assert_eq!(
                    reason.as_deref(),
                    Some("You do not have permission to access this page")
                );
            }
            other => panic!("unexpected decision: {other:?}"),
        }
        assert_eq!(
            guard_route(&route, &signed_in(&["events.update"])),
            RouteDecision::Allow
        );
    }
}
