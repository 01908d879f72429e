//! Adapters turning evaluator decisions into presentation outcomes.
//!
//! Guards hold no authorization rules of their own.

use beauty_control_core::UserIdentity;
use beauty_control_domain::{
    LOGIN_ROUTE, Permission, Role, RouteDecision, UNAUTHORIZED_ROUTE, UserStatus,
    default_route_for_role, has_all_permissions, has_any_permission, is_role_equal_or_higher,
    route_access_decision,
};

/// Signed-in user as seen by guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Session identity.
    pub identity: UserIdentity,
    /// Platform role.
    pub role: Role,
    /// Account status.
    pub status: UserStatus,
}

impl AuthenticatedUser {
    /// Returns the route the user lands on after login.
    #[must_use]
    pub fn landing_route(&self) -> &'static str {
        default_route_for_role(self.role)
    }
}

/// What the presentation layer should do with a guarded subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Render the guarded content.
    Render,
    /// Render the caller-supplied fallback instead.
    Fallback,
    /// Render nothing.
    Hidden,
    /// Navigate to another path.
    Redirect(&'static str),
}

/// Guard for whole pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    /// Decides what to do when `user` navigates to `path`.
    ///
    /// Anonymous visitors are sent to the login page, every other denial to
    /// the unauthorized page.
    #[must_use]
    pub fn check(&self, path: &str, user: Option<&AuthenticatedUser>) -> GuardOutcome {
        let decision = match user {
            Some(user) => route_access_decision(path, Some(user.role), true, user.status),
            None => route_access_decision(path, None, false, UserStatus::Inactive),
        };

        Self::outcome_for(decision)
    }

    /// Maps an evaluator decision to a page outcome.
    #[must_use]
    pub fn outcome_for(decision: RouteDecision) -> GuardOutcome {
        match decision {
            decision if decision.is_allowed() => GuardOutcome::Render,
            RouteDecision::Unauthenticated => GuardOutcome::Redirect(LOGIN_ROUTE),
            _ => GuardOutcome::Redirect(UNAUTHORIZED_ROUTE),
        }
    }
}

/// How a [`PermissionGuard`] combines its permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionMatch {
    /// At least one permission is required.
    #[default]
    Any,
    /// Every permission is required.
    All,
}

/// Guard for components that need specific permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGuard {
    permissions: Vec<Permission>,
    mode: PermissionMatch,
    has_fallback: bool,
}

impl PermissionGuard {
    /// Creates a guard requiring any of the permissions.
    #[must_use]
    pub fn any(permissions: impl Into<Vec<Permission>>) -> Self {
        Self {
            permissions: permissions.into(),
            mode: PermissionMatch::Any,
            has_fallback: false,
        }
    }

    /// Creates a guard requiring all of the permissions.
    #[must_use]
    pub fn all(permissions: impl Into<Vec<Permission>>) -> Self {
        Self {
            permissions: permissions.into(),
            mode: PermissionMatch::All,
            has_fallback: false,
        }
    }

    /// Renders a fallback instead of nothing on denial.
    #[must_use]
    pub fn with_fallback(mut self) -> Self {
        self.has_fallback = true;
        self
    }

    /// Decides what to render for the user.
    #[must_use]
    pub fn check(&self, user: Option<&AuthenticatedUser>) -> GuardOutcome {
        let allowed = user.is_some_and(|user| match self.mode {
            PermissionMatch::Any => has_any_permission(user.role, &self.permissions, user.status),
            PermissionMatch::All => has_all_permissions(user.role, &self.permissions, user.status),
        });

        denial_outcome(allowed, self.has_fallback)
    }
}

/// Guard for components reserved to a minimum role in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGuard {
    minimum: Role,
    has_fallback: bool,
}

impl RoleGuard {
    /// Creates a guard requiring `minimum` or a more senior role.
    #[must_use]
    pub fn at_least(minimum: Role) -> Self {
        Self {
            minimum,
            has_fallback: false,
        }
    }

    /// Renders a fallback instead of nothing on denial.
    #[must_use]
    pub fn with_fallback(mut self) -> Self {
        self.has_fallback = true;
        self
    }

    /// Decides what to render for the user.
    #[must_use]
    pub fn check(&self, user: Option<&AuthenticatedUser>) -> GuardOutcome {
        let allowed = user.is_some_and(|user| {
            user.status.is_active() && is_role_equal_or_higher(user.role, self.minimum)
        });

        denial_outcome(allowed, self.has_fallback)
    }
}

fn denial_outcome(allowed: bool, has_fallback: bool) -> GuardOutcome {
    match (allowed, has_fallback) {
        (true, _) => GuardOutcome::Render,
        (false, true) => GuardOutcome::Fallback,
        (false, false) => GuardOutcome::Hidden,
    }
}
