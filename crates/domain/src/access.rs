//! Pure authorization decisions over the static catalog and route table.
//!
//! Nothing here performs I/O or holds state. A denial is a normal `false`
//! (or a denying [`RouteDecision`]), never an error.

use serde::Serialize;

use crate::{
    Permission, Role, UserStatus, find_route_rule, is_authenticated_route, is_public_route,
    permissions_for_role,
};

/// Returns whether a role holds a permission.
///
/// Denied unless the status is active. Membership is exact: there is no
/// wildcard or hierarchy-based matching.
#[must_use]
pub fn has_permission(role: Role, permission: Permission, status: UserStatus) -> bool {
    if !status.is_active() {
        return false;
    }

    permissions_for_role(role).contains(&permission)
}

/// Returns whether the role holds at least one of the permissions.
///
/// An empty list is never satisfied.
#[must_use]
pub fn has_any_permission(role: Role, permissions: &[Permission], status: UserStatus) -> bool {
    permissions
        .iter()
        .any(|permission| has_permission(role, *permission, status))
}

/// Returns whether the role holds every one of the permissions.
///
/// An empty list is always satisfied.
#[must_use]
pub fn has_all_permissions(role: Role, permissions: &[Permission], status: UserStatus) -> bool {
    permissions
        .iter()
        .all(|permission| has_permission(role, *permission, status))
}

/// Returns whether `role` is strictly senior to `target`.
#[must_use]
pub fn is_role_higher_than(role: Role, target: Role) -> bool {
    role.level() > target.level()
}

/// Returns whether `role` is at least as senior as `target`.
#[must_use]
pub fn is_role_equal_or_higher(role: Role, target: Role) -> bool {
    role.level() >= target.level()
}

/// Outcome of a route access check, with the reason for denials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteDecision {
    /// Path is on the public list.
    Public,
    /// Path is on the authenticated-only list.
    Authenticated,
    /// A route rule matched and the caller satisfies it.
    Granted,
    /// Caller is not authenticated.
    Unauthenticated,
    /// Caller is authenticated but the account is not active.
    InactiveAccount,
    /// A rule matched but the caller's role is not listed.
    RoleNotAllowed,
    /// A rule matched, the role is listed, but no required permission is held.
    MissingPermission,
    /// No rule governs the path.
    NoMatchingRule,
}

impl RouteDecision {
    /// Returns whether the decision allows access.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Public | Self::Authenticated | Self::Granted)
    }

    /// Returns a stable transport value for this decision.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Authenticated => "authenticated",
            Self::Granted => "granted",
            Self::Unauthenticated => "unauthenticated",
            Self::InactiveAccount => "inactive_account",
            Self::RoleNotAllowed => "role_not_allowed",
            Self::MissingPermission => "missing_permission",
            Self::NoMatchingRule => "no_matching_rule",
        }
    }
}

/// Decides whether a caller may open a path and records why.
///
/// Checks run in a fixed order: public list, authentication, account status,
/// authenticated-only list, then the route table. Paths with no rule are
/// denied.
#[must_use]
pub fn route_access_decision(
    path: &str,
    role: Option<Role>,
    is_authenticated: bool,
    status: UserStatus,
) -> RouteDecision {
    if is_public_route(path) {
        return RouteDecision::Public;
    }

    if !is_authenticated {
        return RouteDecision::Unauthenticated;
    }

    if !status.is_active() {
        return RouteDecision::InactiveAccount;
    }

    if is_authenticated_route(path) {
        return RouteDecision::Authenticated;
    }

    let Some(rule) = find_route_rule(path) else {
        return RouteDecision::NoMatchingRule;
    };

    let Some(role) = role.filter(|role| rule.roles.contains(role)) else {
        return RouteDecision::RoleNotAllowed;
    };

    if !rule.permissions.is_empty() && !has_any_permission(role, rule.permissions, status) {
        return RouteDecision::MissingPermission;
    }

    RouteDecision::Granted
}

/// Returns whether a caller may open a path.
#[must_use]
pub fn can_access_route(
    path: &str,
    role: Option<Role>,
    is_authenticated: bool,
    status: UserStatus,
) -> bool {
    route_access_decision(path, role, is_authenticated, status).is_allowed()
}
