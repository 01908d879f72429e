//! Static route configuration: public and authenticated-only path lists,
//! the ordered route rule table and per-role landing routes.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::{Permission, Role};

/// Login page that unauthenticated visitors are sent to.
pub const LOGIN_ROUTE: &str = "/login";

/// Page shown when an authenticated user is denied.
pub const UNAUTHORIZED_ROUTE: &str = "/unauthorized";

/// Landing route used for roles with no entry in [`DEFAULT_ROUTES`].
pub const DEFAULT_ROUTE: &str = "/dashboard";

/// Paths reachable without authentication.
pub const PUBLIC_ROUTES: &[&str] = &[
    "/",
    "/login",
    "/register",
    "/forgot-password",
    "/reset-password",
    "/verify-email",
    "/pricing",
    "/subscribe",
    "/booking",
    "/unauthorized",
];

/// Paths reachable by any authenticated, active user regardless of role.
pub const AUTHENTICATED_ROUTES: &[&str] = &[
    "/profile",
    "/profile/security",
    "/notifications",
    "/select-business",
    "/logout",
];

const OWNER: &[Role] = &[Role::Owner];
const ADMINS: &[Role] = &[Role::Business, Role::BusinessSpecialist];
const FRONT_DESK: &[Role] = &[
    Role::Business,
    Role::BusinessSpecialist,
    Role::Receptionist,
    Role::ReceptionistSpecialist,
];
const STAFF: &[Role] = &[
    Role::Business,
    Role::BusinessSpecialist,
    Role::Receptionist,
    Role::ReceptionistSpecialist,
    Role::Specialist,
];
const SPECIALISTS: &[Role] = &[
    Role::Specialist,
    Role::ReceptionistSpecialist,
    Role::BusinessSpecialist,
];
const RECEPTIONISTS: &[Role] = &[Role::Receptionist, Role::ReceptionistSpecialist];
const CLIENTS: &[Role] = &[Role::Client];

/// Access requirement attached to a path pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RouteRule {
    /// Path pattern, `:name` segments match any single segment.
    pub pattern: &'static str,
    /// Roles allowed on the route.
    pub roles: &'static [Role],
    /// Permissions of which the caller needs at least one; empty means none.
    pub permissions: &'static [Permission],
}

const fn rule(
    pattern: &'static str,
    roles: &'static [Role],
    permissions: &'static [Permission],
) -> RouteRule {
    RouteRule {
        pattern,
        roles,
        permissions,
    }
}

/// Ordered route table. Pattern matching stops at the first hit, so more
/// specific patterns must precede broader ones.
pub const ROUTE_RULES: &[RouteRule] = &[
    rule("/owner/dashboard", OWNER, &[Permission::PlatformViewMetrics]),
    rule(
        "/owner/businesses",
        OWNER,
        &[Permission::PlatformManageBusinesses],
    ),
    rule(
        "/owner/businesses/:businessId",
        OWNER,
        &[Permission::PlatformManageBusinesses],
    ),
    rule("/owner/plans", OWNER, &[Permission::PlatformManagePlans]),
    rule("/owner/rules", OWNER, &[Permission::PlatformManageRules]),
    rule("/owner/reports", OWNER, &[Permission::ReportView]),
    rule("/dashboard", STAFF, &[]),
    rule("/business/profile", ADMINS, &[Permission::BusinessEdit]),
    rule("/business/settings", ADMINS, &[Permission::BusinessSettings]),
    rule("/business/staff", ADMINS, &[Permission::StaffView]),
    rule("/business/staff/:staffId", ADMINS, &[Permission::StaffView]),
    rule(
        "/business/staff/:staffId/schedule",
        ADMINS,
        &[Permission::StaffSchedule],
    ),
    rule("/business/services", FRONT_DESK, &[Permission::ServiceView]),
    rule("/business/billing", ADMINS, &[Permission::BillingView]),
    rule(
        "/business/subscription",
        ADMINS,
        &[Permission::SubscriptionView],
    ),
    rule("/business/reports", ADMINS, &[Permission::ReportView]),
    rule("/business/inventory", ADMINS, &[Permission::ProductView]),
    rule(
        "/business/commissions",
        ADMINS,
        &[Permission::CommissionView],
    ),
    rule("/appointments", FRONT_DESK, &[Permission::AppointmentView]),
    rule(
        "/appointments/new",
        FRONT_DESK,
        &[Permission::AppointmentCreate],
    ),
    rule(
        "/appointments/:appointmentId",
        STAFF,
        &[Permission::AppointmentView, Permission::AppointmentViewOwn],
    ),
    rule("/clients", STAFF, &[Permission::ClientView]),
    rule("/clients/:clientId", STAFF, &[Permission::ClientView]),
    rule(
        "/clients/:clientId/history",
        STAFF,
        &[Permission::ClientHistory],
    ),
    rule("/payments", FRONT_DESK, &[Permission::PaymentView]),
    rule(
        "/receptionist/agenda",
        RECEPTIONISTS,
        &[Permission::AppointmentView],
    ),
    rule(
        "/specialist/agenda",
        SPECIALISTS,
        &[Permission::AppointmentViewOwn],
    ),
    rule(
        "/specialist/commissions",
        SPECIALISTS,
        &[Permission::CommissionViewOwn],
    ),
    rule(
        "/client/appointments",
        CLIENTS,
        &[Permission::AppointmentViewOwn],
    ),
    rule(
        "/client/appointments/:appointmentId",
        CLIENTS,
        &[Permission::AppointmentViewOwn],
    ),
    rule("/client/book", CLIENTS, &[Permission::AppointmentCreate]),
];

/// Landing route per role after login.
pub const DEFAULT_ROUTES: &[(Role, &str)] = &[
    (Role::Owner, "/owner/dashboard"),
    (Role::Business, "/dashboard"),
    (Role::BusinessSpecialist, "/dashboard"),
    (Role::ReceptionistSpecialist, "/receptionist/agenda"),
    (Role::Receptionist, "/receptionist/agenda"),
    (Role::Specialist, "/specialist/agenda"),
    (Role::Client, "/client/appointments"),
];

struct PatternMatcher {
    rule: &'static RouteRule,
    regex: Regex,
}

static PATTERN_MATCHERS: LazyLock<Vec<PatternMatcher>> = LazyLock::new(|| {
    ROUTE_RULES
        .iter()
        .filter(|rule| rule.pattern.contains(':'))
        .filter_map(|rule| {
            Regex::new(pattern_to_regex(rule.pattern).as_str())
                .ok()
                .map(|regex| PatternMatcher { rule, regex })
        })
        .collect()
});

fn pattern_to_regex(pattern: &str) -> String {
    let body = pattern
        .split('/')
        .map(|segment| {
            if segment.starts_with(':') {
                "[^/]+".to_owned()
            } else {
                regex::escape(segment)
            }
        })
        .collect::<Vec<_>>()
        .join("/");

    format!("^{body}$")
}

/// Returns whether the path is reachable without authentication.
#[must_use]
pub fn is_public_route(path: &str) -> bool {
    PUBLIC_ROUTES.contains(&path)
}

/// Returns whether the path is reachable by any authenticated user.
#[must_use]
pub fn is_authenticated_route(path: &str) -> bool {
    AUTHENTICATED_ROUTES.contains(&path)
}

/// Finds the rule governing a path.
///
/// An exact pattern match wins over parameterized patterns. Parameterized
/// patterns are tried in table order and the first match is returned.
#[must_use]
pub fn find_route_rule(path: &str) -> Option<&'static RouteRule> {
    if let Some(rule) = ROUTE_RULES.iter().find(|rule| rule.pattern == path) {
        return Some(rule);
    }

    PATTERN_MATCHERS
        .iter()
        .find(|matcher| matcher.regex.is_match(path))
        .map(|matcher| matcher.rule)
}

/// Returns the landing route for a role, falling back to [`DEFAULT_ROUTE`].
#[must_use]
pub fn default_route_for_role(role: Role) -> &'static str {
    DEFAULT_ROUTES
        .iter()
        .find(|(candidate, _)| *candidate == role)
        .map(|(_, path)| *path)
        .unwrap_or(DEFAULT_ROUTE)
}

/// Returns the landing route for a transport role name, falling back to
/// [`DEFAULT_ROUTE`] when the name is unknown.
#[must_use]
pub fn default_route_for_role_name(value: &str) -> &'static str {
    value
        .parse::<Role>()
        .map(default_route_for_role)
        .unwrap_or(DEFAULT_ROUTE)
}
