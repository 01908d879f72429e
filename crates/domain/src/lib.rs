//! Authorization domain: roles, permissions, route configuration and the
//! pure evaluator built on top of them.

#![forbid(unsafe_code)]

mod access;
mod business;
mod catalog;
mod navigation;
mod role;
mod route;
mod security;

pub use access::{
    RouteDecision, can_access_route, has_all_permissions, has_any_permission, has_permission,
    is_role_equal_or_higher, is_role_higher_than, route_access_decision,
};
pub use business::{ActiveBusiness, BusinessAccessGrant, BusinessAccessKey};
pub use catalog::{ROLE_PERMISSIONS, permissions_for_role};
pub use navigation::{NAVIGATION_MENUS, NavigationItem, navigation_for_role, visible_navigation};
pub use role::{Role, RoleLevel, UserStatus, role_level_of};
pub use route::{
    AUTHENTICATED_ROUTES, DEFAULT_ROUTE, DEFAULT_ROUTES, LOGIN_ROUTE, PUBLIC_ROUTES, ROUTE_RULES,
    RouteRule, UNAUTHORIZED_ROUTE, default_route_for_role, default_route_for_role_name,
    find_route_rule, is_authenticated_route, is_public_route,
};
pub use security::Permission;
