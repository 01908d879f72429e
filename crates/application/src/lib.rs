//! Application services and ports.

#![forbid(unsafe_code)]

mod business_access_ports;
mod business_access_service;
mod route_guard;

pub use business_access_ports::{
    BUSINESS_ACCESS_CACHE_TTL_SECONDS, BusinessAccessGateway, BusinessGrantCache, Clock,
};
pub use business_access_service::{
    AccessValidation, BusinessAccessErrors, BusinessAccessService, ValidationState,
};
pub use route_guard::{
    AuthenticatedUser, GuardOutcome, PermissionGuard, PermissionMatch, RoleGuard, RouteGuard,
};
