mod access;
mod business;
mod catalog;
mod session;

pub use access::{
    NavigationItemResponse, NavigationQuery, PermissionCheckRequest, PermissionCheckResponse,
    PermissionMatchRequest, RouteAccessRequest, RouteAccessResponse,
};
pub use business::{
    AccessValidationResponse, AccessibleBusinessesResponse, ActiveBusinessResponse,
    BusinessAccessErrorsResponse, BusinessGrantResponse, BusinessPermissionCheckRequest,
    BusinessPermissionCheckResponse, CacheInvalidationResponse, LogoutResponse,
    SwitchBusinessRequest, ValidateBusinessRequest,
};
pub use catalog::{HealthResponse, RoleCatalogEntryResponse};
pub use session::SessionUserResponse;
