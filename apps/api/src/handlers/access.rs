use std::str::FromStr;

use axum::Json;
use beauty_control_application::PermissionMatch;
use beauty_control_domain::{
    Permission, Role, UserStatus, has_all_permissions, has_any_permission, route_access_decision,
};

use crate::dto::{
    PermissionCheckRequest, PermissionCheckResponse, RouteAccessRequest, RouteAccessResponse,
};
use crate::error::ApiResult;

pub async fn check_permissions_handler(
    Json(payload): Json<PermissionCheckRequest>,
) -> ApiResult<Json<PermissionCheckResponse>> {
    let role = Role::from_transport(payload.role.as_str())?;
    let status = UserStatus::from_str(payload.status.as_str())?;
    let permissions = payload
        .permissions
        .iter()
        .map(|value| Permission::from_transport(value.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let allowed = match PermissionMatch::from(payload.mode) {
        PermissionMatch::Any => has_any_permission(role, &permissions, status),
        PermissionMatch::All => has_all_permissions(role, &permissions, status),
    };

    Ok(Json(PermissionCheckResponse { allowed }))
}

pub async fn check_route_handler(
    Json(payload): Json<RouteAccessRequest>,
) -> ApiResult<Json<RouteAccessResponse>> {
    let role = payload
        .role
        .as_deref()
        .map(Role::from_transport)
        .transpose()?;
    let status = payload
        .status
        .as_deref()
        .map(UserStatus::from_str)
        .transpose()?
        .unwrap_or(UserStatus::Inactive);

    let decision = route_access_decision(payload.path.as_str(), role, payload.authenticated, status);

    Ok(Json(RouteAccessResponse::from(decision)))
}
