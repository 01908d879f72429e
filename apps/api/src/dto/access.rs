use beauty_control_application::{GuardOutcome, PermissionMatch, RouteGuard};
use beauty_control_domain::{NavigationItem, RouteDecision};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// How requested permissions are combined.
#[derive(Debug, Clone, Copy, Default, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-match-request.ts"
)]
pub enum PermissionMatchRequest {
    #[default]
    Any,
    All,
}

impl From<PermissionMatchRequest> for PermissionMatch {
    fn from(value: PermissionMatchRequest) -> Self {
        match value {
            PermissionMatchRequest::Any => Self::Any,
            PermissionMatchRequest::All => Self::All,
        }
    }
}

/// Incoming payload for a role permission check.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-check-request.ts"
)]
pub struct PermissionCheckRequest {
    pub role: String,
    pub status: String,
    pub permissions: Vec<String>,
    #[serde(default)]
    pub mode: PermissionMatchRequest,
}

/// Result of a permission check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-check-response.ts"
)]
pub struct PermissionCheckResponse {
    pub allowed: bool,
}

/// Incoming payload for a route access check.
///
/// A missing `status` is treated as `INACTIVE`.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/route-access-request.ts"
)]
pub struct RouteAccessRequest {
    pub path: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub authenticated: bool,
}

/// Result of a route access check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/route-access-response.ts"
)]
pub struct RouteAccessResponse {
    pub allowed: bool,
    pub decision: String,
    pub redirect_to: Option<String>,
}

impl From<RouteDecision> for RouteAccessResponse {
    fn from(value: RouteDecision) -> Self {
        let redirect_to = match RouteGuard::outcome_for(value) {
            GuardOutcome::Redirect(path) => Some(path.to_owned()),
            GuardOutcome::Render | GuardOutcome::Fallback | GuardOutcome::Hidden => None,
        };

        Self {
            allowed: value.is_allowed(),
            decision: value.as_str().to_owned(),
            redirect_to,
        }
    }
}

/// Query string of the navigation endpoint.
#[derive(Debug, Deserialize)]
pub struct NavigationQuery {
    pub role: String,
    pub status: String,
}

/// API representation of a navigation entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/navigation-item-response.ts"
)]
pub struct NavigationItemResponse {
    pub label: String,
    pub path: String,
    pub icon: String,
}

impl From<NavigationItem> for NavigationItemResponse {
    fn from(value: NavigationItem) -> Self {
        Self {
            label: value.label.to_owned(),
            path: value.path.to_owned(),
            icon: value.icon.to_owned(),
        }
    }
}
