use beauty_control_domain::{Role, default_route_for_role, permissions_for_role};
use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// One role of the static catalog.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-catalog-entry-response.ts"
)]
pub struct RoleCatalogEntryResponse {
    pub role: String,
    pub level: f32,
    pub default_route: String,
    pub permissions: Vec<String>,
}

impl From<Role> for RoleCatalogEntryResponse {
    fn from(value: Role) -> Self {
        Self {
            role: value.as_str().to_owned(),
            level: value.level().as_f32(),
            default_route: default_route_for_role(value).to_owned(),
            permissions: permissions_for_role(value)
                .iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
        }
    }
}
