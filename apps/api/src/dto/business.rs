use beauty_control_application::{AccessValidation, BusinessAccessErrors};
use beauty_control_domain::{ActiveBusiness, BusinessAccessGrant};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for a business access validation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/validate-business-request.ts"
)]
pub struct ValidateBusinessRequest {
    pub business_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Incoming payload for an active business switch.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/switch-business-request.ts"
)]
pub struct SwitchBusinessRequest {
    pub business_id: String,
}

/// Incoming payload for a business-scoped permission check.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/business-permission-check-request.ts"
)]
pub struct BusinessPermissionCheckRequest {
    pub business_id: String,
    pub permission: String,
}

/// API representation of a business grant or of the active business.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/business-grant-response.ts"
)]
pub struct BusinessGrantResponse {
    pub business_id: String,
    pub business_name: Option<String>,
    pub has_access: bool,
    pub role: String,
    pub permissions: Vec<String>,
    pub is_owner: bool,
}

impl From<BusinessAccessGrant> for BusinessGrantResponse {
    fn from(value: BusinessAccessGrant) -> Self {
        Self {
            business_id: value.business_id.to_string(),
            business_name: value.business_name,
            has_access: value.has_access,
            role: value.role.as_str().to_owned(),
            permissions: value
                .permissions
                .into_iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
            is_owner: value.is_owner,
        }
    }
}

impl From<ActiveBusiness> for BusinessGrantResponse {
    fn from(value: ActiveBusiness) -> Self {
        Self {
            business_id: value.business_id.to_string(),
            business_name: value.business_name,
            has_access: value.has_access,
            role: value.role.as_str().to_owned(),
            permissions: value
                .permissions
                .into_iter()
                .map(|permission| permission.as_str().to_owned())
                .collect(),
            is_owner: value.is_owner,
        }
    }
}

/// Result of a business access validation.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/access-validation-response.ts"
)]
pub struct AccessValidationResponse {
    pub business_id: String,
    pub granted: bool,
    pub reason: Option<String>,
    pub grant: Option<BusinessGrantResponse>,
}

impl From<AccessValidation> for AccessValidationResponse {
    fn from(value: AccessValidation) -> Self {
        match value {
            AccessValidation::Granted(grant) => Self {
                business_id: grant.business_id.to_string(),
                granted: true,
                reason: None,
                grant: Some(BusinessGrantResponse::from(grant)),
            },
            AccessValidation::Denied {
                business_id,
                reason,
            } => Self {
                business_id: business_id.to_string(),
                granted: false,
                reason: Some(reason),
                grant: None,
            },
        }
    }
}

/// Accessible businesses of the session user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/accessible-businesses-response.ts"
)]
pub struct AccessibleBusinessesResponse {
    pub businesses: Vec<BusinessGrantResponse>,
    pub active_business_id: Option<String>,
}

/// Last error of each business access operation.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/business-access-errors-response.ts"
)]
pub struct BusinessAccessErrorsResponse {
    pub validation: Option<String>,
    pub list: Option<String>,
    pub switch: Option<String>,
    pub permission: Option<String>,
}

impl From<BusinessAccessErrors> for BusinessAccessErrorsResponse {
    fn from(value: BusinessAccessErrors) -> Self {
        Self {
            validation: value.validation,
            list: value.list,
            switch: value.switch,
            permission: value.permission,
        }
    }
}

/// Active business of the session and its validation state.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/active-business-response.ts"
)]
pub struct ActiveBusinessResponse {
    pub active: Option<BusinessGrantResponse>,
    pub validation_state: Option<String>,
    pub errors: BusinessAccessErrorsResponse,
}

/// Result of a business-scoped permission check.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/business-permission-check-response.ts"
)]
pub struct BusinessPermissionCheckResponse {
    pub allowed: bool,
}

/// Result of a business cache invalidation.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/cache-invalidation-response.ts"
)]
pub struct CacheInvalidationResponse {
    pub business_id: String,
    pub removed: usize,
}

/// Result of a business session logout.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/logout-response.ts"
)]
pub struct LogoutResponse {
    pub cleared: bool,
}
