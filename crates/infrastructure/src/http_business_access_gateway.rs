use async_trait::async_trait;
use beauty_control_application::BusinessAccessGateway;
use beauty_control_core::{AppError, AppResult, BusinessId};
use beauty_control_domain::{BusinessAccessGrant, Permission, Role};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

const VALIDATE_ACCESS_PATH: &str = "api/business/validate-access";
const ACCESSIBLE_BUSINESSES_PATH: &str = "api/business/accessible";
const CHECK_PERMISSION_PATH: &str = "api/business/check-permission";

/// HTTP adapter for the salon backend's business access endpoints.
///
/// One instance is bound to one session so the user's bearer token is
/// forwarded on every call.
#[derive(Clone)]
pub struct HttpBusinessAccessGateway {
    http_client: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
}

impl HttpBusinessAccessGateway {
    /// Creates a gateway for the backend rooted at `base_url`.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: Url) -> Self {
        Self {
            http_client,
            base_url,
            access_token: None,
        }
    }

    /// Forwards the bearer token on every request.
    #[must_use]
    pub fn with_access_token(mut self, access_token: Option<String>) -> Self {
        self.access_token = access_token;
        self
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url.join(path).map_err(|error| {
            AppError::Internal(format!("invalid business api endpoint '{path}': {error}"))
        })
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.access_token.as_deref() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json<T>(&self, builder: reqwest::RequestBuilder, operation: &str) -> AppResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self
            .authorize(builder)
            .send()
            .await
            .map_err(|error| AppError::Internal(format!("{operation} transport error: {error}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response body unavailable>".to_owned());
            return Err(error_for_status(status, operation, body.as_str()));
        }

        response.json::<T>().await.map_err(|error| {
            AppError::Internal(format!("{operation} returned an unreadable body: {error}"))
        })
    }
}

#[async_trait]
impl BusinessAccessGateway for HttpBusinessAccessGateway {
    async fn validate_access(
        &self,
        business_id: &BusinessId,
        user_id: &str,
    ) -> AppResult<BusinessAccessGrant> {
        let url = self.endpoint(VALIDATE_ACCESS_PATH)?;
        let request = ValidateAccessRequest {
            business_id: business_id.as_str(),
            user_id,
        };

        let response: ValidateAccessResponse = self
            .send_json(
                self.http_client.post(url).json(&request),
                "business access validation",
            )
            .await?;

        grant_from_validation(business_id, response)
    }

    async fn list_accessible_businesses(&self) -> AppResult<Vec<BusinessAccessGrant>> {
        let url = self.endpoint(ACCESSIBLE_BUSINESSES_PATH)?;
        let response: AccessibleBusinessesResponse = self
            .send_json(self.http_client.get(url), "accessible business listing")
            .await?;

        Ok(grants_from_listing(response))
    }

    async fn check_permission(
        &self,
        business_id: &BusinessId,
        permission: Permission,
    ) -> AppResult<bool> {
        let url = self.endpoint(CHECK_PERMISSION_PATH)?;
        let request = CheckPermissionRequest {
            business_id: business_id.as_str(),
            permission: permission.as_str(),
        };

        let response: CheckPermissionResponse = self
            .send_json(
                self.http_client.post(url).json(&request),
                "business permission check",
            )
            .await?;

        Ok(response.allowed)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidateAccessRequest<'a> {
    business_id: &'a str,
    user_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckPermissionRequest<'a> {
    business_id: &'a str,
    permission: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidateAccessResponse {
    has_access: bool,
    #[serde(default)]
    business_data: Option<BusinessData>,
    #[serde(default)]
    permissions: Vec<String>,
    #[serde(default)]
    user_role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BusinessData {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    is_owner: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct AccessibleBusinessesResponse {
    #[serde(default)]
    businesses: Vec<AccessibleBusinessEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessibleBusinessEntry {
    business_id: String,
    #[serde(default)]
    business_name: Option<String>,
    has_access: bool,
    role: String,
    #[serde(default)]
    permissions: Vec<String>,
    #[serde(default)]
    is_owner: bool,
}

#[derive(Debug, Deserialize)]
struct CheckPermissionResponse {
    allowed: bool,
}

fn grant_from_validation(
    business_id: &BusinessId,
    response: ValidateAccessResponse,
) -> AppResult<BusinessAccessGrant> {
    let business_data = response.business_data.unwrap_or_default();
    let role = granted_role(
        business_id,
        response.has_access,
        response.user_role.as_deref(),
    )?;

    Ok(BusinessAccessGrant {
        business_id: business_id.clone(),
        business_name: business_data.name,
        has_access: response.has_access,
        role,
        permissions: parse_permissions(business_id, &response.permissions),
        is_owner: business_data.is_owner.unwrap_or(false),
    })
}

/// A granted validation must name a known role. A denial may omit it or
/// carry one this client does not know; it then resolves to the least
/// privileged role.
fn granted_role(
    business_id: &BusinessId,
    has_access: bool,
    user_role: Option<&str>,
) -> AppResult<Role> {
    let resolved = match user_role {
        Some(user_role) => Role::from_transport(user_role),
        None => Err(AppError::Validation(format!(
            "business access validation for '{business_id}' did not name a role"
        ))),
    };

    match resolved {
        Ok(role) => Ok(role),
        Err(_) if !has_access => Ok(Role::Client),
        Err(error) => Err(error),
    }
}

/// Maps a listing, skipping entries that cannot be read.
fn grants_from_listing(response: AccessibleBusinessesResponse) -> Vec<BusinessAccessGrant> {
    response
        .businesses
        .into_iter()
        .filter_map(|entry| {
            let business_id = entry.business_id.clone();
            match grant_from_accessible_entry(entry) {
                Ok(grant) => Some(grant),
                Err(error) => {
                    warn!(
                        business_id = %business_id,
                        error = %error,
                        "skipping unreadable accessible business entry"
                    );
                    None
                }
            }
        })
        .collect()
}

fn grant_from_accessible_entry(entry: AccessibleBusinessEntry) -> AppResult<BusinessAccessGrant> {
    let business_id = BusinessId::new(entry.business_id)?;
    let permissions = parse_permissions(&business_id, &entry.permissions);

    Ok(BusinessAccessGrant {
        role: Role::from_transport(entry.role.as_str())?,
        business_id,
        business_name: entry.business_name,
        has_access: entry.has_access,
        permissions,
        is_owner: entry.is_owner,
    })
}

fn parse_permissions(business_id: &BusinessId, tokens: &[String]) -> Vec<Permission> {
    tokens
        .iter()
        .filter_map(|token| match Permission::from_transport(token.as_str()) {
            Ok(permission) => Some(permission),
            Err(_) => {
                warn!(
                    business_id = %business_id,
                    permission = %token,
                    "ignoring unknown business permission"
                );
                None
            }
        })
        .collect()
}

fn error_for_status(status: StatusCode, operation: &str, body: &str) -> AppError {
    let message = format!("{operation} failed with status {status}: {body}");
    match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        _ => AppError::Internal(message),
    }
}
