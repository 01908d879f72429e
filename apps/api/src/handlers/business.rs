use axum::Json;
use axum::extract::{Extension, Path, State};
use beauty_control_core::{AppError, BusinessId};
use beauty_control_domain::Permission;
use tower_sessions::Session;

use crate::dto::{
    AccessValidationResponse, AccessibleBusinessesResponse, ActiveBusinessResponse,
    BusinessAccessErrorsResponse, BusinessGrantResponse, BusinessPermissionCheckRequest,
    BusinessPermissionCheckResponse, CacheInvalidationResponse, LogoutResponse,
    SwitchBusinessRequest, ValidateBusinessRequest,
};
use crate::error::ApiResult;
use crate::middleware::SessionUser;
use crate::state::AppState;


pub async fn validate_business_handler(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<ValidateBusinessRequest>,
) -> ApiResult<Json<AccessValidationResponse>> {
    let business_id = BusinessId::new(payload.business_id)?;
    let service = state.business_sessions.session_for(&user).await;

    let outcome = service
        .validate_access(&business_id, payload.user_id.as_deref())
        .await;

    Ok(Json(AccessValidationResponse::from(outcome)))
}

pub async fn list_accessible_businesses_handler(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> ApiResult<Json<AccessibleBusinessesResponse>> {
    let service = state.business_sessions.session_for(&user).await;

    let businesses = service
        .list_accessible_businesses()
        .await?
        .into_iter()
        .map(BusinessGrantResponse::from)
        .collect();
    let active_business_id = service
        .active_business()
        .await
        .map(|active| active.business_id.to_string());

    Ok(Json(AccessibleBusinessesResponse {
        businesses,
        active_business_id,
    }))
}

pub async fn switch_business_handler(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<SwitchBusinessRequest>,
) -> ApiResult<Json<BusinessGrantResponse>> {
    let business_id = BusinessId::new(payload.business_id)?;
    let service = state.business_sessions.session_for(&user).await;

    let grant = service.switch_active_business(&business_id).await?;

    Ok(Json(BusinessGrantResponse::from(grant)))
}

pub async fn active_business_handler(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> ApiResult<Json<ActiveBusinessResponse>> {
    let service = state.business_sessions.session_for(&user).await;

    let active = service.active_business().await;
    let validation_state = match active.as_ref() {
        Some(active) => Some(
            service
                .validation_state(&active.business_id)
                .await
                .as_str()
                .to_owned(),
        ),
        None => None,
    };

    Ok(Json(ActiveBusinessResponse {
        active: active.map(BusinessGrantResponse::from),
        validation_state,
        errors: BusinessAccessErrorsResponse::from(service.errors().await),
    }))
}

pub async fn check_business_permission_handler(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<BusinessPermissionCheckRequest>,
) -> ApiResult<Json<BusinessPermissionCheckResponse>> {
    let business_id = BusinessId::new(payload.business_id)?;
    let permission = Permission::from_transport(payload.permission.as_str())?;
    let service = state.business_sessions.session_for(&user).await;

    let allowed = service.check_permission(&business_id, permission).await;

    Ok(Json(BusinessPermissionCheckResponse { allowed }))
}

pub async fn invalidate_business_cache_handler(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(business_id): Path<String>,
) -> ApiResult<Json<CacheInvalidationResponse>> {
    let business_id = BusinessId::new(business_id)?;
    let service = state.business_sessions.session_for(&user).await;

    let removed = service.invalidate_business_cache(&business_id).await?;

    Ok(Json(CacheInvalidationResponse {
        business_id: business_id.to_string(),
        removed,
    }))
}

pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    session: Session,
) -> ApiResult<Json<LogoutResponse>> {
    let cleared = state
        .business_sessions
        .end_session(user.session_id.as_str())
        .await?;

    session
        .flush()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(Json(LogoutResponse { cleared }))
}
