use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use beauty_control_core::AppError;
use tower_sessions::Session;
use tracing::info;

use crate::dto::SessionUserResponse;
use crate::error::ApiResult;
use crate::middleware::{identity_from_headers, session_user};
use crate::sessions::SESSION_USER_KEY;
use crate::state::AppState;


/// Opens a session for the user named by the auth gateway headers.
///
/// Any business access state of the previous session is dropped and the
/// session id is rotated.
pub async fn sign_in_handler(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> ApiResult<Json<SessionUserResponse>> {
    let identity = identity_from_headers(&headers)?;

    if let Some(previous) = session.id() {
        state
            .business_sessions
            .end_session(previous.to_string().as_str())
            .await?;
    }

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to rotate session id: {error}")))?;
    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| AppError::Internal(format!("failed to store session identity: {error}")))?;

    info!(user_id = %identity.user_id(), "signed in");
    Ok(Json(SessionUserResponse::from(&identity)))
}

pub async fn current_user_handler(session: Session) -> ApiResult<Json<SessionUserResponse>> {
    let user = session_user(&session).await?;
    Ok(Json(SessionUserResponse::from(&user.identity)))
}
