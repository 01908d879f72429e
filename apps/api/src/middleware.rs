use axum::extract::Request;
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use beauty_control_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::error::ApiResult;
use crate::sessions::SESSION_USER_KEY;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_NAME_HEADER: &str = "x-user-name";
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Signed-in user together with the HTTP session it belongs to.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub session_id: String,
    pub identity: UserIdentity,
}

pub async fn require_user(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let user = session_user(&session).await?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub async fn session_user(session: &Session) -> Result<SessionUser, AppError> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;
    let session_id = session
        .id()
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    Ok(SessionUser {
        session_id: session_id.to_string(),
        identity,
    })
}

/// Reads the identity forwarded by the auth gateway on sign-in.
pub fn identity_from_headers(headers: &HeaderMap) -> Result<UserIdentity, AppError> {
    let user_id = header_value(headers, USER_ID_HEADER)
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;
    let display_name = header_value(headers, USER_NAME_HEADER).unwrap_or(user_id);
    let email = header_value(headers, USER_EMAIL_HEADER).map(str::to_owned);

    let identity = UserIdentity::new(user_id, display_name, email);
    Ok(match bearer_token(headers) {
        Some(token) => identity.with_access_token(token),
        None => identity,
    })
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
