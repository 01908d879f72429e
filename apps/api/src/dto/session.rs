use beauty_control_core::UserIdentity;
use serde::Serialize;
use ts_rs::TS;

/// Signed-in user as stored in the session.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/session-user-response.ts"
)]
pub struct SessionUserResponse {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
    pub has_access_token: bool,
}

impl From<&UserIdentity> for SessionUserResponse {
    fn from(value: &UserIdentity) -> Self {
        Self {
            user_id: value.user_id().to_owned(),
            display_name: value.display_name().to_owned(),
            email: value.email().map(str::to_owned),
            has_access_token: value.access_token().is_some(),
        }
    }
}
