use std::str::FromStr;

use axum::Json;
use axum::extract::Query;
use beauty_control_domain::{Role, UserStatus, visible_navigation};

use crate::dto::{NavigationItemResponse, NavigationQuery};
use crate::error::ApiResult;

pub async fn navigation_handler(
    Query(query): Query<NavigationQuery>,
) -> ApiResult<Json<Vec<NavigationItemResponse>>> {
    let role = Role::from_transport(query.role.as_str())?;
    let status = UserStatus::from_str(query.status.as_str())?;

    Ok(Json(
        visible_navigation(role, status)
            .into_iter()
            .map(NavigationItemResponse::from)
            .collect(),
    ))
}
