use axum::Json;
use beauty_control_domain::Role;

use crate::dto::RoleCatalogEntryResponse;

pub async fn list_roles_handler() -> Json<Vec<RoleCatalogEntryResponse>> {
    Json(
        Role::all()
            .iter()
            .copied()
            .map(RoleCatalogEntryResponse::from)
            .collect(),
    )
}
