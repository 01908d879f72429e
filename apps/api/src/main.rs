//! Beauty Control API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod sessions;
mod state;

use std::sync::Arc;

use beauty_control_application::BusinessAccessGateway;
use beauty_control_core::{AppError, UserIdentity};
use beauty_control_infrastructure::HttpBusinessAccessGateway;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::api_router::build_router;
use crate::sessions::build_memory_session_layer;
use crate::state::{AppState, BusinessSessionRegistry, GatewayFactory};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let http_client = reqwest::Client::builder()
        .timeout(config.business_api_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;

    let base_url = config.business_api_base_url.clone();
    let gateway_factory: GatewayFactory = Arc::new(move |user: &UserIdentity| {
        let gateway: Arc<dyn BusinessAccessGateway> = Arc::new(
            HttpBusinessAccessGateway::new(http_client.clone(), base_url.clone())
                .with_access_token(user.access_token().map(str::to_owned)),
        );
        gateway
    });

    let app_state = AppState {
        business_sessions: Arc::new(BusinessSessionRegistry::new(
            gateway_factory,
            config.business_access_cache_ttl_seconds,
            config.session_idle_timeout(),
        )),
    };

    let session_layer = build_memory_session_layer(
        config.session_cookie_secure,
        i64::from(config.session_idle_minutes),
    );
    let app = build_router(app_state, &config.frontend_url, session_layer)?;
    let address = config.socket_address()?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(
        %address,
        business_api = %config.business_api_base_url,
        cache_ttl_seconds = config.business_access_cache_ttl_seconds,
        "beauty-control-api listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
