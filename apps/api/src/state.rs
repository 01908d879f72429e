use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use beauty_control_application::{BusinessAccessGateway, BusinessAccessService};
use beauty_control_core::{AppResult, UserIdentity};
use beauty_control_infrastructure::InMemoryBusinessGrantCache;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::middleware::SessionUser;

/// Builds the backend gateway for one signed-in user.
pub type GatewayFactory = Arc<dyn Fn(&UserIdentity) -> Arc<dyn BusinessAccessGateway> + Send + Sync>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub business_sessions: Arc<BusinessSessionRegistry>,
}

struct BusinessSession {
    service: BusinessAccessService,
    last_seen: Instant,
}

/// Business-access validators keyed by HTTP session id.
///
/// Entries idle for longer than the session inactivity window are evicted,
/// so a validator never outlives its session cookie.
pub struct BusinessSessionRegistry {
    gateway_factory: GatewayFactory,
    cache_ttl_seconds: u32,
    idle_timeout: Duration,
    sessions: Mutex<HashMap<String, BusinessSession>>,
}

impl BusinessSessionRegistry {
    pub fn new(
        gateway_factory: GatewayFactory,
        cache_ttl_seconds: u32,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            gateway_factory,
            cache_ttl_seconds,
            idle_timeout,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the session's validator, creating it on first use.
    pub async fn session_for(&self, user: &SessionUser) -> BusinessAccessService {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        let before = sessions.len();
        sessions.retain(|_, session| {
            now.duration_since(session.last_seen) <= self.idle_timeout
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, "evicted idle business access sessions");
        }

        if let Some(session) = sessions.get_mut(user.session_id.as_str()) {
            session.last_seen = now;
            return session.service.clone();
        }

        let service = BusinessAccessService::new(
            user.identity.clone(),
            (self.gateway_factory)(&user.identity),
            Arc::new(InMemoryBusinessGrantCache::new()),
        )
        .with_cache_ttl_seconds(self.cache_ttl_seconds);

        sessions.insert(
            user.session_id.clone(),
            BusinessSession {
                service: service.clone(),
                last_seen: now,
            },
        );
        debug!(user_id = %user.identity.user_id(), "opened business access session");

        service
    }

    /// Clears and forgets the session's validator. Returns whether one existed.
    pub async fn end_session(&self, session_id: &str) -> AppResult<bool> {
        let removed = self.sessions.lock().await.remove(session_id);
        let Some(session) = removed else {
            return Ok(false);
        };

        session.service.clear_active_business().await?;
        info!(
            user_id = %session.service.user().user_id(),
            "closed business access session"
        );
        Ok(true)
    }

    #[cfg(test)]
    pub async fn session_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
