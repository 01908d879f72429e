use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use beauty_control_core::{AppError, AppResult, BusinessId, UserIdentity};
use beauty_control_domain::{ActiveBusiness, BusinessAccessGrant, BusinessAccessKey, Permission};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::{BUSINESS_ACCESS_CACHE_TTL_SECONDS, BusinessAccessGateway, BusinessGrantCache};

mod switching;
mod validation;

#[cfg(test)]
mod tests;

/// Lifecycle of one business validation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValidationState {
    /// Never validated in this session.
    #[default]
    Idle,
    /// A validation request is in flight.
    Validating,
    /// The last validation confirmed access.
    Granted,
    /// The last validation denied access or failed.
    Denied,
}

impl ValidationState {
    /// Returns a stable transport value for this state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }
}

/// Last error message per operation, kept for display in the business
/// selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessAccessErrors {
    /// Last access validation failure.
    pub validation: Option<String>,
    /// Last accessible-business listing failure.
    pub list: Option<String>,
    /// Last business switch failure.
    pub switch: Option<String>,
    /// Last business-scoped permission check failure.
    pub permission: Option<String>,
}

/// Result of validating access to a business.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessValidation {
    /// Access was confirmed.
    Granted(BusinessAccessGrant),
    /// Access was refused by the backend or could not be confirmed.
    Denied {
        /// Business that was validated.
        business_id: BusinessId,
        /// Human-readable reason.
        reason: String,
    },
}

impl AccessValidation {
    /// Returns whether access was confirmed.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }

    /// Returns the grant for a confirmed validation.
    #[must_use]
    pub fn grant(&self) -> Option<&BusinessAccessGrant> {
        match self {
            Self::Granted(grant) => Some(grant),
            Self::Denied { .. } => None,
        }
    }

    /// Converts the outcome into a result, mapping denial to
    /// [`AppError::Forbidden`].
    pub fn into_result(self) -> AppResult<BusinessAccessGrant> {
        match self {
            Self::Granted(grant) => Ok(grant),
            Self::Denied { reason, .. } => Err(AppError::Forbidden(reason)),
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    active: Option<ActiveBusiness>,
    accessible: Vec<BusinessAccessGrant>,
    validations: HashMap<BusinessId, ValidationState>,
    errors: BusinessAccessErrors,
    latest_switch_ticket: u64,
    cleared_through_ticket: u64,
}

impl SessionState {
    /// Returns whether a switch was issued after this request.
    fn overtaken_by_switch(&self, ticket: u64) -> bool {
        ticket < self.latest_switch_ticket
    }

    /// Returns whether this switch is still the most recent one.
    fn is_latest_switch(&self, ticket: u64) -> bool {
        ticket == self.latest_switch_ticket
    }

    /// Returns whether the request was issued before the last logout.
    fn predates_clear(&self, ticket: u64) -> bool {
        ticket <= self.cleared_through_ticket
    }

    fn is_active_business(&self, business_id: &BusinessId) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| &active.business_id == business_id)
    }
}

/// Session-scoped validator for multi-tenant business access.
///
/// One instance belongs to one signed-in user. It holds the active business,
/// the accessible-business list, per-business validation states and the last
/// error of each operation. Grants are cached through [`BusinessGrantCache`].
#[derive(Clone)]
pub struct BusinessAccessService {
    user: UserIdentity,
    gateway: Arc<dyn BusinessAccessGateway>,
    cache: Arc<dyn BusinessGrantCache>,
    cache_ttl_seconds: u32,
    state: Arc<RwLock<SessionState>>,
    next_ticket: Arc<AtomicU64>,
}

impl BusinessAccessService {
    /// Creates a validator for the signed-in user with the default cache ttl.
    #[must_use]
    pub fn new(
        user: UserIdentity,
        gateway: Arc<dyn BusinessAccessGateway>,
        cache: Arc<dyn BusinessGrantCache>,
    ) -> Self {
        Self {
            user,
            gateway,
            cache,
            cache_ttl_seconds: BUSINESS_ACCESS_CACHE_TTL_SECONDS,
            state: Arc::new(RwLock::new(SessionState::default())),
            next_ticket: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Overrides the cache ttl. Zero disables caching.
    #[must_use]
    pub fn with_cache_ttl_seconds(mut self, cache_ttl_seconds: u32) -> Self {
        self.cache_ttl_seconds = cache_ttl_seconds;
        self
    }

    /// Returns the signed-in user this validator belongs to.
    #[must_use]
    pub fn user(&self) -> &UserIdentity {
        &self.user
    }

    /// Returns the current active business.
    pub async fn active_business(&self) -> Option<ActiveBusiness> {
        self.state.read().await.active.clone()
    }

    /// Returns the last fetched accessible-business list.
    pub async fn accessible_businesses(&self) -> Vec<BusinessAccessGrant> {
        self.state.read().await.accessible.clone()
    }

    /// Returns the validation state of a business.
    pub async fn validation_state(&self, business_id: &BusinessId) -> ValidationState {
        self.state
            .read()
            .await
            .validations
            .get(business_id)
            .copied()
            .unwrap_or_default()
    }

    /// Returns the last error of each operation.
    pub async fn errors(&self) -> BusinessAccessErrors {
        self.state.read().await.errors.clone()
    }

    /// Clears every stored error.
    pub async fn clear_errors(&self) {
        self.state.write().await.errors = BusinessAccessErrors::default();
    }

    /// Returns whether the active business grant lists the permission.
    ///
    /// Local check only; use [`Self::check_permission`] for the backend's
    /// authoritative answer.
    pub async fn active_business_allows(&self, permission: Permission) -> bool {
        self.state
            .read()
            .await
            .active
            .as_ref()
            .is_some_and(|active| active.has_access && active.permissions.contains(&permission))
    }

    fn issue_ticket(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn cache_key(&self, business_id: &BusinessId, user_id: &str) -> BusinessAccessKey {
        BusinessAccessKey::new(business_id.clone(), user_id)
    }

    /// Issues a ticket and marks the business as validating under one lock.
    async fn begin_validation(&self, business_id: &BusinessId, is_switch: bool) -> u64 {
        let mut state = self.state.write().await;
        let ticket = self.issue_ticket();
        if is_switch {
            state.latest_switch_ticket = ticket;
        }
        state
            .validations
            .insert(business_id.clone(), ValidationState::Validating);
        ticket
    }

    async fn store_in_cache(
        &self,
        ticket: u64,
        key: BusinessAccessKey,
        grant: &BusinessAccessGrant,
    ) {
        let rendered_key = key.to_string();
        // Held until the write completes; logout needs the write lock first.
        let state = self.state.read().await;
        if state.predates_clear(ticket) {
            debug!(cache_key = %rendered_key, "skipping cache write issued before logout");
            return;
        }

        if let Err(error) = self
            .cache
            .set_grant(key, grant.clone(), self.cache_ttl_seconds)
            .await
        {
            warn!(
                cache_key = %rendered_key,
                error = %error,
                "failed to cache business access grant"
            );
        } else {
            debug!(cache_key = %rendered_key, "cached business access grant");
        }
    }
}
