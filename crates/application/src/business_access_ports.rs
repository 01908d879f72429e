use async_trait::async_trait;
use beauty_control_core::{AppResult, BusinessId};
use beauty_control_domain::{BusinessAccessGrant, BusinessAccessKey, Permission};
use chrono::{DateTime, Utc};

/// Default lifetime of a cached business access grant.
pub const BUSINESS_ACCESS_CACHE_TTL_SECONDS: u32 = 300;

/// Backend port answering tenant access questions for the session user.
#[async_trait]
pub trait BusinessAccessGateway: Send + Sync {
    /// Asks the backend whether the user may act within the business.
    ///
    /// A well-formed "no access" answer is `Ok` with `has_access = false`;
    /// `Err` is reserved for transport and backend failures.
    async fn validate_access(
        &self,
        business_id: &BusinessId,
        user_id: &str,
    ) -> AppResult<BusinessAccessGrant>;

    /// Lists every business the session user may access.
    async fn list_accessible_businesses(&self) -> AppResult<Vec<BusinessAccessGrant>>;

    /// Asks the backend whether a business-scoped permission is allowed.
    async fn check_permission(
        &self,
        business_id: &BusinessId,
        permission: Permission,
    ) -> AppResult<bool>;
}

/// Cache port for resolved business access grants.
#[async_trait]
pub trait BusinessGrantCache: Send + Sync {
    /// Returns a grant that has not expired yet.
    async fn get_grant(&self, key: &BusinessAccessKey) -> AppResult<Option<BusinessAccessGrant>>;

    /// Stores a grant with ttl.
    async fn set_grant(
        &self,
        key: BusinessAccessKey,
        grant: BusinessAccessGrant,
        ttl_seconds: u32,
    ) -> AppResult<()>;

    /// Removes every grant of a business and returns how many were removed.
    async fn invalidate_business(&self, business_id: &BusinessId) -> AppResult<usize>;

    /// Removes every grant.
    async fn clear(&self) -> AppResult<()>;
}

/// Time source used for cache expiry.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}
