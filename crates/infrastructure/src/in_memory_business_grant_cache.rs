use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use beauty_control_application::{BusinessGrantCache, Clock};
use beauty_control_core::{AppResult, BusinessId};
use beauty_control_domain::{BusinessAccessGrant, BusinessAccessKey};
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::RwLock;

use crate::SystemClock;

#[derive(Debug, Clone)]
struct GrantCacheEntry {
    grant: BusinessAccessGrant,
    expires_at: DateTime<Utc>,
}

/// In-memory cache adapter for business access grants.
///
/// Expired entries are removed lazily on read.
pub struct InMemoryBusinessGrantCache {
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<BusinessAccessKey, GrantCacheEntry>>,
}

impl Default for InMemoryBusinessGrantCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBusinessGrantCache {
    /// Creates an empty cache driven by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache driven by the given clock.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns whether nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl BusinessGrantCache for InMemoryBusinessGrantCache {
    async fn get_grant(&self, key: &BusinessAccessKey) -> AppResult<Option<BusinessAccessGrant>> {
        let now = self.clock.now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.grant.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|entry| entry.expires_at <= now)
        {
            entries.remove(key);
        }

        Ok(None)
    }

    async fn set_grant(
        &self,
        key: BusinessAccessKey,
        grant: BusinessAccessGrant,
        ttl_seconds: u32,
    ) -> AppResult<()> {
        if ttl_seconds == 0 {
            return Ok(());
        }

        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(TimeDelta::seconds(i64::from(ttl_seconds)))
            .unwrap_or(now);

        self.entries
            .write()
            .await
            .insert(key, GrantCacheEntry { grant, expires_at });

        Ok(())
    }

    async fn invalidate_business(&self, business_id: &BusinessId) -> AppResult<usize> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with_business(business_id));
        Ok(before - entries.len())
    }

    async fn clear(&self) -> AppResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use beauty_control_application::{
        BusinessAccessGateway, BusinessAccessService, BusinessGrantCache, Clock,
    };
    use beauty_control_core::{AppResult, BusinessId, UserIdentity};
    use beauty_control_domain::{BusinessAccessGrant, BusinessAccessKey, Permission, Role};
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    use super::InMemoryBusinessGrantCache;

    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn starting_at(now: DateTime<Utc>) -> Self {
            Self {
                now: Mutex::new(now),
            }
        }

        fn advance(&self, delta: TimeDelta) {
            if let Ok(mut now) = self.now.lock() {
                *now += delta;
            }
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            self.now
                .lock()
                .map(|now| *now)
                .unwrap_or_else(|_| unreachable!())
        }
    }

    #[derive(Default)]
    struct CountingGateway {
        validate_calls: AtomicUsize,
    }

    #[async_trait]
    impl BusinessAccessGateway for CountingGateway {
        async fn validate_access(
            &self,
            business_id: &BusinessId,
            _user_id: &str,
        ) -> AppResult<BusinessAccessGrant> {
            self.validate_calls.fetch_add(1, Ordering::SeqCst);
            Ok(grant(business_id.as_str()))
        }

        async fn list_accessible_businesses(&self) -> AppResult<Vec<BusinessAccessGrant>> {
            Ok(Vec::new())
        }

        async fn check_permission(
            &self,
            _business_id: &BusinessId,
            _permission: Permission,
        ) -> AppResult<bool> {
            Ok(false)
        }
    }

    fn business_id(value: &str) -> BusinessId {
        BusinessId::new(value).unwrap_or_else(|_| unreachable!())
    }

    fn key(business: &str, user: &str) -> BusinessAccessKey {
        BusinessAccessKey::new(business_id(business), user)
    }

    fn grant(business: &str) -> BusinessAccessGrant {
        BusinessAccessGrant {
            business_id: business_id(business),
            business_name: Some("Studio Bela".to_owned()),
            has_access: true,
            role: Role::Receptionist,
            permissions: vec![Permission::AppointmentView, Permission::ClientView],
            is_owner: false,
        }
    }

    fn manual_cache() -> (Arc<ManualClock>, InMemoryBusinessGrantCache) {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 2, 9, 0, 0)
            .single()
            .unwrap_or_else(|| unreachable!());
        let clock = Arc::new(ManualClock::starting_at(start));
        let cache = InMemoryBusinessGrantCache::with_clock(clock.clone());
        (clock, cache)
    }

    #[tokio::test]
    async fn grant_is_served_until_ttl_elapses() {
        let (clock, cache) = manual_cache();
        let stored = cache.set_grant(key("b1", "u1"), grant("b1"), 300).await;
        assert!(stored.is_ok());

        clock.advance(TimeDelta::minutes(4));
        let hit = cache.get_grant(&key("b1", "u1")).await;
        assert_eq!(hit.ok().flatten(), Some(grant("b1")));

        clock.advance(TimeDelta::minutes(2));
        let miss = cache.get_grant(&key("b1", "u1")).await;
        assert_eq!(miss.ok().flatten(), None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn validator_refetches_once_cached_grant_expires() {
        let (clock, cache) = manual_cache();
        let gateway = Arc::new(CountingGateway::default());
        let service = BusinessAccessService::new(
            UserIdentity::new("u1", "Ana", None),
            gateway.clone(),
            Arc::new(cache),
        );
        let b1 = business_id("b1");

        assert!(service.validate_access(&b1, None).await.is_granted());
        assert_eq!(gateway.validate_calls.load(Ordering::SeqCst), 1);

        clock.advance(TimeDelta::minutes(4));
        assert!(service.validate_access(&b1, None).await.is_granted());
        assert_eq!(gateway.validate_calls.load(Ordering::SeqCst), 1);

        clock.advance(TimeDelta::minutes(2));
        assert!(service.validate_access(&b1, None).await.is_granted());
        assert_eq!(gateway.validate_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_ttl_stores_nothing() {
        let (_, cache) = manual_cache();
        let stored = cache.set_grant(key("b1", "u1"), grant("b1"), 0).await;

        assert!(stored.is_ok());
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn invalidation_removes_every_user_of_one_business() {
        let (_, cache) = manual_cache();
        for (business, user) in [("b1", "u1"), ("b1", "u2"), ("b2", "u1")] {
            let stored = cache.set_grant(key(business, user), grant(business), 300).await;
            assert!(stored.is_ok());
        }

        let removed = cache.invalidate_business(&business_id("b1")).await;

        assert_eq!(removed.unwrap_or_default(), 2);
        assert_eq!(cache.len().await, 1);
        let remaining = cache.get_grant(&key("b2", "u1")).await;
        assert!(remaining.ok().flatten().is_some());
    }

    #[tokio::test]
    async fn clear_drops_everything() {
        let (_, cache) = manual_cache();
        let stored = cache.set_grant(key("b1", "u1"), grant("b1"), 300).await;
        assert!(stored.is_ok());

        assert!(cache.clear().await.is_ok());
        assert!(cache.is_empty().await);
    }
}
