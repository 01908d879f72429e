use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use beauty_control_core::{AppError, AppResult, BusinessId, UserIdentity};
use beauty_control_domain::{BusinessAccessGrant, BusinessAccessKey, Permission, Role};
use tokio::sync::{Mutex, Notify};

use crate::{BusinessAccessGateway, BusinessGrantCache};

use super::{AccessValidation, BusinessAccessService, ValidationState};

#[derive(Clone)]
enum FakeResponse {
    Grant(BusinessAccessGrant),
    Fail(&'static str),
}

#[derive(Default)]
struct FakeGateway {
    responses: Mutex<HashMap<BusinessId, FakeResponse>>,
    accessible: Mutex<Option<Vec<BusinessAccessGrant>>>,
    allowed: Mutex<HashMap<(BusinessId, Permission), bool>>,
    gates: HashMap<BusinessId, Arc<Notify>>,
    listing_gate: Option<Arc<Notify>>,
    validate_calls: AtomicUsize,
}

impl FakeGateway {
    async fn respond(&self, business_id: &BusinessId, response: FakeResponse) {
        self.responses
            .lock()
            .await
            .insert(business_id.clone(), response);
    }

    fn calls(&self) -> usize {
        self.validate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BusinessAccessGateway for FakeGateway {
    async fn validate_access(
        &self,
        business_id: &BusinessId,
        _user_id: &str,
    ) -> AppResult<BusinessAccessGrant> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = self.gates.get(business_id) {
            gate.notified().await;
        }

        match self.responses.lock().await.get(business_id).cloned() {
            Some(FakeResponse::Grant(grant)) => Ok(grant),
            Some(FakeResponse::Fail(message)) => Err(AppError::Internal(message.to_owned())),
            None => Err(AppError::NotFound(format!("business '{business_id}'"))),
        }
    }

    async fn list_accessible_businesses(&self) -> AppResult<Vec<BusinessAccessGrant>> {
        if let Some(gate) = &self.listing_gate {
            gate.notified().await;
        }

        self.accessible
            .lock()
            .await
            .clone()
            .ok_or_else(|| AppError::Internal("listing unavailable".to_owned()))
    }

    async fn check_permission(
        &self,
        business_id: &BusinessId,
        permission: Permission,
    ) -> AppResult<bool> {
        self.allowed
            .lock()
            .await
            .get(&(business_id.clone(), permission))
            .copied()
            .ok_or_else(|| AppError::Forbidden("permission check rejected".to_owned()))
    }
}

#[derive(Default)]
struct FakeGrantCache {
    entries: Mutex<HashMap<String, BusinessAccessGrant>>,
    write_gate: Option<Arc<Notify>>,
}

#[async_trait]
impl BusinessGrantCache for FakeGrantCache {
    async fn get_grant(&self, key: &BusinessAccessKey) -> AppResult<Option<BusinessAccessGrant>> {
        Ok(self.entries.lock().await.get(&key.to_string()).cloned())
    }

    async fn set_grant(
        &self,
        key: BusinessAccessKey,
        grant: BusinessAccessGrant,
        _ttl_seconds: u32,
    ) -> AppResult<()> {
        if let Some(gate) = &self.write_gate {
            gate.notified().await;
        }

        self.entries.lock().await.insert(key.to_string(), grant);
        Ok(())
    }

    async fn invalidate_business(&self, business_id: &BusinessId) -> AppResult<usize> {
        let prefix = BusinessAccessKey::business_prefix(business_id);
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix.as_str()));
        Ok(before - entries.len())
    }

    async fn clear(&self) -> AppResult<()> {
        self.entries.lock().await.clear();
        Ok(())
    }
}

fn business_id(value: &str) -> BusinessId {
    BusinessId::new(value).unwrap_or_else(|_| unreachable!())
}

fn grant(id: &str, name: &str, has_access: bool) -> BusinessAccessGrant {
    BusinessAccessGrant {
        business_id: business_id(id),
        business_name: Some(name.to_owned()),
        has_access,
        role: Role::Business,
        permissions: vec![Permission::BusinessView, Permission::AppointmentView],
        is_owner: true,
    }
}

fn build_service(
    gateway: Arc<FakeGateway>,
    cache: Arc<FakeGrantCache>,
) -> BusinessAccessService {
    BusinessAccessService::new(UserIdentity::new("u1", "Ana", None), gateway, cache)
}

#[tokio::test]
async fn first_validation_becomes_active_and_is_cached() {
    let gateway = Arc::new(FakeGateway::default());
    let cache = Arc::new(FakeGrantCache::default());
    let b1 = business_id("b1");
    gateway
        .respond(&b1, FakeResponse::Grant(grant("b1", "Studio Bela", true)))
        .await;
    let service = build_service(gateway.clone(), cache.clone());

    let outcome = service.validate_access(&b1, None).await;

    assert!(outcome.is_granted());
    let active = service.active_business().await;
    assert_eq!(active.map(|active| active.business_id), Some(b1.clone()));
    assert_eq!(service.validation_state(&b1).await, ValidationState::Granted);
    assert!(cache.entries.lock().await.contains_key("b1-u1"));
}

#[tokio::test]
async fn repeated_validation_is_served_from_cache() {
    let gateway = Arc::new(FakeGateway::default());
    let b1 = business_id("b1");
    gateway
        .respond(&b1, FakeResponse::Grant(grant("b1", "Studio Bela", true)))
        .await;
    let service = build_service(gateway.clone(), Arc::new(FakeGrantCache::default()));

    let first = service.validate_access(&b1, None).await;
    let second = service.validate_access(&b1, None).await;

    assert_eq!(first, second);
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn explicit_user_id_is_used_for_the_cache_key() {
    let gateway = Arc::new(FakeGateway::default());
    let cache = Arc::new(FakeGrantCache::default());
    let b1 = business_id("b1");
    gateway
        .respond(&b1, FakeResponse::Grant(grant("b1", "Studio Bela", true)))
        .await;
    let service = build_service(gateway, cache.clone());

    let outcome = service.validate_access(&b1, Some("u9")).await;

    assert!(outcome.is_granted());
    assert!(cache.entries.lock().await.contains_key("b1-u9"));
    assert!(!cache.entries.lock().await.contains_key("b1-u1"));
}

#[tokio::test]
async fn validating_another_business_keeps_active_one() {
    let gateway = Arc::new(FakeGateway::default());
    let b1 = business_id("b1");
    let b2 = business_id("b2");
    gateway
        .respond(&b1, FakeResponse::Grant(grant("b1", "Studio Bela", true)))
        .await;
    gateway
        .respond(&b2, FakeResponse::Grant(grant("b2", "Barbearia Norte", true)))
        .await;
    let service = build_service(gateway, Arc::new(FakeGrantCache::default()));

    assert!(service.validate_access(&b1, None).await.is_granted());
    assert!(service.validate_access(&b2, None).await.is_granted());

    let active = service.active_business().await;
    assert_eq!(active.map(|active| active.business_id), Some(b1));
    assert_eq!(service.validation_state(&b2).await, ValidationState::Granted);
}

#[tokio::test]
async fn denial_revokes_access_but_keeps_identity() {
    let gateway = Arc::new(FakeGateway::default());
    let b1 = business_id("b1");
    gateway
        .respond(&b1, FakeResponse::Grant(grant("b1", "Studio Bela", true)))
        .await;
    let service = build_service(gateway.clone(), Arc::new(FakeGrantCache::default()));
    assert!(service.validate_access(&b1, None).await.is_granted());

    gateway
        .respond(&b1, FakeResponse::Grant(grant("b1", "Studio Bela", false)))
        .await;
    let removed = service.invalidate_business_cache(&b1).await;
    assert_eq!(removed.unwrap_or_default(), 1);

    let outcome = service.validate_access(&b1, None).await;

    assert!(matches!(outcome, AccessValidation::Denied { .. }));
    let active = service.active_business().await;
    assert!(active.is_some());
    let active = active.unwrap_or_else(|| unreachable!());
    assert!(!active.has_access);
    assert_eq!(active.business_id, b1);
    assert_eq!(active.business_name.as_deref(), Some("Studio Bela"));
    assert_eq!(service.validation_state(&b1).await, ValidationState::Denied);
    assert!(service.errors().await.validation.is_some());
    assert!(!service.active_business_allows(Permission::BusinessView).await);
}

#[tokio::test]
async fn backend_failure_resolves_to_denial() {
    let gateway = Arc::new(FakeGateway::default());
    let b1 = business_id("b1");
    gateway.respond(&b1, FakeResponse::Fail("timeout")).await;
    let service = build_service(gateway, Arc::new(FakeGrantCache::default()));

    let outcome = service.validate_access(&b1, None).await;

    assert!(!outcome.is_granted());
    assert!(outcome.clone().into_result().is_err());
    assert!(service.active_business().await.is_none());
    let errors = service.errors().await;
    assert_eq!(
        errors.validation.as_deref(),
        Some("internal error: timeout")
    );
}

#[tokio::test]
async fn listing_auto_selects_first_business_only_once() {
    let gateway = Arc::new(FakeGateway::default());
    *gateway.accessible.lock().await = Some(vec![
        grant("b1", "Studio Bela", true),
        grant("b2", "Barbearia Norte", true),
    ]);
    let b2 = business_id("b2");
    gateway
        .respond(&b2, FakeResponse::Grant(grant("b2", "Barbearia Norte", true)))
        .await;
    let service = build_service(gateway, Arc::new(FakeGrantCache::default()));

    let listed = service.list_accessible_businesses().await;
    assert_eq!(listed.map(|grants| grants.len()).unwrap_or_default(), 2);
    let active = service.active_business().await;
    assert_eq!(
        active.map(|active| active.business_id.to_string()),
        Some("b1".to_owned())
    );

    assert!(service.switch_active_business(&b2).await.is_ok());
    assert!(service.list_accessible_businesses().await.is_ok());
    let active = service.active_business().await;
    assert_eq!(active.map(|active| active.business_id), Some(b2));
    assert_eq!(service.accessible_businesses().await.len(), 2);
}

#[tokio::test]
async fn listing_failure_is_recorded() {
    let gateway = Arc::new(FakeGateway::default());
    let service = build_service(gateway, Arc::new(FakeGrantCache::default()));

    let listed = service.list_accessible_businesses().await;

    assert!(listed.is_err());
    assert!(service.errors().await.list.is_some());
    assert!(service.active_business().await.is_none());
}

#[tokio::test]
async fn switch_always_revalidates_with_backend() {
    let gateway = Arc::new(FakeGateway::default());
    let cache = Arc::new(FakeGrantCache::default());
    let b1 = business_id("b1");
    cache
        .entries
        .lock()
        .await
        .insert("b1-u1".to_owned(), grant("b1", "Studio Bela", true));
    gateway
        .respond(&b1, FakeResponse::Grant(grant("b1", "Studio Bela", true)))
        .await;
    let service = build_service(gateway.clone(), cache);

    let switched = service.switch_active_business(&b1).await;

    assert!(switched.is_ok());
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn failed_switch_keeps_previous_active_business() {
    let gateway = Arc::new(FakeGateway::default());
    let b1 = business_id("b1");
    let b2 = business_id("b2");
    gateway
        .respond(&b1, FakeResponse::Grant(grant("b1", "Studio Bela", true)))
        .await;
    gateway
        .respond(&b2, FakeResponse::Grant(grant("b2", "Barbearia Norte", false)))
        .await;
    let service = build_service(gateway, Arc::new(FakeGrantCache::default()));
    assert!(service.switch_active_business(&b1).await.is_ok());

    let switched = service.switch_active_business(&b2).await;

    assert!(matches!(switched, Err(AppError::Forbidden(_))));
    let active = service.active_business().await;
    assert_eq!(active.as_ref().map(|active| &active.business_id), Some(&b1));
    assert!(active.is_some_and(|active| active.has_access));
    assert!(service.errors().await.switch.is_some());
    assert_eq!(service.validation_state(&b2).await, ValidationState::Denied);
}

#[tokio::test]
async fn superseded_switch_does_not_overwrite_newer_one() {
    let slow_gate = Arc::new(Notify::new());
    let b1 = business_id("b1");
    let b2 = business_id("b2");
    let gateway = Arc::new(FakeGateway {
        gates: HashMap::from([(b1.clone(), slow_gate.clone())]),
        ..FakeGateway::default()
    });
    gateway
        .respond(&b1, FakeResponse::Grant(grant("b1", "Studio Bela", true)))
        .await;
    gateway
        .respond(&b2, FakeResponse::Grant(grant("b2", "Barbearia Norte", true)))
        .await;
    let service = build_service(gateway, Arc::new(FakeGrantCache::default()));

    let slow = service.switch_active_business(&b1);
    let fast = async {
        let result = service.switch_active_business(&b2).await;
        slow_gate.notify_one();
        result
    };
    let (slow_result, fast_result) = tokio::join!(slow, fast);

    assert!(fast_result.is_ok());
    assert!(matches!(slow_result, Err(AppError::Conflict(_))));
    let active = service.active_business().await;
    assert_eq!(active.map(|active| active.business_id), Some(b2));
    assert!(service.errors().await.switch.is_some());
    assert_ne!(service.validation_state(&b1).await, ValidationState::Granted);
}

#[tokio::test]
async fn revalidation_during_switch_does_not_cancel_it() {
    let switch_gate = Arc::new(Notify::new());
    let b1 = business_id("b1");
    let b2 = business_id("b2");
    let gateway = Arc::new(FakeGateway {
        gates: HashMap::from([(b2.clone(), switch_gate.clone())]),
        ..FakeGateway::default()
    });
    gateway
        .respond(&b1, FakeResponse::Grant(grant("b1", "Studio Bela", true)))
        .await;
    gateway
        .respond(&b2, FakeResponse::Grant(grant("b2", "Barbearia Norte", true)))
        .await;
    let service = build_service(gateway, Arc::new(FakeGrantCache::default()));
    assert!(service.validate_access(&b1, None).await.is_granted());

    let switch = service.switch_active_business(&b2);
    let revalidate = async {
        let outcome = service.validate_access(&b1, None).await;
        switch_gate.notify_one();
        outcome
    };
    let (switched, revalidated) = tokio::join!(switch, revalidate);

    assert!(revalidated.is_granted());
    assert!(switched.is_ok());
    let active = service.active_business().await;
    assert_eq!(active.map(|active| active.business_id), Some(b2.clone()));
    assert_eq!(service.validation_state(&b2).await, ValidationState::Granted);
    assert!(service.errors().await.switch.is_none());
}

#[tokio::test]
async fn validation_started_before_switch_cannot_replace_it() {
    let stale_gate = Arc::new(Notify::new());
    let b1 = business_id("b1");
    let b2 = business_id("b2");
    let gateway = Arc::new(FakeGateway {
        gates: HashMap::from([(b1.clone(), stale_gate.clone())]),
        ..FakeGateway::default()
    });
    gateway
        .respond(&b1, FakeResponse::Grant(grant("b1", "Studio Bela", true)))
        .await;
    gateway
        .respond(&b2, FakeResponse::Grant(grant("b2", "Barbearia Norte", true)))
        .await;
    let service = build_service(gateway, Arc::new(FakeGrantCache::default()));

    let stale = service.validate_access(&b1, None);
    let switch = async {
        let result = service.switch_active_business(&b2).await;
        stale_gate.notify_one();
        result
    };
    let (stale_outcome, switched) = tokio::join!(stale, switch);

    assert!(stale_outcome.is_granted());
    assert!(switched.is_ok());
    let active = service.active_business().await;
    assert_eq!(active.map(|active| active.business_id), Some(b2));
}

#[tokio::test]
async fn response_arriving_after_logout_is_discarded() {
    let slow_gate = Arc::new(Notify::new());
    let b1 = business_id("b1");
    let gateway = Arc::new(FakeGateway {
        gates: HashMap::from([(b1.clone(), slow_gate.clone())]),
        ..FakeGateway::default()
    });
    gateway
        .respond(&b1, FakeResponse::Grant(grant("b1", "Studio Bela", true)))
        .await;
    let cache = Arc::new(FakeGrantCache::default());
    let service = build_service(gateway, cache.clone());

    let pending = service.validate_access(&b1, None);
    let logout = async {
        let cleared = service.clear_active_business().await;
        slow_gate.notify_one();
        cleared
    };
    let (outcome, cleared) = tokio::join!(pending, logout);

    assert!(cleared.is_ok());
    assert!(outcome.is_granted());
    assert!(service.active_business().await.is_none());
    assert_eq!(service.validation_state(&b1).await, ValidationState::Idle);
    assert!(service.errors().await.validation.is_none());
    assert!(cache.entries.lock().await.is_empty());
}

#[tokio::test]
async fn failure_arriving_after_logout_leaves_no_error() {
    let slow_gate = Arc::new(Notify::new());
    let b1 = business_id("b1");
    let gateway = Arc::new(FakeGateway {
        gates: HashMap::from([(b1.clone(), slow_gate.clone())]),
        ..FakeGateway::default()
    });
    gateway.respond(&b1, FakeResponse::Fail("timeout")).await;
    let service = build_service(gateway, Arc::new(FakeGrantCache::default()));

    let pending = service.switch_active_business(&b1);
    let logout = async {
        let cleared = service.clear_active_business().await;
        slow_gate.notify_one();
        cleared
    };
    let (switched, cleared) = tokio::join!(pending, logout);

    assert!(cleared.is_ok());
    assert!(switched.is_err());
    assert_eq!(service.validation_state(&b1).await, ValidationState::Idle);
    assert_eq!(service.errors().await, super::BusinessAccessErrors::default());
}

#[tokio::test]
async fn listing_arriving_after_logout_is_discarded() {
    let listing_gate = Arc::new(Notify::new());
    let gateway = Arc::new(FakeGateway {
        listing_gate: Some(listing_gate.clone()),
        ..FakeGateway::default()
    });
    *gateway.accessible.lock().await = Some(vec![grant("b1", "Studio Bela", true)]);
    let service = build_service(gateway, Arc::new(FakeGrantCache::default()));

    let pending = service.list_accessible_businesses();
    let logout = async {
        let cleared = service.clear_active_business().await;
        listing_gate.notify_one();
        cleared
    };
    let (listed, cleared) = tokio::join!(pending, logout);

    assert!(cleared.is_ok());
    assert_eq!(listed.map(|grants| grants.len()).unwrap_or_default(), 1);
    assert!(service.accessible_businesses().await.is_empty());
    assert!(service.active_business().await.is_none());
}

#[tokio::test]
async fn logout_waits_for_cache_write_in_progress() {
    let write_gate = Arc::new(Notify::new());
    let b1 = business_id("b1");
    let gateway = Arc::new(FakeGateway::default());
    gateway
        .respond(&b1, FakeResponse::Grant(grant("b1", "Studio Bela", true)))
        .await;
    let cache = Arc::new(FakeGrantCache {
        write_gate: Some(write_gate.clone()),
        ..FakeGrantCache::default()
    });
    let service = build_service(gateway, cache.clone());

    let pending = service.validate_access(&b1, None);
    let logout = service.clear_active_business();
    let release = async {
        write_gate.notify_one();
    };
    let (outcome, cleared, ()) = tokio::join!(pending, logout, release);

    assert!(outcome.is_granted());
    assert!(cleared.is_ok());
    assert!(cache.entries.lock().await.is_empty());
    assert!(service.active_business().await.is_none());
}

#[tokio::test]
async fn permission_check_delegates_and_fails_closed() {
    let gateway = Arc::new(FakeGateway::default());
    let b1 = business_id("b1");
    gateway
        .allowed
        .lock()
        .await
        .insert((b1.clone(), Permission::PaymentRefund), true);
    let service = build_service(gateway, Arc::new(FakeGrantCache::default()));

    assert!(service.check_permission(&b1, Permission::PaymentRefund).await);
    assert!(service.errors().await.permission.is_none());

    assert!(!service.check_permission(&b1, Permission::BusinessDelete).await);
    assert!(service.errors().await.permission.is_some());

    service.clear_errors().await;
    assert_eq!(service.errors().await, super::BusinessAccessErrors::default());
}

#[tokio::test]
async fn cache_invalidation_is_scoped_to_one_business() {
    let cache = Arc::new(FakeGrantCache::default());
    {
        let mut entries = cache.entries.lock().await;
        entries.insert("b1-u1".to_owned(), grant("b1", "Studio Bela", true));
        entries.insert("b1-u2".to_owned(), grant("b1", "Studio Bela", true));
        entries.insert("b2-u1".to_owned(), grant("b2", "Barbearia Norte", true));
    }
    let service = build_service(Arc::new(FakeGateway::default()), cache.clone());

    let removed = service.invalidate_business_cache(&business_id("b1")).await;

    assert_eq!(removed.unwrap_or_default(), 2);
    let entries = cache.entries.lock().await;
    assert_eq!(entries.len(), 1);
    assert!(entries.contains_key("b2-u1"));
}

#[tokio::test]
async fn clearing_active_business_wipes_session_and_cache() {
    let gateway = Arc::new(FakeGateway::default());
    let cache = Arc::new(FakeGrantCache::default());
    let b1 = business_id("b1");
    gateway
        .respond(&b1, FakeResponse::Grant(grant("b1", "Studio Bela", true)))
        .await;
    *gateway.accessible.lock().await = Some(vec![grant("b1", "Studio Bela", true)]);
    let service = build_service(gateway, cache.clone());
    assert!(service.validate_access(&b1, None).await.is_granted());
    assert!(service.list_accessible_businesses().await.is_ok());

    let cleared = service.clear_active_business().await;

    assert!(cleared.is_ok());
    assert!(service.active_business().await.is_none());
    assert!(service.accessible_businesses().await.is_empty());
    assert_eq!(service.validation_state(&b1).await, ValidationState::Idle);
    assert!(cache.entries.lock().await.is_empty());
}
