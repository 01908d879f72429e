use tracing::info;

use super::*;

impl BusinessAccessService {
    /// Confirms whether a user may act within a business.
    ///
    /// `user_id` defaults to the session user. A fresh cached grant is
    /// returned without contacting the backend. Failures never escape as
    /// errors: they resolve to [`AccessValidation::Denied`] and are recorded
    /// in [`BusinessAccessErrors::validation`].
    pub async fn validate_access(
        &self,
        business_id: &BusinessId,
        user_id: Option<&str>,
    ) -> AccessValidation {
        let user_id = user_id.unwrap_or(self.user.user_id()).to_owned();
        let key = self.cache_key(business_id, user_id.as_str());
        let ticket = self.begin_validation(business_id, false).await;

        match self.cache.get_grant(&key).await {
            Ok(Some(grant)) => {
                debug!(cache_key = %key, "business access cache hit");
                self.commit_granted(ticket, grant.clone()).await;
                return AccessValidation::Granted(grant);
            }
            Ok(None) => debug!(cache_key = %key, "business access cache miss"),
            Err(error) => warn!(
                cache_key = %key,
                error = %error,
                "business access cache read failed"
            ),
        }

        match self
            .gateway
            .validate_access(business_id, user_id.as_str())
            .await
        {
            Ok(grant) if grant.has_access => {
                self.store_in_cache(ticket, key, &grant).await;
                self.commit_granted(ticket, grant.clone()).await;
                AccessValidation::Granted(grant)
            }
            Ok(_) => {
                let reason = format!("access to business '{business_id}' was denied");
                self.commit_denied(ticket, business_id, reason.clone()).await;
                AccessValidation::Denied {
                    business_id: business_id.clone(),
                    reason,
                }
            }
            Err(error) => {
                warn!(
                    business_id = %business_id,
                    user_id = %user_id,
                    error = %error,
                    "business access validation failed"
                );
                let reason = error.to_string();
                self.commit_denied(ticket, business_id, reason.clone()).await;
                AccessValidation::Denied {
                    business_id: business_id.clone(),
                    reason,
                }
            }
        }
    }

    /// Fetches every business the session user may access.
    ///
    /// When no business is active yet, the first result becomes active.
    pub async fn list_accessible_businesses(&self) -> AppResult<Vec<BusinessAccessGrant>> {
        let ticket = self.issue_ticket();

        match self.gateway.list_accessible_businesses().await {
            Ok(grants) => {
                let mut state = self.state.write().await;
                if state.predates_clear(ticket) {
                    debug!(ticket, "discarding business listing issued before logout");
                    return Ok(grants);
                }

                state.accessible = grants.clone();
                state.errors.list = None;

                if state.active.is_none()
                    && !state.overtaken_by_switch(ticket)
                    && let Some(first) = grants.first()
                {
                    info!(
                        business_id = %first.business_id,
                        user_id = %self.user.user_id(),
                        "auto-selected first accessible business"
                    );
                    state.active = Some(ActiveBusiness::from(first.clone()));
                }

                Ok(grants)
            }
            Err(error) => {
                warn!(
                    user_id = %self.user.user_id(),
                    error = %error,
                    "failed to list accessible businesses"
                );
                let mut state = self.state.write().await;
                if !state.predates_clear(ticket) {
                    state.errors.list = Some(error.to_string());
                }
                Err(error)
            }
        }
    }

    async fn commit_granted(&self, ticket: u64, grant: BusinessAccessGrant) {
        let mut state = self.state.write().await;
        if state.predates_clear(ticket) {
            debug!(
                business_id = %grant.business_id,
                ticket,
                "discarding validation issued before logout"
            );
            return;
        }

        state
            .validations
            .insert(grant.business_id.clone(), ValidationState::Granted);
        state.errors.validation = None;

        let replaces_active =
            state.active.is_none() || state.is_active_business(&grant.business_id);
        if !replaces_active {
            return;
        }

        if state.overtaken_by_switch(ticket) {
            debug!(
                business_id = %grant.business_id,
                ticket,
                "discarding business access validation overtaken by a switch"
            );
        } else {
            state.active = Some(ActiveBusiness::from(grant));
        }
    }

    async fn commit_denied(&self, ticket: u64, business_id: &BusinessId, reason: String) {
        let mut state = self.state.write().await;
        if state.predates_clear(ticket) {
            debug!(
                business_id = %business_id,
                ticket,
                "discarding denial issued before logout"
            );
            return;
        }

        state
            .validations
            .insert(business_id.clone(), ValidationState::Denied);
        state.errors.validation = Some(reason);

        if !state.is_active_business(business_id) {
            return;
        }

        if state.overtaken_by_switch(ticket) {
            debug!(
                business_id = %business_id,
                ticket,
                "discarding business access denial overtaken by a switch"
            );
        } else if let Some(active) = state.active.as_mut() {
            active.revoke_access();
        }
    }
}
