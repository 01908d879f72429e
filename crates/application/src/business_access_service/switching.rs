use tracing::info;

use super::*;

impl BusinessAccessService {
    /// Makes a business the active one after re-validating access.
    ///
    /// Always asks the backend; a cached grant is never trusted for a
    /// switch. On failure the previous active business is left untouched
    /// and the error is recorded in [`BusinessAccessErrors::switch`]. A
    /// switch overtaken by a later switch or a logout returns
    /// [`AppError::Conflict`]. Plain validations never overtake a switch.
    pub async fn switch_active_business(
        &self,
        business_id: &BusinessId,
    ) -> AppResult<BusinessAccessGrant> {
        let user_id = self.user.user_id();
        let key = self.cache_key(business_id, user_id);
        let ticket = self.begin_validation(business_id, true).await;

        let grant = match self.gateway.validate_access(business_id, user_id).await {
            Ok(grant) if grant.has_access => grant,
            Ok(_) => {
                let error =
                    AppError::Forbidden(format!("access to business '{business_id}' was denied"));
                self.record_switch_failure(ticket, business_id, &error).await;
                return Err(error);
            }
            Err(error) => {
                self.record_switch_failure(ticket, business_id, &error).await;
                return Err(error);
            }
        };

        self.store_in_cache(ticket, key, &grant).await;

        let mut state = self.state.write().await;
        if state.predates_clear(ticket) || !state.is_latest_switch(ticket) {
            debug!(
                business_id = %business_id,
                ticket,
                "discarding superseded business switch"
            );
            let error = AppError::Conflict(format!(
                "switch to business '{business_id}' was superseded by a newer request"
            ));
            if !state.predates_clear(ticket) {
                if state.validations.get(business_id) == Some(&ValidationState::Validating) {
                    state
                        .validations
                        .insert(business_id.clone(), ValidationState::Idle);
                }
                state.errors.switch = Some(error.to_string());
            }
            return Err(error);
        }

        state
            .validations
            .insert(business_id.clone(), ValidationState::Granted);
        let previous = state
            .active
            .as_ref()
            .map(|active| active.business_id.to_string());
        state.active = Some(ActiveBusiness::from(grant.clone()));
        state.errors.switch = None;

        info!(
            business_id = %business_id,
            previous_business_id = previous.as_deref().unwrap_or("none"),
            user_id = %user_id,
            "switched active business"
        );

        Ok(grant)
    }

    /// Asks the backend whether a business-scoped permission is allowed.
    ///
    /// Failures are recorded and resolve to `false`.
    pub async fn check_permission(&self, business_id: &BusinessId, permission: Permission) -> bool {
        let ticket = self.issue_ticket();
        let outcome = self.gateway.check_permission(business_id, permission).await;

        let mut state = self.state.write().await;
        let record = !state.predates_clear(ticket);
        match outcome {
            Ok(allowed) => {
                if record {
                    state.errors.permission = None;
                }
                allowed
            }
            Err(error) => {
                warn!(
                    business_id = %business_id,
                    permission = %permission,
                    error = %error,
                    "business permission check failed"
                );
                if record {
                    state.errors.permission = Some(error.to_string());
                }
                false
            }
        }
    }

    /// Drops every cached grant of a business.
    pub async fn invalidate_business_cache(&self, business_id: &BusinessId) -> AppResult<usize> {
        let removed = self.cache.invalidate_business(business_id).await?;
        debug!(business_id = %business_id, removed, "invalidated business access cache");
        Ok(removed)
    }

    /// Forgets the active business, every validation result and the whole
    /// grant cache. Called on logout.
    ///
    /// Responses still in flight are discarded when they resolve: they
    /// neither change session state nor reach the cache.
    pub async fn clear_active_business(&self) -> AppResult<()> {
        {
            let mut state = self.state.write().await;
            let last_issued = self.next_ticket.load(Ordering::SeqCst);
            *state = SessionState {
                latest_switch_ticket: last_issued,
                cleared_through_ticket: last_issued,
                ..SessionState::default()
            };
        }

        self.cache.clear().await?;
        info!(user_id = %self.user.user_id(), "cleared active business");
        Ok(())
    }

    async fn record_switch_failure(
        &self,
        ticket: u64,
        business_id: &BusinessId,
        error: &AppError,
    ) {
        warn!(
            business_id = %business_id,
            user_id = %self.user.user_id(),
            error = %error,
            "business switch rejected"
        );

        let mut state = self.state.write().await;
        if state.predates_clear(ticket) {
            return;
        }

        state
            .validations
            .insert(business_id.clone(), ValidationState::Denied);
        state.errors.switch = Some(error.to_string());
    }
}
