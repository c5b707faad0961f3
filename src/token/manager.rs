//! Token Lifecycle Manager
//!
//! Orchestrates validation, lazy refresh, and mutation of credential
//! records. Every outbound API call site goes through [`get_access_token`]
//! to obtain a currently-valid bearer credential.
//!
//! [`get_access_token`]: TokenLifecycleManager::get_access_token

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::core::HttpTransport;
use crate::error::{AuthError, AuthResult};
use crate::exchange::TokenExchangeClient;
use crate::store::{AccountStore, PendingAuthorizationRegistry};
use crate::token::TokenChangeListener;
use crate::types::{BrokerConfig, CredentialRecord, TokenResponse};

/// Multi-account token lifecycle manager.
///
/// Holds no credential state of its own; [`AccountStore`] is the source of
/// truth. Per-user refresh gates collapse concurrent refreshes for one user
/// into a single network call while leaving other users unblocked.
pub struct TokenLifecycleManager<T: HttpTransport> {
    config: BrokerConfig,
    exchange: TokenExchangeClient<T>,
    accounts: Arc<AccountStore>,
    pending: Arc<PendingAuthorizationRegistry>,
    listener: Option<Arc<dyn TokenChangeListener>>,
    refresh_gates: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<T: HttpTransport> TokenLifecycleManager<T> {
    pub fn new(
        config: BrokerConfig,
        transport: Arc<T>,
        accounts: Arc<AccountStore>,
        pending: Arc<PendingAuthorizationRegistry>,
        listener: Option<Arc<dyn TokenChangeListener>>,
    ) -> Self {
        Self {
            exchange: TokenExchangeClient::new(config.clone(), transport),
            config,
            accounts,
            pending,
            listener,
            refresh_gates: Mutex::new(HashMap::new()),
        }
    }

    /// Fail fast when a user cannot mint access tokens without a new browser
    /// authorization: record missing, refresh token absent, or its expiry
    /// inside the skew window. Runs before any network attempt so the caller
    /// gets a precise error instead of a downstream 401.
    pub fn validate_refresh_token(&self, user_id: &str) -> AuthResult<()> {
        let record = self
            .accounts
            .get(user_id)
            .ok_or(AuthError::InvalidRefreshToken)?;
        if record.is_refresh_valid(self.config.expiry_skew, Utc::now()) {
            Ok(())
        } else {
            Err(AuthError::InvalidRefreshToken)
        }
    }

    /// Get a currently-valid access token for a user.
    ///
    /// Returns `Ok(None)` only for a user unknown to the store. An
    /// access-valid record answers from cache with no locking beyond the
    /// store read; otherwise the per-user gate serializes the refresh and
    /// late arrivals observe the freshly updated record.
    pub async fn get_access_token(&self, user_id: &str) -> AuthResult<Option<String>> {
        let Some(record) = self.accounts.get(user_id) else {
            return Ok(None);
        };

        // Hot path: cached token still valid past the skew window.
        if record.is_access_valid(self.config.expiry_skew, Utc::now()) {
            return Ok(record.access_token);
        }

        let gate = self.refresh_gate(user_id);
        let _guard = gate.lock().await;

        // Re-check under the gate: a concurrent caller may have refreshed
        // while this one waited.
        let Some(record) = self.accounts.get(user_id) else {
            return Ok(None);
        };
        if record.is_access_valid(self.config.expiry_skew, Utc::now()) {
            debug!(user_id, "access token refreshed by concurrent caller");
            return Ok(record.access_token);
        }

        if !record.is_refresh_valid(self.config.expiry_skew, Utc::now()) {
            return Err(AuthError::InvalidRefreshToken);
        }

        let token = self.refresh_access_token(&record).await?;
        Ok(Some(token))
    }

    /// Mint a new access token from the record's refresh token and persist
    /// it. On exchange failure the stale access fields stay in place so a
    /// later retry can still use the possibly-valid refresh token.
    async fn refresh_access_token(&self, record: &CredentialRecord) -> AuthResult<String> {
        let refresh_token = record
            .refresh_token
            .clone()
            .ok_or(AuthError::InvalidRefreshToken)?;

        let response = self.exchange.exchange_refresh_token(&refresh_token).await?;
        let access_expires_at = access_expiry(&response, Utc::now())?;
        let access_token = response.access_token;

        let updated = self.accounts.update_tokens(&record.user_id, |r| {
            r.access_token = Some(access_token.clone());
            r.access_expires_at = Some(access_expires_at);
        });

        debug!(user_id = %record.user_id, "access token refreshed");

        if let Some(updated) = updated {
            self.notify_access_token_change(&updated).await;
        }

        Ok(access_token)
    }

    /// Complete a browser authorization: consume the pending flow entry,
    /// exchange the code, install the new credential record, and hand back
    /// the host's return address for redirection.
    pub async fn complete_authorization(
        &self,
        correlation_token: &str,
        code: &str,
    ) -> AuthResult<String> {
        let pending = self
            .pending
            .consume(correlation_token)
            .ok_or(AuthError::UnknownCallbackState)?;

        let response = self.exchange.exchange_authorization_code(code).await?;
        let now = Utc::now();
        let refresh_token = response
            .refresh_token
            .clone()
            .ok_or_else(|| AuthError::MalformedResponse {
                message: "authorization-code response missing refresh_token".to_string(),
            })?;
        let access_expires_at = access_expiry(&response, now)?;

        let record = CredentialRecord {
            user_id: pending.user_id.clone(),
            refresh_token: Some(refresh_token),
            // The brokerage does not report refresh expiry; apply the
            // configured policy window.
            refresh_expires_at: Some(now + self.config.refresh_token_lifetime),
            access_token: Some(response.access_token),
            access_expires_at: Some(access_expires_at),
        };
        {
            // Install under the user's refresh gate so a refresh that was
            // already in flight cannot overwrite the fresh credentials.
            let gate = self.refresh_gate(&pending.user_id);
            let _guard = gate.lock().await;
            self.accounts.put(record.clone());
        }

        info!(user_id = %pending.user_id, "authorization completed");
        self.notify_refresh_token_change(&record).await;

        Ok(pending.return_address)
    }

    async fn notify_access_token_change(&self, record: &CredentialRecord) {
        if let Some(listener) = &self.listener {
            if let Err(err) = listener.on_access_token_change(record).await {
                warn!(user_id = %record.user_id, error = %err, "access token change listener failed");
            }
        }
    }

    async fn notify_refresh_token_change(&self, record: &CredentialRecord) {
        if let Some(listener) = &self.listener {
            if let Err(err) = listener.on_refresh_token_change(record).await {
                warn!(user_id = %record.user_id, error = %err, "refresh token change listener failed");
            }
        }
    }

    /// Per-user refresh gate. Contention is scoped to one user; refreshes
    /// for different users proceed independently.
    fn refresh_gate(&self, user_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut gates = self.refresh_gates.lock().unwrap();
        gates
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

/// Access-token expiry from a token response. `expires_in` is required; a
/// response without it cannot be cached safely, and an out-of-range value
/// is as malformed as a non-numeric one.
fn access_expiry(response: &TokenResponse, now: DateTime<Utc>) -> AuthResult<DateTime<Utc>> {
    let seconds = response
        .expires_in
        .ok_or_else(|| AuthError::MalformedResponse {
            message: "token response missing expires_in".to_string(),
        })?;
    i64::try_from(seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| AuthError::MalformedResponse {
            message: format!("expires_in out of range: {seconds}"),
        })
}
