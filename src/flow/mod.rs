//! Authorization Flow Controller
//!
//! Drives a user through the browser consent flow: builds the consent-page
//! redirect and resolves the asynchronous callback back to the flow that
//! started it. Stateless besides delegating to the pending registry and the
//! lifecycle manager.

use std::sync::Arc;
use tracing::debug;

use crate::core::HttpTransport;
use crate::error::AuthResult;
use crate::store::PendingAuthorizationRegistry;
use crate::token::TokenLifecycleManager;
use crate::types::BrokerConfig;

pub struct AuthorizationFlowController<T: HttpTransport> {
    config: BrokerConfig,
    pending: Arc<PendingAuthorizationRegistry>,
    manager: Arc<TokenLifecycleManager<T>>,
}

impl<T: HttpTransport> AuthorizationFlowController<T> {
    pub fn new(
        config: BrokerConfig,
        pending: Arc<PendingAuthorizationRegistry>,
        manager: Arc<TokenLifecycleManager<T>>,
    ) -> Self {
        Self {
            config,
            pending,
            manager,
        }
    }

    /// Start a flow for a user: registers a pending authorization and
    /// returns the brokerage consent-page URL to redirect the browser to,
    /// with the correlation token as the `state` parameter.
    pub fn begin_authorization(&self, user_id: &str, return_address: &str) -> String {
        let state = self.pending.create(user_id, return_address);
        debug!(user_id, "authorization flow started");

        let mut url = self.config.authorize_endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.config.client_id)
                .append_pair("redirect_uri", &self.config.redirect_uri);
            if let Some(scope) = &self.config.scope {
                pairs.append_pair("scope", scope);
            }
            pairs.append_pair("state", &state);
        }
        url.to_string()
    }

    /// Resolve the brokerage redirect callback. On success returns the
    /// return address stored when the flow began; unknown or replayed state
    /// and exchange failures propagate unchanged for the HTTP layer to map.
    pub async fn handle_callback(&self, code: &str, state: &str) -> AuthResult<String> {
        self.manager.complete_authorization(state, code).await
    }
}
