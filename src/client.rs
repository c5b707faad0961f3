//! Broker Auth Client
//!
//! High-level facade assembling the stores, lifecycle manager, flow
//! controller, and dispatcher into one object the host registers users with
//! and calls the brokerage through.

use std::sync::Arc;

use crate::core::{HttpRequest, HttpResponse, HttpTransport, ReqwestHttpTransport};
use crate::dispatch::ApiDispatcher;
use crate::error::{AuthResult, TransportError};
use crate::flow::AuthorizationFlowController;
use crate::http::create_oauth_router;
use crate::store::{AccountStore, PendingAuthorizationRegistry};
use crate::token::{TokenChangeListener, TokenLifecycleManager};
use crate::types::{BrokerConfig, CredentialRecord};

/// Facade over the token lifecycle for one brokerage client registration.
///
/// All state lives in the injected stores; independent clients in one
/// process never share credentials.
pub struct BrokerAuthClient<T: HttpTransport = ReqwestHttpTransport> {
    accounts: Arc<AccountStore>,
    pending: Arc<PendingAuthorizationRegistry>,
    manager: Arc<TokenLifecycleManager<T>>,
    controller: Arc<AuthorizationFlowController<T>>,
    dispatcher: ApiDispatcher<T>,
}

impl BrokerAuthClient<ReqwestHttpTransport> {
    /// Create a client with the default reqwest transport.
    pub fn new(config: BrokerConfig) -> Result<Self, TransportError> {
        let transport = Arc::new(ReqwestHttpTransport::new(config.timeout)?);
        Ok(Self::with_transport(config, transport, None))
    }

    /// Create a client with the default transport and a token change
    /// listener for host-side persistence.
    pub fn with_listener(
        config: BrokerConfig,
        listener: Arc<dyn TokenChangeListener>,
    ) -> Result<Self, TransportError> {
        let transport = Arc::new(ReqwestHttpTransport::new(config.timeout)?);
        Ok(Self::with_transport(config, transport, Some(listener)))
    }
}

impl<T: HttpTransport> BrokerAuthClient<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(
        config: BrokerConfig,
        transport: Arc<T>,
        listener: Option<Arc<dyn TokenChangeListener>>,
    ) -> Self {
        let accounts = Arc::new(AccountStore::new());
        let pending = Arc::new(PendingAuthorizationRegistry::new());
        let manager = Arc::new(TokenLifecycleManager::new(
            config.clone(),
            transport.clone(),
            accounts.clone(),
            pending.clone(),
            listener,
        ));
        let controller = Arc::new(AuthorizationFlowController::new(
            config,
            pending.clone(),
            manager.clone(),
        ));
        let dispatcher = ApiDispatcher::new(manager.clone(), transport);

        Self {
            accounts,
            pending,
            manager,
            controller,
            dispatcher,
        }
    }

    // ========== Registration ==========

    /// Register a user with credentials restored by the host (e.g. from its
    /// own persistence of earlier listener callbacks).
    pub fn init(&self, record: CredentialRecord) {
        self.accounts.put(record);
    }

    /// Register many users at once.
    pub fn init_all(&self, records: impl IntoIterator<Item = CredentialRecord>) {
        for record in records {
            self.accounts.put(record);
        }
    }

    /// Register a user with no credentials yet; they must complete the
    /// browser flow before API calls can be made.
    pub fn register(&self, user_id: impl Into<String>) {
        self.accounts.put(CredentialRecord::new(user_id));
    }

    // ========== Token lifecycle ==========

    /// Get a currently-valid access token for a user, refreshing lazily.
    /// `Ok(None)` means the user was never registered.
    pub async fn get_access_token(&self, user_id: &str) -> AuthResult<Option<String>> {
        self.manager.get_access_token(user_id).await
    }

    /// Check that a user could mint access tokens without a new browser
    /// authorization.
    pub fn validate_refresh_token(&self, user_id: &str) -> AuthResult<()> {
        self.manager.validate_refresh_token(user_id)
    }

    // ========== Browser flow ==========

    /// Start a consent flow; returns the consent-page URL for redirection.
    pub fn begin_authorization(&self, user_id: &str, return_address: &str) -> String {
        self.controller.begin_authorization(user_id, return_address)
    }

    /// Resolve a consent callback; returns the host return address.
    pub async fn handle_callback(&self, code: &str, state: &str) -> AuthResult<String> {
        self.controller.handle_callback(code, state).await
    }

    // ========== API calls ==========

    /// Send an authenticated API request on behalf of a user.
    pub async fn send(&self, user_id: &str, request: HttpRequest) -> AuthResult<HttpResponse> {
        self.dispatcher.send(user_id, request).await
    }

    // ========== Component access ==========

    /// The shared account store (e.g. for host-side inspection).
    pub fn accounts(&self) -> &Arc<AccountStore> {
        &self.accounts
    }

    /// The pending authorization registry.
    pub fn pending_authorizations(&self) -> &Arc<PendingAuthorizationRegistry> {
        &self.pending
    }
}

impl<T: HttpTransport + 'static> BrokerAuthClient<T> {
    /// Axum router exposing the browser-facing endpoints
    /// (`/oauth2/authorize`, `/oauth2/code`).
    pub fn router(&self) -> axum::Router {
        create_oauth_router(self.controller.clone())
    }
}
