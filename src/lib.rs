//! Broker Auth
//!
//! Multi-account OAuth2 token lifecycle manager for a brokerage REST API.
//! Lets a host application call the brokerage on behalf of many end users
//! without managing token plumbing itself: authorization-code exchange,
//! refresh-token validation, access-token caching with lazy renewal, and
//! correlation of the browser redirect callback back to the user who
//! initiated it.
//!
//! # Example
//!
//! ```rust,ignore
//! use broker_auth::{broker_config, BrokerAuthClient, HttpRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = broker_config()
//!         .client_id("my-client-id")
//!         .client_secret("my-client-secret")
//!         .authorize_endpoint("https://broker.example.com/oauth/authorize")
//!         .token_endpoint("https://broker.example.com/oauth/token")
//!         .redirect_uri("https://myapp.example.com/oauth2/code")
//!         .build()?;
//!
//!     let client = BrokerAuthClient::new(config)?;
//!     client.register("user-1");
//!
//!     // Send the user's browser here to authorize:
//!     let consent_url = client.begin_authorization("user-1", "https://myapp.example.com/done");
//!
//!     // After the callback completes, API calls carry a fresh bearer token:
//!     let quotes = client
//!         .send("user-1", HttpRequest::get("https://api.broker.example.com/quotes"))
//!         .await?;
//!     println!("{}", quotes.body);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: configuration, credential records, wire types
//! - `error`: error taxonomy
//! - `core`: HTTP transport seam (reqwest + recording mock)
//! - `store`: in-memory account and pending-authorization registries
//! - `exchange`: the two brokerage token exchanges
//! - `token`: the lifecycle manager and the host listener seam
//! - `flow`: the browser consent flow controller
//! - `http`: axum endpoints over the flow controller
//! - `dispatch`: authenticated API call dispatcher
//! - `client`: high-level facade wiring the pieces together

pub mod builders;
pub mod client;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod exchange;
pub mod flow;
pub mod http;
pub mod store;
pub mod token;
pub mod types;

// Re-export main client
pub use client::BrokerAuthClient;

// Re-export builders
pub use builders::{broker_config, BrokerConfigBuilder};

// Re-export errors
pub use error::{sanitize_body, AuthError, AuthResult, ConfigError, TransportError};

// Re-export types
pub use types::{BrokerConfig, CredentialRecord, PendingAuthorization, TokenResponse};

// Re-export core components
pub use core::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport, ReqwestHttpTransport,
};

// Re-export stores
pub use store::{AccountStore, PendingAuthorizationRegistry};

// Re-export token lifecycle
pub use token::{ListenerError, NoopListener, TokenChangeListener, TokenLifecycleManager};

// Re-export flow pieces
pub use dispatch::ApiDispatcher;
pub use exchange::TokenExchangeClient;
pub use flow::AuthorizationFlowController;
pub use http::create_oauth_router;
