//! Authenticated Call Dispatcher
//!
//! Boundary between the token lifecycle and the brokerage business API:
//! fetch a currently-valid access token, attach it as a bearer credential,
//! invoke the call, and map HTTP error codes to domain errors. The shape and
//! validation of business payloads stay out of scope; callers receive the
//! raw response body.

use std::sync::Arc;

use crate::core::{HttpRequest, HttpResponse, HttpTransport};
use crate::error::{sanitize_body, AuthError, AuthResult};
use crate::token::TokenLifecycleManager;

pub struct ApiDispatcher<T: HttpTransport> {
    manager: Arc<TokenLifecycleManager<T>>,
    transport: Arc<T>,
}

impl<T: HttpTransport> ApiDispatcher<T> {
    pub fn new(manager: Arc<TokenLifecycleManager<T>>, transport: Arc<T>) -> Self {
        Self { manager, transport }
    }

    /// Send an API request on behalf of a user, refreshing the access token
    /// first if needed.
    pub async fn send(&self, user_id: &str, mut request: HttpRequest) -> AuthResult<HttpResponse> {
        let token = self
            .manager
            .get_access_token(user_id)
            .await?
            .ok_or_else(|| AuthError::UnknownUser {
                user_id: user_id.to_string(),
            })?;

        request
            .headers
            .insert("authorization".to_string(), format!("Bearer {token}"));

        let response = self.transport.send(request).await?;
        match response.status {
            status if (200..300).contains(&status) => Ok(response),
            401 => Err(AuthError::Unauthorized {
                body: sanitize_body(&response.body),
            }),
            status => Err(AuthError::ApiRejected {
                status,
                body: sanitize_body(&response.body),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::broker_config;
    use crate::core::MockHttpTransport;
    use crate::store::{AccountStore, PendingAuthorizationRegistry};
    use crate::types::CredentialRecord;
    use chrono::{Duration, Utc};

    struct Fixture {
        dispatcher: ApiDispatcher<MockHttpTransport>,
        transport: Arc<MockHttpTransport>,
        accounts: Arc<AccountStore>,
    }

    fn fixture() -> Fixture {
        let config = broker_config()
            .client_id("client-id")
            .client_secret("client-secret")
            .authorize_endpoint("https://broker.example.com/oauth/authorize")
            .token_endpoint("https://broker.example.com/oauth/token")
            .redirect_uri("https://host.example.com/oauth2/code")
            .build()
            .unwrap();

        let transport = Arc::new(MockHttpTransport::new());
        let accounts = Arc::new(AccountStore::new());
        let manager = Arc::new(TokenLifecycleManager::new(
            config,
            transport.clone(),
            accounts.clone(),
            Arc::new(PendingAuthorizationRegistry::new()),
            None,
        ));
        Fixture {
            dispatcher: ApiDispatcher::new(manager, transport.clone()),
            transport,
            accounts,
        }
    }

    fn valid_record(user_id: &str) -> CredentialRecord {
        let now = Utc::now();
        CredentialRecord {
            user_id: user_id.to_string(),
            refresh_token: Some("R".to_string()),
            refresh_expires_at: Some(now + Duration::days(7)),
            access_token: Some("A".to_string()),
            access_expires_at: Some(now + Duration::seconds(1800)),
        }
    }

    #[tokio::test]
    async fn test_attaches_bearer_credential() {
        let f = fixture();
        f.accounts.put(valid_record("u1"));
        f.transport
            .queue_json_response(200, &serde_json::json!({"quotes": []}));

        let response = f
            .dispatcher
            .send("u1", HttpRequest::get("https://api.broker.example.com/quotes"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        let request = f.transport.last_request().unwrap();
        assert_eq!(request.headers.get("authorization").unwrap(), "Bearer A");
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let f = fixture();
        let err = f
            .dispatcher
            .send("ghost", HttpRequest::get("https://api.broker.example.com/quotes"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UnknownUser { .. }));
        assert_eq!(f.transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_401_maps_to_unauthorized() {
        let f = fixture();
        f.accounts.put(valid_record("u1"));
        f.transport.queue_response(HttpResponse {
            status: 401,
            headers: Default::default(),
            body: "token rejected".to_string(),
        });

        let err = f
            .dispatcher
            .send("u1", HttpRequest::get("https://api.broker.example.com/quotes"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_other_failures_map_to_api_rejected() {
        let f = fixture();
        f.accounts.put(valid_record("u1"));
        f.transport.queue_response(HttpResponse {
            status: 503,
            headers: Default::default(),
            body: "maintenance\r\nwindow".to_string(),
        });

        let err = f
            .dispatcher
            .send("u1", HttpRequest::get("https://api.broker.example.com/quotes"))
            .await
            .unwrap_err();
        match err {
            AuthError::ApiRejected { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "maintenance  window");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stale_token_refreshed_before_dispatch() {
        let f = fixture();
        let mut record = valid_record("u1");
        record.access_expires_at = Some(Utc::now() + Duration::seconds(30));
        f.accounts.put(record);

        // First queued response answers the refresh, second the API call.
        f.transport.queue_json_response(
            200,
            &serde_json::json!({"access_token": "A-new", "expires_in": 1800}),
        );
        f.transport
            .queue_json_response(200, &serde_json::json!({"quotes": []}));

        f.dispatcher
            .send("u1", HttpRequest::get("https://api.broker.example.com/quotes"))
            .await
            .unwrap();

        let requests = f.transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(
            requests[1].headers.get("authorization").unwrap(),
            "Bearer A-new"
        );
    }
}
