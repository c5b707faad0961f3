// Integration tests for the token exchanges over the real reqwest transport.

use std::sync::Arc;
use std::time::Duration;

use broker_auth::{broker_config, AuthError, ReqwestHttpTransport, TokenExchangeClient};
use wiremock::matchers::{basic_auth, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn exchange_client(
    server: &MockServer,
) -> TokenExchangeClient<ReqwestHttpTransport> {
    let config = broker_config()
        .client_id("client-id")
        .client_secret("client-secret")
        .authorize_endpoint(format!("{}/oauth/authorize", server.uri()))
        .token_endpoint(format!("{}/oauth/token", server.uri()))
        .redirect_uri("https://host.example.com/oauth2/code")
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();

    let transport = Arc::new(ReqwestHttpTransport::new(Duration::from_secs(2)).unwrap());
    TokenExchangeClient::new(config, transport)
}

#[tokio::test]
async fn authorization_code_exchange_sends_expected_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(basic_auth("client-id", "client-secret"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("access_type=offline"))
        .and(body_string_contains("code=abc"))
        .and(body_string_contains("client_id=client-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "A",
            "refresh_token": "R",
            "expires_in": 1800,
            "token_type": "Bearer",
            "scope": "api"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = exchange_client(&server).await;
    let response = client.exchange_authorization_code("abc").await.unwrap();
    assert_eq!(response.access_token, "A");
    assert_eq!(response.refresh_token.as_deref(), Some("R"));
    assert_eq!(response.expires_in, Some(1800));
}

#[tokio::test]
async fn refresh_exchange_sends_refresh_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(basic_auth("client-id", "client-secret"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=R"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "A2",
            "expires_in": 1800
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = exchange_client(&server).await;
    let response = client.exchange_refresh_token("R").await.unwrap();
    assert_eq!(response.access_token, "A2");
    assert!(response.refresh_token.is_none());
}

#[tokio::test]
async fn rejected_exchange_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string("{\"error\":\"invalid_grant\"}"),
        )
        .mount(&server)
        .await;

    let client = exchange_client(&server).await;
    let err = client.exchange_refresh_token("R").await.unwrap_err();
    match err {
        AuthError::ExchangeRejected { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("invalid_grant"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn hung_endpoint_surfaces_as_transport_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"access_token": "A", "expires_in": 1800}))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let client = exchange_client(&server).await;
    let err = client.exchange_refresh_token("R").await.unwrap_err();
    assert!(matches!(err, AuthError::Transport(_)));
}
