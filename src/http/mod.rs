//! HTTP Surface
//!
//! Browser-facing endpoints over the authorization flow controller:
//!
//! - `GET /oauth2/authorize?userId=&callback=`: 302 to the consent page.
//! - `GET /oauth2/code?code=&state=`: brokerage redirect target; 302 back
//!   to the originally supplied callback on success.
//!
//! On failure the callback endpoint answers with a diagnostic status
//! directly and never redirects into the host.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::core::HttpTransport;
use crate::error::AuthError;
use crate::flow::AuthorizationFlowController;

/// Build the OAuth2 router over a flow controller.
pub fn create_oauth_router<T: HttpTransport + 'static>(
    controller: Arc<AuthorizationFlowController<T>>,
) -> Router {
    Router::new()
        .route("/oauth2/authorize", get(authorize::<T>))
        .route("/oauth2/code", get(code_callback::<T>))
        .with_state(controller)
}

#[derive(Deserialize)]
struct AuthorizeQuery {
    #[serde(rename = "userId")]
    user_id: String,
    callback: String,
}

#[derive(Deserialize)]
struct CodeQuery {
    code: String,
    state: String,
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// GET /oauth2/authorize
///
/// Starts a consent flow and sends the browser to the brokerage.
async fn authorize<T: HttpTransport>(
    State(controller): State<Arc<AuthorizationFlowController<T>>>,
    Query(query): Query<AuthorizeQuery>,
) -> Response {
    let target = controller.begin_authorization(&query.user_id, &query.callback);
    found(&target)
}

/// GET /oauth2/code
///
/// The brokerage redirects the browser here after consent. Success sends the
/// browser on to the callback supplied at flow start.
async fn code_callback<T: HttpTransport>(
    State(controller): State<Arc<AuthorizationFlowController<T>>>,
    Query(query): Query<CodeQuery>,
) -> Response {
    match controller.handle_callback(&query.code, &query.state).await {
        Ok(return_address) => found(&return_address),
        Err(AuthError::UnknownCallbackState) => (
            StatusCode::BAD_REQUEST,
            "unknown or already-used state parameter",
        )
            .into_response(),
        Err(err @ AuthError::ExchangeRejected { .. }) | Err(err @ AuthError::Transport(_)) => {
            warn!(error = %err, "token exchange failed during callback");
            // Error bodies are already sanitized at the exchange boundary.
            (StatusCode::BAD_GATEWAY, format!("token exchange failed: {err}")).into_response()
        }
        Err(err) => {
            warn!(error = %err, "authorization completion failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "authorization could not be completed",
            )
                .into_response()
        }
    }
}
