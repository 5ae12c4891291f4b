//! Session gate for the screen routes.
//!
//! A request passes only when the session store yields an identity. The
//! check is local: token expiry is not validated and nothing is refreshed.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::AppState;

/// Message returned to requests without a usable session.
pub const SIGN_IN_REQUIRED: &str = "Sign in required";

/// Reject the request unless a decodable access token is stored.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.session.current_identity().await {
        Some(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        None => {
            tracing::debug!("Rejected {} without a session", request.uri().path());
            AppError::Unauthorized(SIGN_IN_REQUIRED.to_string()).into_response()
        }
    }
}
