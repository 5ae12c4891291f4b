//! Login screen endpoints.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{Credentials, SessionStatus};
use crate::AppState;

/// GET / - Current session status.
pub async fn session_status(State(state): State<AppState>) -> ApiResult<SessionStatus> {
    let identity = state.session.current_identity().await;
    success(SessionStatus {
        authenticated: identity.is_some(),
        identity,
    })
}

/// POST / - Exchange credentials for tokens and start a session.
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<SessionStatus> {
    if credentials.username.trim().is_empty() || credentials.password.is_empty() {
        return Err(AppError::Validation("Username and password are required".to_string()));
    }

    // Tokens are written only after the exchange succeeded
    let tokens = state.gateway().login(&credentials).await?;
    state.session.save(&tokens).await?;
    tracing::info!(
        "Session started for {} against {}",
        credentials.username,
        state.config.api_base_url
    );

    let identity = state.session.current_identity().await;
    success(SessionStatus {
        authenticated: identity.is_some(),
        identity,
    })
}

/// POST /logout - Clear the session and drop every screen's data.
pub async fn logout(State(state): State<AppState>) -> ApiResult<SessionStatus> {
    state.screens.teardown_all();
    state.session.clear().await?;
    success(SessionStatus {
        authenticated: false,
        identity: None,
    })
}
