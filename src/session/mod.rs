//! Session store.
//!
//! Holds the access/refresh token pair in client storage and derives the
//! current identity from the access token's claims. Nothing here talks to the
//! network and nothing here validates expiry; the API rejects stale tokens on
//! next use.

use std::ops::Deref;
use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};

use crate::db::ClientStorage;
use crate::errors::AppError;
use crate::models::{Identity, TokenPair};

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Single source of truth for the token pair.
pub struct SessionStore {
    storage: ClientStorage,
}

impl SessionStore {
    pub fn new(storage: ClientStorage) -> Self {
        Self { storage }
    }

    /// Persist both tokens, replacing any existing pair.
    pub async fn save(&self, tokens: &TokenPair) -> Result<(), AppError> {
        self.storage
            .set_items(&[
                (ACCESS_TOKEN_KEY, tokens.access.as_str()),
                (REFRESH_TOKEN_KEY, tokens.refresh.as_str()),
            ])
            .await?;
        tracing::info!("Session tokens saved");
        Ok(())
    }

    /// Remove both tokens.
    pub async fn clear(&self) -> Result<(), AppError> {
        self.storage
            .remove_items(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY])
            .await?;
        tracing::info!("Session tokens cleared");
        Ok(())
    }

    /// The stored pair, if both halves are present.
    pub async fn tokens(&self) -> Result<Option<TokenPair>, AppError> {
        let access = self.storage.get_item(ACCESS_TOKEN_KEY).await?;
        let refresh = self.storage.get_item(REFRESH_TOKEN_KEY).await?;
        Ok(match (access, refresh) {
            (Some(access), Some(refresh)) => Some(TokenPair { access, refresh }),
            _ => None,
        })
    }

    pub async fn access_token(&self) -> Result<Option<String>, AppError> {
        self.storage.get_item(ACCESS_TOKEN_KEY).await
    }

    /// Claims of the stored access token.
    ///
    /// Returns `None` when no token is stored, when the token cannot be decoded,
    /// or when storage itself fails. Never errors.
    pub async fn current_identity(&self) -> Option<Identity> {
        let token = match self.access_token().await {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Could not read access token: {}", e);
                return None;
            }
        };

        let identity = decode_claims(&token);
        if identity.is_none() {
            tracing::debug!("Stored access token is not a decodable claims blob");
        }
        identity
    }
}

/// Decode the payload segment of a JWT without verifying its signature.
pub fn decode_claims(token: &str) -> Option<Identity> {
    let payload = token.split('.').nth(1)?;
    let normalized: String = payload
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let bytes = general_purpose::URL_SAFE_NO_PAD.decode(normalized).ok()?;
    match serde_json::from_slice::<serde_json::Value>(&bytes).ok()? {
        serde_json::Value::Object(claims) => Some(claims),
        _ => None,
    }
}

/// Shared handle to the session store, built once at start-up and handed to
/// every component that needs the tokens.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<SessionStore>,
}

impl SessionContext {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

impl Deref for SessionContext {
    type Target = SessionStore;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
