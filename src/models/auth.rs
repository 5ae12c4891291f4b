//! Login credentials, token pairs and decoded identity.

use serde::{Deserialize, Serialize};

/// Username/password pair submitted to the token endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Access/refresh token pair issued by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Claims decoded from an access token.
pub type Identity = serde_json::Map<String, serde_json::Value>;

/// Error body returned by the token endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

/// Session status reported on the login route.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
}
