//! Fetch gateway for the upstream feedback API.
//!
//! Every outbound call goes through here and comes back as either a parsed
//! payload or a user-facing message. There are no retries; a failed request
//! stays failed until the screen asks again.

use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::{
    Credentials, FaqEntry, FeedbackRecord, FeedbackStats, FetchOutcome, LoginErrorBody, TimeRange,
    TokenPair,
};
use crate::session::SessionContext;

/// Token exchange endpoint.
pub const LOGIN_PATH: &str = "/auth/jwt/create/";
/// Aggregate statistics endpoint.
pub const STATS_PATH: &str = "/api/feedbackstats/";
/// Feedback list endpoint.
pub const FEEDBACK_PATH: &str = "/api/feedback";
/// Knowledge-base training endpoint.
pub const FAQ_PATH: &str = "/api/faq/";

const REQUEST_FAILED: &str = "Request failed";
const LOGIN_FAILED: &str = "Login failed";
const STATS_FAILED: &str = "Failed to fetch stats";
const FEEDBACK_FAILED: &str = "Failed to fetch feedbacks";
const TRAINING_FAILED: &str = "Training failed";

/// HTTP gateway bound to one API base URL and one session.
#[derive(Clone)]
pub struct FeedbackGateway {
    client: reqwest::Client,
    base_url: String,
    session: SessionContext,
    attach_token: bool,
}

impl FeedbackGateway {
    pub fn new(config: &Config, session: SessionContext) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
            attach_token: config.attach_token,
        })
    }

    /// Resolve a base-relative path; absolute URLs pass through untouched.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Issue a request and normalize the result.
    ///
    /// A 2xx status yields the parsed body (an empty body parses as `null`).
    /// Any other status yields a generic message; the body is not consulted.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> FetchOutcome<Value> {
        FetchOutcome::from_result(self.request_value(method, path, body).await)
    }

    async fn request_value(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, AppError> {
        let response = self.send(method, path, body, true).await?;
        let response = ensure_success(response, REQUEST_FAILED)?;
        let bytes = response.bytes().await?;
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Exchange credentials for a token pair.
    ///
    /// Unlike resource reads, a rejection surfaces the server's `detail` text.
    /// The session store is not touched here.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair, AppError> {
        let body = serde_json::to_value(credentials)?;
        let response = self
            .send(Method::POST, LOGIN_PATH, Some(&body), false)
            .await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<LoginErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.detail)
                .unwrap_or_else(|| LOGIN_FAILED.to_string());
            tracing::warn!("Login rejected with status {}", status.as_u16());
            return Err(AppError::LoginFailed(detail));
        }

        let tokens: TokenPair = serde_json::from_slice(&bytes)?;
        tracing::info!("Login succeeded for {}", credentials.username);
        Ok(tokens)
    }

    /// Aggregate statistics for a time range.
    pub async fn feedback_stats(&self, range: TimeRange) -> FetchOutcome<FeedbackStats> {
        let path = match range.days() {
            Some(days) => format!("{}?days={}", STATS_PATH, days),
            None => STATS_PATH.to_string(),
        };
        FetchOutcome::from_result(self.get_json(&path, STATS_FAILED).await)
    }

    /// All feedback records in server order.
    pub async fn feedback_list(&self) -> FetchOutcome<Vec<FeedbackRecord>> {
        FetchOutcome::from_result(self.get_json(FEEDBACK_PATH, FEEDBACK_FAILED).await)
    }

    /// Teach the knowledge base a question/answer pair.
    pub async fn train_faq(&self, entry: &FaqEntry) -> Result<(), AppError> {
        let body = serde_json::to_value(entry)?;
        let response = self.send(Method::POST, FAQ_PATH, Some(&body), true).await?;
        ensure_success(response, TRAINING_FAILED)?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        failure: &str,
    ) -> Result<T, AppError> {
        let response = self.send(Method::GET, path, None, true).await?;
        let response = ensure_success(response, failure)?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        resource: bool,
    ) -> Result<Response, AppError> {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);

        let mut builder = self.client.request(method, &url);
        if let Some(body) = body {
            // Sets Content-Type: application/json
            builder = builder.json(body);
        }

        // Resource reads go out without the stored access token unless the
        // operator opts in. The upstream API has accepted anonymous reads so
        // far; whether it should is an open question on the server side.
        if resource && self.attach_token {
            match self.session.access_token().await {
                Ok(Some(token)) => builder = builder.bearer_auth(token),
                Ok(None) => {}
                Err(e) => tracing::warn!("Could not read access token: {}", e),
            }
        }

        Ok(builder.send().await?)
    }
}

fn ensure_success(response: Response, failure: &str) -> Result<Response, AppError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        tracing::warn!("{} {} -> {}", failure, response.url(), status);
        Err(AppError::Upstream {
            status: status.as_u16(),
            message: failure.to_string(),
        })
    }
}
