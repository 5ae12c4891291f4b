//! Tri-state result of a data fetch.

use serde::Serialize;

use crate::errors::AppError;

/// What a screen should render for one of its resources.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum FetchOutcome<T> {
    Loading,
    Error(String),
    Ready(T),
}

impl<T> FetchOutcome<T> {
    /// Convert a settled result, keeping only the error's user-facing message.
    pub fn from_result(result: Result<T, AppError>) -> Self {
        match result {
            Ok(value) => FetchOutcome::Ready(value),
            Err(err) => FetchOutcome::Error(err.message()),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Loading => FetchOutcome::Loading,
            FetchOutcome::Error(message) => FetchOutcome::Error(message),
            FetchOutcome::Ready(value) => FetchOutcome::Ready(f(value)),
        }
    }

    pub fn ready(self) -> Option<T> {
        match self {
            FetchOutcome::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_ready(&self) -> Option<&T> {
        match self {
            FetchOutcome::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            FetchOutcome::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchOutcome::Loading)
    }
}
