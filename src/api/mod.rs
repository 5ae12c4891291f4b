//! Console API module.
//!
//! One route per screen plus login/logout, report downloads and FAQ training.

mod faq;
mod reports;
mod screens;
mod session;

pub use faq::*;
pub use reports::*;
pub use screens::*;
pub use session::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Parse an optional query value, reporting bad input as a validation error.
fn parse_param<T>(raw: Option<&str>, name: &str) -> Result<T, AppError>
where
    T: std::str::FromStr<Err = String> + Default,
{
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => value
            .parse()
            .map_err(|e| AppError::Validation(format!("Invalid {}: {}", name, e))),
        None => Ok(T::default()),
    }
}
