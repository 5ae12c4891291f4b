//! Knowledge-base training endpoint.

use axum::{extract::State, Json};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::FaqEntry;
use crate::AppState;

/// POST /faq - Send a question/answer pair to the knowledge base.
pub async fn train_faq(
    State(state): State<AppState>,
    Json(entry): Json<FaqEntry>,
) -> ApiResult<FaqEntry> {
    if entry.question.trim().is_empty() {
        return Err(AppError::Validation("Question is required".to_string()));
    }
    if entry.answer.trim().is_empty() {
        return Err(AppError::Validation("Answer is required".to_string()));
    }

    state.gateway().train_faq(&entry).await?;
    tracing::info!("Knowledge base trained with a new entry");
    success(entry)
}
