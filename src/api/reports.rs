//! Report download endpoint.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;

use super::RangeQuery;
use crate::errors::AppError;
use crate::export::{render, report_filename, ExportFormat, ReportContext};
use crate::models::FetchOutcome;
use crate::AppState;

/// GET /analytic/export/{format} - Download the analytic report.
pub async fn export_report(
    State(state): State<AppState>,
    Path(format): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<Response, AppError> {
    let format: ExportFormat = format.parse().map_err(AppError::Validation)?;
    let range = query.time_range()?;

    let stats = match state.screens.analytic_stats(range).await {
        FetchOutcome::Ready(stats) => stats,
        FetchOutcome::Error(message) => {
            return Err(AppError::Upstream {
                status: StatusCode::BAD_GATEWAY.as_u16(),
                message,
            })
        }
        FetchOutcome::Loading => {
            return Err(AppError::Internal("Report data is still loading".to_string()))
        }
    };

    let generated_at = Utc::now();
    let context = ReportContext {
        range_label: range.label().to_string(),
        generated_at,
    };
    let bytes = render(format, &stats, &context)?;
    let filename = report_filename(format, generated_at.date_naive());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
