//! Screen endpoints.
//!
//! Each GET counts as a mount of the screen: it activates the screen's loader
//! and returns the shaped result. A failed load is still a successful
//! response whose `status` is `error`; the screen shows the message.

use axum::extract::{Query, State};
use serde::Deserialize;

use super::{parse_param, success, ApiResult};
use crate::models::TimeRange;
use crate::shape::PolarityFilter;
use crate::views::{
    analytic_view, dashboard_view, feedback_view, AnalyticView, DashboardView, FeedbackView,
    ScreenState,
};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FeedbackQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub range: Option<String>,
}

impl RangeQuery {
    pub fn time_range(&self) -> Result<TimeRange, crate::errors::AppError> {
        parse_param(self.range.as_deref(), "range")
    }
}

/// GET /dashboard - Last week's stats and the feedback list.
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<ScreenState<DashboardView>> {
    let snapshot = state.screens.load_dashboard().await;
    success(ScreenState::from_snapshot(&snapshot, dashboard_view))
}

/// GET /feedback - Feedback list, filtered by polarity.
pub async fn feedback(
    State(state): State<AppState>,
    Query(query): Query<FeedbackQuery>,
) -> ApiResult<ScreenState<FeedbackView>> {
    let filter: PolarityFilter = parse_param(query.filter.as_deref(), "filter")?;
    let snapshot = state.screens.load_feedback().await;
    success(ScreenState::from_snapshot(&snapshot, |records| {
        feedback_view(records, filter)
    }))
}

/// GET /analytic - Stats and charts for a time range.
pub async fn analytic(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<ScreenState<AnalyticView>> {
    let range = query.time_range()?;
    let snapshot = state.screens.load_analytic(range).await;
    // A newer activation may have replaced this one while it was in flight
    let shown = snapshot.param.unwrap_or(range);
    success(ScreenState::from_snapshot(&snapshot, |stats| analytic_view(stats, shown)))
}

/// POST /analytic/refresh - Reload the analytic screen with its current range.
pub async fn refresh_analytic(
    State(state): State<AppState>,
) -> ApiResult<ScreenState<AnalyticView>> {
    let snapshot = state.screens.refresh_analytic().await;
    let range = snapshot.param.unwrap_or_default();
    success(ScreenState::from_snapshot(&snapshot, |stats| analytic_view(stats, range)))
}
