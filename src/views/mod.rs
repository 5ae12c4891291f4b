//! Screens of the console.
//!
//! Each screen owns one loader and knows which gateway calls feed it and how
//! its data is shaped for display.

use serde::Serialize;

use crate::gateway::FeedbackGateway;
use crate::loader::{LoaderSnapshot, ViewLoader};
use crate::models::{FeedbackRecord, FeedbackStats, FetchOutcome, Polarity, TimeRange};
use crate::shape::{
    filter_by_polarity, format_feedback_time, item_count_label, percentage, rate_one_decimal,
    sector_comparison_chart, sector_distribution_chart, sector_rows, sentiment_chart,
    PolarityFilter, SectorComparisonChart, SectorDistributionChart, SectorRow, SentimentChart,
};

/// Everything the dashboard fetches on mount.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub stats: FeedbackStats,
    pub feedback: Vec<FeedbackRecord>,
}

/// The dashboard always summarizes the last week.
pub const DASHBOARD_RANGE: TimeRange = TimeRange::Last7Days;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenStatus {
    Loading,
    Error,
    Ready,
}

/// What a screen route returns.
#[derive(Debug, Clone, Serialize)]
pub struct ScreenState<V> {
    pub status: ScreenStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Shaped data of the current load, or of the last good load while a
    /// reload is in flight
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<V>,
    pub generation: u64,
}

impl<V> ScreenState<V> {
    pub fn from_snapshot<P, T, F>(snapshot: &LoaderSnapshot<P, T>, shape: F) -> Self
    where
        F: FnOnce(&T) -> V,
    {
        let (status, error) = match &snapshot.outcome {
            FetchOutcome::Loading => (ScreenStatus::Loading, None),
            FetchOutcome::Error(message) => (ScreenStatus::Error, Some(message.clone())),
            FetchOutcome::Ready(_) => (ScreenStatus::Ready, None),
        };
        Self {
            status,
            error,
            view: snapshot.display_data().map(shape),
            generation: snapshot.generation,
        }
    }
}

/// A feedback record prepared for a card.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackCard {
    pub id: i64,
    pub text: String,
    pub polarity: Polarity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    pub timestamp: String,
    pub display_time: String,
}

impl From<&FeedbackRecord> for FeedbackCard {
    fn from(record: &FeedbackRecord) -> Self {
        Self {
            id: record.id,
            text: record.text.clone(),
            polarity: record.polarity,
            sector: record.sector.clone(),
            timestamp: record.timestamp.clone(),
            display_time: format_feedback_time(&record.timestamp),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub total: u64,
    pub positive: u64,
    pub negative: u64,
    pub positive_rate: f64,
    pub negative_rate: f64,
    pub sentiment: SentimentChart,
    pub sectors: SectorComparisonChart,
    pub recent: Vec<FeedbackCard>,
}

pub fn dashboard_view(data: &DashboardData) -> DashboardView {
    let stats = &data.stats;
    DashboardView {
        total: stats.total_count,
        positive: stats.positive_count,
        negative: stats.negative_count,
        positive_rate: rate_one_decimal(stats.positive_count, stats.total_count),
        negative_rate: rate_one_decimal(stats.negative_count, stats.total_count),
        sentiment: sentiment_chart(stats),
        sectors: sector_comparison_chart(stats),
        recent: data.feedback.iter().map(FeedbackCard::from).collect(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackView {
    pub filter: PolarityFilter,
    pub count_label: String,
    pub items: Vec<FeedbackCard>,
}

pub fn feedback_view(records: &[FeedbackRecord], filter: PolarityFilter) -> FeedbackView {
    let filtered = filter_by_polarity(records, filter);
    FeedbackView {
        filter,
        count_label: item_count_label(filtered.len()),
        items: filtered.iter().map(FeedbackCard::from).collect(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticView {
    pub range: TimeRange,
    pub range_label: &'static str,
    pub total: u64,
    pub positive: u64,
    pub negative: u64,
    pub positive_percentage: u32,
    pub negative_percentage: u32,
    pub sentiment: SentimentChart,
    pub comparison: SectorComparisonChart,
    pub distribution: SectorDistributionChart,
    pub sectors: Vec<SectorRow>,
}

pub fn analytic_view(stats: &FeedbackStats, range: TimeRange) -> AnalyticView {
    AnalyticView {
        range,
        range_label: range.label(),
        total: stats.total_count,
        positive: stats.positive_count,
        negative: stats.negative_count,
        positive_percentage: percentage(stats.positive_count, stats.total_count),
        negative_percentage: percentage(stats.negative_count, stats.total_count),
        sentiment: sentiment_chart(stats),
        comparison: sector_comparison_chart(stats),
        distribution: sector_distribution_chart(stats),
        sectors: sector_rows(stats),
    }
}

/// All screen loaders plus the gateway that feeds them.
#[derive(Clone)]
pub struct Screens {
    gateway: FeedbackGateway,
    pub dashboard: ViewLoader<(), DashboardData>,
    pub feedback: ViewLoader<(), Vec<FeedbackRecord>>,
    pub analytic: ViewLoader<TimeRange, FeedbackStats>,
}

impl Screens {
    pub fn new(gateway: FeedbackGateway) -> Self {
        Self {
            gateway,
            dashboard: ViewLoader::new("dashboard"),
            feedback: ViewLoader::new("feedback"),
            analytic: ViewLoader::new("analytic"),
        }
    }

    pub fn gateway(&self) -> &FeedbackGateway {
        &self.gateway
    }

    pub async fn load_dashboard(&self) -> LoaderSnapshot<(), DashboardData> {
        let gateway = self.gateway.clone();
        self.dashboard
            .run((), |_| async move { fetch_dashboard(&gateway).await })
            .await
    }

    pub async fn load_feedback(&self) -> LoaderSnapshot<(), Vec<FeedbackRecord>> {
        let gateway = self.gateway.clone();
        self.feedback
            .run((), |_| async move { gateway.feedback_list().await })
            .await
    }

    pub async fn load_analytic(
        &self,
        range: TimeRange,
    ) -> LoaderSnapshot<TimeRange, FeedbackStats> {
        let gateway = self.gateway.clone();
        self.analytic
            .run(range, |range| async move {
                gateway.feedback_stats(range).await
            })
            .await
    }

    /// Reload the analytic screen with its current range, or the default range
    /// if it has never been shown.
    pub async fn refresh_analytic(&self) -> LoaderSnapshot<TimeRange, FeedbackStats> {
        match self.analytic.refresh() {
            Some(ticket) => {
                let outcome = self.gateway.feedback_stats(ticket.param).await;
                self.analytic.settle(&ticket, outcome);
                self.analytic.snapshot()
            }
            None => self.load_analytic(TimeRange::default()).await,
        }
    }

    /// Stats for `range`. Reuses the analytic screen's data when it shows
    /// exactly that range; otherwise fetches directly and leaves the screen's
    /// loader untouched.
    pub async fn analytic_stats(&self, range: TimeRange) -> FetchOutcome<FeedbackStats> {
        let snapshot = self.analytic.snapshot();
        if snapshot.param == Some(range) {
            if let FetchOutcome::Ready(stats) = snapshot.outcome {
                return FetchOutcome::Ready(stats);
            }
        }
        self.gateway.feedback_stats(range).await
    }

    /// Forget every screen's data; in-flight loads settle into nothing.
    pub fn teardown_all(&self) {
        self.dashboard.teardown();
        self.feedback.teardown();
        self.analytic.teardown();
    }
}

/// Stats first, then the list; the first failure is the screen's error.
async fn fetch_dashboard(gateway: &FeedbackGateway) -> FetchOutcome<DashboardData> {
    let stats = match gateway.feedback_stats(DASHBOARD_RANGE).await {
        FetchOutcome::Ready(stats) => stats,
        FetchOutcome::Error(message) => return FetchOutcome::Error(message),
        FetchOutcome::Loading => return FetchOutcome::Loading,
    };
    gateway
        .feedback_list()
        .await
        .map(|feedback| DashboardData { stats, feedback })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        sample_feedback, sample_stats, test_config, test_session, MockUpstream,
    };
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;

    async fn screens(upstream: &MockUpstream, dir: &TempDir) -> Screens {
        let config = test_config(&upstream.base_url, dir.path().join("views.sqlite"));
        let session = test_session(dir).await;
        Screens::new(FeedbackGateway::new(&config, session).unwrap())
    }

    fn stats_with_total(total: u64) -> serde_json::Value {
        let mut stats = sample_stats();
        stats["total_feedbacks"] = json!(total);
        stats
    }

    #[tokio::test]
    async fn test_dashboard_loads_stats_then_feedback() {
        let upstream = MockUpstream::start().await;
        upstream.respond("GET", "/api/feedbackstats/?days=7", 200, sample_stats());
        upstream.respond("GET", "/api/feedback", 200, sample_feedback());
        let dir = TempDir::new().unwrap();
        let screens = screens(&upstream, &dir).await;

        let snapshot = screens.load_dashboard().await;
        let state = ScreenState::from_snapshot(&snapshot, dashboard_view);
        assert_eq!(state.status, ScreenStatus::Ready);
        let view = state.view.unwrap();
        assert_eq!(view.total, 100);
        assert_eq!(view.positive_rate, 80.0);
        assert_eq!(view.negative_rate, 20.0);
        assert_eq!(view.recent.len(), 3);
        assert_eq!(view.recent[0].display_time, "Mar 1, 2025, 10:15 AM");
    }

    #[tokio::test]
    async fn test_dashboard_stats_failure_skips_list() {
        let upstream = MockUpstream::start().await;
        upstream.respond("GET", "/api/feedbackstats/?days=7", 500, json!({}));
        upstream.respond("GET", "/api/feedback", 200, sample_feedback());
        let dir = TempDir::new().unwrap();
        let screens = screens(&upstream, &dir).await;

        let snapshot = screens.load_dashboard().await;
        let message = snapshot.outcome.error_message();
        assert_eq!(message, Some("Failed to fetch stats"));
        assert!(upstream.requests_to("/api/feedback").is_empty());
    }

    #[tokio::test]
    async fn test_feedback_view_filtering() {
        let upstream = MockUpstream::start().await;
        upstream.respond("GET", "/api/feedback", 200, sample_feedback());
        let dir = TempDir::new().unwrap();
        let screens = screens(&upstream, &dir).await;

        let snapshot = screens.load_feedback().await;
        let records = snapshot.outcome.as_ready().unwrap();

        let all = feedback_view(records, PolarityFilter::All);
        assert_eq!(all.count_label, "3 Items");
        let negative = feedback_view(records, PolarityFilter::Only(Polarity::Negative));
        assert_eq!(negative.count_label, "1 Item");
        assert_eq!(negative.items[0].id, 2);
    }

    #[tokio::test]
    async fn test_analytic_refresh_keeps_previous_view() {
        let upstream = MockUpstream::start().await;
        upstream.respond("GET", "/api/feedbackstats/?days=30", 200, sample_stats());
        upstream.respond("GET", "/api/feedbackstats/?days=30", 500, json!({}));
        let dir = TempDir::new().unwrap();
        let screens = screens(&upstream, &dir).await;

        let first = screens.load_analytic(TimeRange::Last30Days).await;
        assert!(first.outcome.as_ready().is_some());

        let refreshed = screens.refresh_analytic().await;
        let state = ScreenState::from_snapshot(&refreshed, |stats| {
            analytic_view(stats, TimeRange::Last30Days)
        });
        assert_eq!(state.status, ScreenStatus::Error);
        assert_eq!(state.error.as_deref(), Some("Failed to fetch stats"));
        assert_eq!(state.view.unwrap().positive_percentage, 80);
        assert_eq!(upstream.requests_to("/api/feedbackstats/?days=30").len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_without_activation_uses_default_range() {
        let upstream = MockUpstream::start().await;
        upstream.respond("GET", "/api/feedbackstats/?days=7", 200, sample_stats());
        let dir = TempDir::new().unwrap();
        let screens = screens(&upstream, &dir).await;

        let snapshot = screens.refresh_analytic().await;
        assert_eq!(snapshot.param, Some(TimeRange::Last7Days));
    }

    #[tokio::test]
    async fn test_analytic_range_race_newest_wins() {
        let upstream = MockUpstream::start().await;
        upstream.respond_delayed(
            "GET",
            "/api/feedbackstats/?days=7",
            200,
            stats_with_total(7),
            Duration::from_millis(300),
        );
        upstream.respond(
            "GET",
            "/api/feedbackstats/?days=30",
            200,
            stats_with_total(30),
        );
        let dir = TempDir::new().unwrap();
        let screens = screens(&upstream, &dir).await;

        let first = {
            let screens = screens.clone();
            tokio::spawn(async move {
                screens.load_analytic(TimeRange::Last7Days).await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        let second = screens.load_analytic(TimeRange::Last30Days).await;
        let first = first.await.unwrap();

        assert_eq!(second.outcome.as_ready().unwrap().total_count, 30);
        assert_eq!(first.outcome.as_ready().unwrap().total_count, 30);
        let current = screens.analytic.snapshot();
        assert_eq!(current.param, Some(TimeRange::Last30Days));
    }

    #[tokio::test]
    async fn test_teardown_discards_late_result() {
        let upstream = MockUpstream::start().await;
        upstream.respond_delayed(
            "GET",
            "/api/feedback",
            200,
            sample_feedback(),
            Duration::from_millis(200),
        );
        let dir = TempDir::new().unwrap();
        let screens = screens(&upstream, &dir).await;

        let pending = {
            let screens = screens.clone();
            tokio::spawn(async move { screens.load_feedback().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        screens.teardown_all();

        let late = pending.await.unwrap();
        assert!(late.outcome.is_loading());
        assert!(late.previous.is_none());
        assert!(screens.feedback.snapshot().previous.is_none());
    }

    #[tokio::test]
    async fn test_analytic_stats_reuses_loaded_data() {
        let upstream = MockUpstream::start().await;
        upstream.respond("GET", "/api/feedbackstats/", 200, sample_stats());
        let dir = TempDir::new().unwrap();
        let screens = screens(&upstream, &dir).await;

        screens.load_analytic(TimeRange::AllTime).await;
        let stats = screens.analytic_stats(TimeRange::AllTime).await;
        assert!(stats.ready().is_some());
        assert_eq!(upstream.requests_to("/api/feedbackstats/").len(), 1);
    }

    #[tokio::test]
    async fn test_analytic_stats_for_other_range_leaves_screen_alone() {
        let upstream = MockUpstream::start().await;
        upstream.respond(
            "GET",
            "/api/feedbackstats/?days=7",
            200,
            stats_with_total(7),
        );
        upstream.respond(
            "GET",
            "/api/feedbackstats/?days=90",
            200,
            stats_with_total(90),
        );
        let dir = TempDir::new().unwrap();
        let screens = screens(&upstream, &dir).await;

        let shown = screens.load_analytic(TimeRange::Last7Days).await;
        let stats = screens.analytic_stats(TimeRange::Last90Days).await;
        assert_eq!(stats.ready().unwrap().total_count, 90);

        let current = screens.analytic.snapshot();
        assert_eq!(current.param, Some(TimeRange::Last7Days));
        assert_eq!(current.generation, shown.generation);
        assert_eq!(current.outcome.as_ready().unwrap().total_count, 7);
    }

    #[tokio::test]
    async fn test_analytic_stats_ignores_concurrent_range_change() {
        let upstream = MockUpstream::start().await;
        upstream.respond_delayed(
            "GET",
            "/api/feedbackstats/?days=30",
            200,
            stats_with_total(30),
            Duration::from_millis(300),
        );
        upstream.respond(
            "GET",
            "/api/feedbackstats/?days=90",
            200,
            stats_with_total(90),
        );
        let dir = TempDir::new().unwrap();
        let screens = screens(&upstream, &dir).await;

        let report = {
            let screens = screens.clone();
            tokio::spawn(async move {
                screens.analytic_stats(TimeRange::Last30Days).await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        screens.load_analytic(TimeRange::Last90Days).await;

        let report = report.await.unwrap();
        assert_eq!(report.ready().unwrap().total_count, 30);
        let current = screens.analytic.snapshot();
        assert_eq!(current.param, Some(TimeRange::Last90Days));
        assert_eq!(current.outcome.as_ready().unwrap().total_count, 90);
    }
}
