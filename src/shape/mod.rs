//! Client-side filtering and chart shaping.
//!
//! Pure functions over already-fetched data. A zero denominator always yields
//! zero so nothing non-finite ever reaches a chart or an export.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{FeedbackRecord, FeedbackStats, Polarity};

/// Sector names in the order the server listed them.
pub fn sectors(stats: &FeedbackStats) -> Vec<String> {
    stats
        .sector_breakdown
        .entries()
        .iter()
        .map(|entry| entry.sector.clone())
        .collect()
}

/// Whole-number share of `part` in `total`, rounded half up.
pub fn percentage(part: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}

/// Share of `part` in `total` rounded to one decimal place.
pub fn rate_one_decimal(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

/// `83%` style rendering.
pub fn percent_label(value: u32) -> String {
    format!("{}%", value)
}

/// Selected value of the feedback screen's polarity filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PolarityFilter {
    #[default]
    All,
    Only(Polarity),
}

impl PolarityFilter {
    pub fn matches(&self, record: &FeedbackRecord) -> bool {
        match self {
            PolarityFilter::All => true,
            PolarityFilter::Only(polarity) => record.polarity == *polarity,
        }
    }
}

impl FromStr for PolarityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ALL" | "all" => Ok(PolarityFilter::All),
            other => other.parse::<Polarity>().map(PolarityFilter::Only),
        }
    }
}

impl TryFrom<String> for PolarityFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PolarityFilter> for String {
    fn from(filter: PolarityFilter) -> Self {
        match filter {
            PolarityFilter::All => "ALL".to_string(),
            PolarityFilter::Only(polarity) => polarity.as_str().to_string(),
        }
    }
}

/// Records matching the filter, in their original order.
pub fn filter_by_polarity(
    records: &[FeedbackRecord],
    filter: PolarityFilter,
) -> Vec<FeedbackRecord> {
    records
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect()
}

/// `1 Item` / `N Items`.
pub fn item_count_label(count: usize) -> String {
    if count == 1 {
        "1 Item".to_string()
    } else {
        format!("{} Items", count)
    }
}

/// Render a feedback timestamp as `Mar 1, 2025, 10:15 AM` (UTC).
///
/// Offsets are normalized to UTC; naive timestamps are taken as UTC. Anything
/// unparseable is returned unchanged.
pub fn format_feedback_time(raw: &str) -> String {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"));

    match parsed {
        Ok(dt) => dt.format("%b %-d, %Y, %I:%M %p").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Positive/negative totals for a pie or doughnut.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentChart {
    pub labels: [&'static str; 2],
    pub values: [u64; 2],
}

pub fn sentiment_chart(stats: &FeedbackStats) -> SentimentChart {
    SentimentChart {
        labels: [Polarity::Positive.label(), Polarity::Negative.label()],
        values: [stats.positive_count, stats.negative_count],
    }
}

/// Per-sector positive vs negative bars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorComparisonChart {
    pub labels: Vec<String>,
    pub positive: Vec<u64>,
    pub negative: Vec<u64>,
}

pub fn sector_comparison_chart(stats: &FeedbackStats) -> SectorComparisonChart {
    let entries = stats.sector_breakdown.entries();
    SectorComparisonChart {
        labels: sectors(stats),
        positive: entries.iter().map(|e| e.counts.positive).collect(),
        negative: entries.iter().map(|e| e.counts.negative).collect(),
    }
}

/// Share of total feedback per sector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorDistributionChart {
    pub labels: Vec<String>,
    pub totals: Vec<u64>,
}

pub fn sector_distribution_chart(stats: &FeedbackStats) -> SectorDistributionChart {
    SectorDistributionChart {
        labels: sectors(stats),
        totals: stats
            .sector_breakdown
            .entries()
            .iter()
            .map(|e| e.counts.total)
            .collect(),
    }
}

/// One row of the sector table with its rounded shares.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorRow {
    pub sector: String,
    pub total: u64,
    pub positive: u64,
    pub negative: u64,
    pub positive_percentage: u32,
    pub negative_percentage: u32,
}

pub fn sector_rows(stats: &FeedbackStats) -> Vec<SectorRow> {
    stats
        .sector_breakdown
        .entries()
        .iter()
        .map(|entry| SectorRow {
            sector: entry.sector.clone(),
            total: entry.counts.total,
            positive: entry.counts.positive,
            negative: entry.counts.negative,
            positive_percentage: percentage(entry.counts.positive, entry.counts.total),
            negative_percentage: percentage(entry.counts.negative, entry.counts.total),
        })
        .collect()
}
