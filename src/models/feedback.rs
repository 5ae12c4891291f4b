//! Feedback records, aggregate statistics and the analytic time ranges.

use std::fmt;
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sentiment classification of a feedback record.
///
/// Feedback records carry `POSITIVE`/`NEGATIVE`. The feedback screen's filter
/// values arrive as `positive`/`negative`. Both spellings parse to the same
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    #[serde(rename = "POSITIVE", alias = "positive")]
    Positive,
    #[serde(rename = "NEGATIVE", alias = "negative")]
    Negative,
}

impl Polarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Positive => "POSITIVE",
            Polarity::Negative => "NEGATIVE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Polarity::Positive => "Positive",
            Polarity::Negative => "Negative",
        }
    }
}

impl FromStr for Polarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POSITIVE" | "positive" => Ok(Polarity::Positive),
            "NEGATIVE" | "negative" => Ok(Polarity::Negative),
            other => Err(format!("Unknown feedback type: {}", other)),
        }
    }
}

/// A single piece of customer feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub id: i64,
    #[serde(rename = "feedback_text")]
    pub text: String,
    #[serde(rename = "feedback_type")]
    pub polarity: Polarity,
    /// ISO-8601 timestamp as sent by the server
    #[serde(rename = "feedback_time")]
    pub timestamp: String,
    #[serde(default)]
    pub sector: Option<String>,
}

/// Per-sector feedback counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorCounts {
    pub total: u64,
    pub positive: u64,
    pub negative: u64,
}

/// One row of the sector breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorEntry {
    pub sector: String,
    pub counts: SectorCounts,
}

/// Sector breakdown in the order the server listed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectorBreakdown(Vec<SectorEntry>);

impl SectorBreakdown {
    pub fn new(entries: Vec<SectorEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[SectorEntry] {
        &self.0
    }

    pub fn get(&self, sector: &str) -> Option<&SectorCounts> {
        self.0
            .iter()
            .find(|entry| entry.sector == sector)
            .map(|entry| &entry.counts)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Serialize for SectorBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|entry| (&entry.sector, &entry.counts)))
    }
}

impl<'de> Deserialize<'de> for SectorBreakdown {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BreakdownVisitor;

        impl<'de> Visitor<'de> for BreakdownVisitor {
            type Value = SectorBreakdown;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of sector name to counts")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> Result<Self::Value, A::Error> {
                let capacity = map.size_hint().unwrap_or(0);
                let mut entries: Vec<SectorEntry> = Vec::with_capacity(capacity);
                while let Some((sector, counts)) = map.next_entry::<String, SectorCounts>()? {
                    // A repeated key keeps its first position and its last value
                    match entries.iter_mut().find(|entry| entry.sector == sector) {
                        Some(existing) => existing.counts = counts,
                        None => entries.push(SectorEntry { sector, counts }),
                    }
                }
                Ok(SectorBreakdown(entries))
            }
        }

        deserializer.deserialize_map(BreakdownVisitor)
    }
}

/// Aggregate feedback statistics for a time range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackStats {
    #[serde(rename = "total_feedbacks")]
    pub total_count: u64,
    #[serde(rename = "total_positive")]
    pub positive_count: u64,
    #[serde(rename = "total_negative")]
    pub negative_count: u64,
    #[serde(rename = "sector_breakdown", default)]
    pub sector_breakdown: SectorBreakdown,
}

/// Time window selectable on the analytic screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "7")]
    Last7Days,
    #[serde(rename = "30")]
    Last30Days,
    #[serde(rename = "90")]
    Last90Days,
    #[serde(rename = "all")]
    AllTime,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::Last7Days,
        TimeRange::Last30Days,
        TimeRange::Last90Days,
        TimeRange::AllTime,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Last7Days => "7",
            TimeRange::Last30Days => "30",
            TimeRange::Last90Days => "90",
            TimeRange::AllTime => "all",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Last7Days => "Last 7 days",
            TimeRange::Last30Days => "Last 30 days",
            TimeRange::Last90Days => "Last 90 days",
            TimeRange::AllTime => "All time",
        }
    }

    /// Value of the `days` query parameter; `None` requests an unbounded range.
    pub fn days(&self) -> Option<u32> {
        match self {
            TimeRange::Last7Days => Some(7),
            TimeRange::Last30Days => Some(30),
            TimeRange::Last90Days => Some(90),
            TimeRange::AllTime => None,
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeRange::ALL
            .into_iter()
            .find(|range| range.as_str() == s)
            .ok_or_else(|| format!("Unknown time range: {}", s))
    }
}
