//! Report exporters.
//!
//! All three formats render the same two tables (summary and sector
//! breakdown) from a stats snapshot, the selected range label and a
//! generation timestamp. Each is a pure function returning the file bytes.

mod csv;
mod document;
mod spreadsheet;

pub use csv::render_csv;
pub use document::render_document;
pub use spreadsheet::render_spreadsheet;

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::AppError;
use crate::models::FeedbackStats;
use crate::shape::{percent_label, percentage, sector_rows};

/// Downloadable report format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Spreadsheet,
    Document,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::Document => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Document => "application/pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Spreadsheet),
            "pdf" => Ok(ExportFormat::Document),
            other => Err(format!("Unsupported export format: {}", other)),
        }
    }
}

/// `feedback_report_2025-03-01.csv`
pub fn report_filename(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "feedback_report_{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

/// Inputs shared by every exporter besides the stats themselves.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub range_label: String,
    pub generated_at: DateTime<Utc>,
}

/// A table cell; numbers and text are written differently by each format.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(u64),
    Text(String),
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn display(&self) -> String {
        match self {
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

pub const SUMMARY_HEADER: [&str; 2] = ["Metric", "Value"];
pub const SECTOR_HEADER: [&str; 6] = [
    "Sector",
    "Total",
    "Positive",
    "Negative",
    "Positive %",
    "Negative %",
];

/// Summary metrics without the time-range row.
pub fn summary_rows(stats: &FeedbackStats) -> Vec<[Cell; 2]> {
    vec![
        [Cell::text("Total Feedbacks"), Cell::Number(stats.total_count)],
        [Cell::text("Positive Feedbacks"), Cell::Number(stats.positive_count)],
        [Cell::text("Negative Feedbacks"), Cell::Number(stats.negative_count)],
        [
            Cell::text("Positive Percentage"),
            Cell::text(percent_label(percentage(stats.positive_count, stats.total_count))),
        ],
        [
            Cell::text("Negative Percentage"),
            Cell::text(percent_label(percentage(stats.negative_count, stats.total_count))),
        ],
    ]
}

fn time_range_row(context: &ReportContext) -> [Cell; 2] {
    [Cell::text("Time Range"), Cell::text(context.range_label.clone())]
}

/// Sector table body in server order.
pub fn sector_table(stats: &FeedbackStats) -> Vec<[Cell; 6]> {
    sector_rows(stats)
        .into_iter()
        .map(|row| {
            [
                Cell::Text(row.sector),
                Cell::Number(row.total),
                Cell::Number(row.positive),
                Cell::Number(row.negative),
                Cell::text(percent_label(row.positive_percentage)),
                Cell::text(percent_label(row.negative_percentage)),
            ]
        })
        .collect()
}

/// Render a report in the requested format.
pub fn render(
    format: ExportFormat,
    stats: &FeedbackStats,
    context: &ReportContext,
) -> Result<Vec<u8>, AppError> {
    let bytes = match format {
        ExportFormat::Csv => render_csv(stats, context).into_bytes(),
        ExportFormat::Spreadsheet => render_spreadsheet(stats, context)?,
        ExportFormat::Document => render_document(stats, context)?,
    };
    tracing::info!(
        "Rendered {} report ({} bytes, {} sectors)",
        format.extension(),
        bytes.len(),
        stats.sector_breakdown.len()
    );
    Ok(bytes)
}
