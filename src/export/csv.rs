//! CSV report.

use super::{
    sector_table, summary_rows, time_range_row, Cell, ReportContext, SECTOR_HEADER, SUMMARY_HEADER,
};
use crate::models::FeedbackStats;

/// Numbers go out bare; text is quoted with embedded quotes doubled.
fn csv_cell(cell: &Cell) -> String {
    match cell {
        Cell::Number(n) => n.to_string(),
        Cell::Text(s) => format!("\"{}\"", s.replace('"', "\"\"")),
    }
}

fn csv_row<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> String {
    cells.into_iter().map(csv_cell).collect::<Vec<_>>().join(",")
}

fn header_row(names: &[&str]) -> String {
    let cells: Vec<Cell> = names
        .iter()
        .map(|name| Cell::Text(name.to_string()))
        .collect();
    csv_row(&cells)
}

/// Summary table, a blank separator line, then the sector table.
pub fn render_csv(stats: &FeedbackStats, context: &ReportContext) -> String {
    let mut lines = vec![header_row(&SUMMARY_HEADER)];
    for row in summary_rows(stats) {
        lines.push(csv_row(&row));
    }
    lines.push(csv_row(&time_range_row(context)));
    lines.push(String::new());
    lines.push(header_row(&SECTOR_HEADER));
    for row in sector_table(stats) {
        lines.push(csv_row(&row));
    }
    lines.join("\n")
}
