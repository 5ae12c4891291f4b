//! XLSX report with "Summary" and "Sector Breakdown" sheets.

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};

use super::{
    sector_table, summary_rows, time_range_row, Cell, ReportContext, SECTOR_HEADER, SUMMARY_HEADER,
};
use crate::errors::AppError;
use crate::models::FeedbackStats;

pub const SUMMARY_SHEET: &str = "Summary";
pub const SECTOR_SHEET: &str = "Sector Breakdown";

fn write_row(sheet: &mut Worksheet, row: u32, cells: &[Cell]) -> Result<(), XlsxError> {
    for (col, cell) in cells.iter().enumerate() {
        let col = col as u16;
        match cell {
            Cell::Number(n) => {
                sheet.write_number(row, col, *n as f64)?;
            }
            Cell::Text(s) => {
                sheet.write_string(row, col, s.as_str())?;
            }
        }
    }
    Ok(())
}

fn write_header(sheet: &mut Worksheet, names: &[&str], bold: &Format) -> Result<(), XlsxError> {
    for (col, name) in names.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, bold)?;
    }
    Ok(())
}

pub fn render_spreadsheet(
    stats: &FeedbackStats,
    context: &ReportContext,
) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    {
        let summary = workbook.add_worksheet();
        summary.set_name(SUMMARY_SHEET)?;
        write_header(summary, &SUMMARY_HEADER, &bold)?;
        let mut row = 1;
        for cells in summary_rows(stats) {
            write_row(summary, row, &cells)?;
            row += 1;
        }
        write_row(summary, row, &time_range_row(context))?;
    }

    {
        let sectors = workbook.add_worksheet();
        sectors.set_name(SECTOR_SHEET)?;
        write_header(sectors, &SECTOR_HEADER, &bold)?;
        for (index, cells) in sector_table(stats).iter().enumerate() {
            write_row(sectors, index as u32 + 1, cells)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}
