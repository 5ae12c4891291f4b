//! PDF report.
//!
//! A4 portrait, builtin Helvetica, one text line per table row. Rows that run
//! past the bottom margin continue on a new page.

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use super::{sector_table, summary_rows, Cell, ReportContext, SECTOR_HEADER, SUMMARY_HEADER};
use crate::errors::AppError;
use crate::models::FeedbackStats;

pub const TITLE: &str = "Feedback Analytics Report";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const LEFT: f32 = 14.0;
const TOP: f32 = 277.0;
const BOTTOM: f32 = 20.0;
const LINE: f32 = 7.0;
const SUMMARY_COLUMNS: [f32; 2] = [0.0, 70.0];
const SECTOR_COLUMNS: [f32; 6] = [0.0, 60.0, 82.0, 104.0, 126.0, 152.0];

struct Cursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl Cursor<'_> {
    /// Start a new page when the current line would fall below the margin.
    fn ensure_room(&mut self) {
        if self.y < BOTTOM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP;
            self.pages += 1;
        }
    }

    fn advance(&mut self, by: f32) {
        self.y -= by;
    }

    fn text(&mut self, text: &str, size: f32, x: f32, font: &IndirectFontRef) {
        self.ensure_room();
        self.layer
            .use_text(text, size, Mm(LEFT + x), Mm(self.y), font);
    }

    fn row(&mut self, cells: &[String], columns: &[f32], font: &IndirectFontRef) {
        for (cell, x) in cells.iter().zip(columns) {
            self.text(cell, 10.0, *x, font);
        }
        self.advance(LINE);
    }
}

fn cells(row: &[Cell]) -> Vec<String> {
    row.iter().map(Cell::display).collect()
}

fn names(header: &[&str]) -> Vec<String> {
    header.iter().map(|s| s.to_string()).collect()
}

pub fn render_document(
    stats: &FeedbackStats,
    context: &ReportContext,
) -> Result<Vec<u8>, AppError> {
    let (bytes, pages) = render_paged(stats, context)?;
    tracing::debug!("Document report spans {} page(s)", pages);
    Ok(bytes)
}

/// Render the report and report how many pages it took.
pub(crate) fn render_paged(
    stats: &FeedbackStats,
    context: &ReportContext,
) -> Result<(Vec<u8>, usize), AppError> {
    let (doc, page, layer) = PdfDocument::new(TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let pages = {
        let mut cursor = Cursor {
            doc: &doc,
            layer: doc.get_page(page).get_layer(layer),
            y: TOP,
            pages: 1,
        };

        cursor.text(TITLE, 18.0, 0.0, &bold);
        cursor.advance(8.0);
        cursor.text(
            &format!(
                "Generated on {} | Time Range: {}",
                context.generated_at.format("%Y-%m-%d %H:%M UTC"),
                context.range_label
            ),
            12.0,
            0.0,
            &regular,
        );
        cursor.advance(12.0);

        cursor.row(&names(&SUMMARY_HEADER), &SUMMARY_COLUMNS, &bold);
        for row in summary_rows(stats) {
            cursor.row(&cells(&row), &SUMMARY_COLUMNS, &regular);
        }

        cursor.advance(LINE);
        cursor.row(&names(&SECTOR_HEADER), &SECTOR_COLUMNS, &bold);
        for row in sector_table(stats) {
            cursor.row(&cells(&row), &SECTOR_COLUMNS, &regular);
        }
        cursor.pages
    };

    Ok((doc.save_to_bytes()?, pages))
}
