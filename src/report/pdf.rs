//! PDF rendering of the sales table
//!
//! Layout works top-down in millimetres like a printed form: a cursor moves
//! from the top margin towards the bottom and a new page starts when the next
//! row would cross the bottom margin. Coordinates are flipped to PDF space
//! (origin bottom-left) only when drawing.

use log::{debug, info};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerIndex, PdfLayerReference, PdfPageIndex, Point, Rgb,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::table::{PRODUCT_COLUMN, RecordSet, SALES_COLUMN};
use crate::error::{ReportError, Result};

pub const TITLE: &str = "Sales Report";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const BOTTOM_MARGIN: f32 = 20.0;
const ROW_HEIGHT: f32 = 10.0;
const TITLE_GAP: f32 = 10.0;
const PRODUCT_WIDTH: f32 = 90.0;
const SALES_WIDTH: f32 = 50.0;
/// 0.2 mm, in points
const BORDER_THICKNESS: f32 = 0.567;

const PT_TO_MM: f32 = 25.4 / 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
}

// Advance widths for ASCII 32..=126 in 1/1000 em, from the standard Helvetica metrics
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

// Latin-1 letters above ASCII are not in the tables; an average glyph keeps them roughly centred
const FALLBACK_WIDTH: u16 = 556;

#[derive(Debug, Clone, Copy)]
struct TextStyle {
    face: Face,
    size_pt: f32,
}

const TITLE_STYLE: TextStyle = TextStyle { face: Face::Bold, size_pt: 16.0 };
const HEADER_STYLE: TextStyle = TextStyle { face: Face::Bold, size_pt: 12.0 };
const BODY_STYLE: TextStyle = TextStyle { face: Face::Regular, size_pt: 12.0 };

/// True when the built-in fonts can draw `c`.
///
/// Built-in fonts are written with WinAnsi encoding, which silently drops
/// anything else, so only printable Latin-1 (plus tab and newline) is accepted.
pub fn is_encodable(c: char) -> bool {
    matches!(c, '\t' | '\n' | ' '..='~' | '\u{a0}'..='\u{ff}')
}

/// Fails with the first string the PDF fonts cannot represent
fn check_encodable<'a>(texts: impl IntoIterator<Item = &'a str>, path: &Path) -> Result<()> {
    for text in texts {
        if let Some(c) = text.chars().find(|c| !is_encodable(*c)) {
            return Err(ReportError::write(
                path,
                format!("character '{}' in \"{}\" cannot be encoded in the PDF font", c, text),
            ));
        }
    }
    Ok(())
}

/// Rendered width of `text` in millimetres
pub fn text_width_mm(text: &str, face: Face, size_pt: f32) -> f32 {
    let table = match face {
        Face::Regular => &HELVETICA_WIDTHS,
        Face::Bold => &HELVETICA_BOLD_WIDTHS,
    };
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (32..=126).contains(&code) {
                table[(code - 32) as usize] as u32
            } else {
                FALLBACK_WIDTH as u32
            }
        })
        .sum();
    units as f32 / 1000.0 * size_pt * PT_TO_MM
}

/// Where a table row lands: page number (0-based) and distance of its top edge from the page top
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPlacement {
    pub page: usize,
    pub top: f32,
}

/// Top-down cursor shared by the planner and the renderer
#[derive(Debug, Clone, Copy)]
struct Cursor {
    page: usize,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self { page: 0, y: MARGIN }
    }

    /// Reserve `height` mm, breaking to a new page first when it would not fit
    fn take(&mut self, height: f32) -> RowPlacement {
        if self.y + height > PAGE_HEIGHT - BOTTOM_MARGIN {
            self.page += 1;
            self.y = MARGIN;
        }
        let placement = RowPlacement {
            page: self.page,
            top: self.y,
        };
        self.y += height;
        placement
    }
}

/// Placements of the title, the header row and `data_rows` table rows
pub fn plan_layout(data_rows: usize) -> (RowPlacement, RowPlacement, Vec<RowPlacement>) {
    let mut cursor = Cursor::new();
    let title = cursor.take(ROW_HEIGHT);
    cursor.y += TITLE_GAP;
    let header = cursor.take(ROW_HEIGHT);
    let rows = (0..data_rows).map(|_| cursor.take(ROW_HEIGHT)).collect();
    (title, header, rows)
}

struct PdfWriter {
    doc: PdfDocumentReference,
    pages: Vec<(PdfPageIndex, PdfLayerIndex)>,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl PdfWriter {
    fn new(path: &Path) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::write(path, e))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::write(path, e))?;

        Ok(Self {
            doc,
            pages: vec![(page, layer)],
            regular,
            bold,
        })
    }

    fn layer(&mut self, page: usize) -> PdfLayerReference {
        while self.pages.len() <= page {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.pages.push((page, layer));
        }
        let (page, layer) = self.pages[page];
        let layer = self.doc.get_page(page).get_layer(layer);
        layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
        layer.set_outline_thickness(BORDER_THICKNESS);
        layer
    }

    /// Draw a cell with its text centred horizontally and vertically
    fn cell(&mut self, at: RowPlacement, x: f32, width: f32, text: &str, style: TextStyle, border: bool) {
        let layer = self.layer(at.page);

        if border {
            let top = PAGE_HEIGHT - at.top;
            let bottom = top - ROW_HEIGHT;
            let outline = Line {
                points: vec![
                    (Point::new(Mm(x), Mm(top)), false),
                    (Point::new(Mm(x + width), Mm(top)), false),
                    (Point::new(Mm(x + width), Mm(bottom)), false),
                    (Point::new(Mm(x), Mm(bottom)), false),
                ],
                is_closed: true,
            };
            layer.add_line(outline);
        }

        if text.is_empty() {
            return;
        }

        let text_x = x + (width - text_width_mm(text, style.face, style.size_pt)) / 2.0;
        let baseline = at.top + ROW_HEIGHT / 2.0 + 0.3 * style.size_pt * PT_TO_MM;
        let font = match style.face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
        };
        layer.use_text(text, style.size_pt, Mm(text_x), Mm(PAGE_HEIGHT - baseline), font);
    }

    fn save(self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| ReportError::write(path, e))?;
        self.doc
            .save(&mut BufWriter::new(file))
            .map_err(|e| ReportError::write(path, e))
    }
}

/// Render the augmented record set as a two-column bordered table
pub fn write_pdf(record_set: &RecordSet, path: &Path) -> Result<()> {
    let cells: Vec<(String, String)> = (0..record_set.row_count())
        .map(|row| {
            (
                record_set.value(row, PRODUCT_COLUMN).to_string(),
                record_set.value(row, SALES_COLUMN).to_string(),
            )
        })
        .collect();

    let labels = [TITLE, PRODUCT_COLUMN, SALES_COLUMN];
    check_encodable(
        labels
            .into_iter()
            .chain(cells.iter().flat_map(|(product, sales)| [product.as_str(), sales.as_str()])),
        path,
    )?;

    let mut writer = PdfWriter::new(path)?;
    let (title, header, rows) = plan_layout(cells.len());

    writer.cell(title, MARGIN, PAGE_WIDTH - 2.0 * MARGIN, TITLE, TITLE_STYLE, false);

    writer.cell(header, MARGIN, PRODUCT_WIDTH, PRODUCT_COLUMN, HEADER_STYLE, true);
    writer.cell(header, MARGIN + PRODUCT_WIDTH, SALES_WIDTH, SALES_COLUMN, HEADER_STYLE, true);

    for ((product, sales), placement) in cells.iter().zip(rows) {
        writer.cell(placement, MARGIN, PRODUCT_WIDTH, product, BODY_STYLE, true);
        writer.cell(placement, MARGIN + PRODUCT_WIDTH, SALES_WIDTH, sales, BODY_STYLE, true);
    }

    debug!(
        "Rendered {} table rows over {} page(s)",
        cells.len(),
        writer.pages.len()
    );

    writer.save(path)?;
    info!("PDF report saved to {}", path.display());
    Ok(())
}
