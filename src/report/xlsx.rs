use log::{debug, info};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

use super::styles::StyleSheet;
use super::table::{CellValue, RecordSet};
use crate::error::{ReportError, Result};

pub const SHEET_NAME: &str = "Sales Report";

/// Extra characters added to the widest value of each column
const WIDTH_PADDING: usize = 2;

const MAX_COLUMNS: usize = 16_384;

/// Write the augmented record set to a single styled worksheet
pub fn write_workbook(record_set: &RecordSet, path: &Path) -> Result<()> {
    if record_set.column_count() > MAX_COLUMNS {
        return Err(ReportError::write(
            path,
            format!("{} columns exceed the Excel limit of {}", record_set.column_count(), MAX_COLUMNS),
        ));
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    fill_sheet(sheet, record_set, &StyleSheet::default())
        .map_err(|e| ReportError::write(path, e))?;

    workbook
        .save(path)
        .map_err(|e| ReportError::write(path, e))?;

    info!("Excel report saved to {}", path.display());
    Ok(())
}

fn fill_sheet(
    sheet: &mut Worksheet,
    record_set: &RecordSet,
    styles: &StyleSheet,
) -> std::result::Result<(), XlsxError> {
    sheet.set_name(SHEET_NAME)?;

    // Header counts as a sheet row for style targeting
    let sheet_rows = record_set.row_count() as u32 + 1;

    let header_format = styles.resolve(0, sheet_rows).to_format();
    for (col, name) in record_set.columns().iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, name, &header_format)?;
    }

    for row in 0..record_set.row_count() {
        let sheet_row = row as u32 + 1;
        let format = styles.resolve(sheet_row, sheet_rows).to_format();
        for (col, name) in record_set.columns().iter().enumerate() {
            write_cell(sheet, sheet_row, col as u16, record_set.value(row, name), &format)?;
        }
    }

    // Widths go last so they reflect every written value
    for (col, width) in column_widths(record_set).into_iter().enumerate() {
        sheet.set_column_width(col as u16, width as f64)?;
    }

    debug!(
        "Wrote {} rows x {} columns to sheet '{}'",
        sheet_rows,
        record_set.column_count(),
        SHEET_NAME
    );
    Ok(())
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: &Format,
) -> std::result::Result<(), XlsxError> {
    match value {
        CellValue::Empty => sheet.write_blank(row, col, format)?,
        CellValue::Text(s) => sheet.write_string_with_format(row, col, s, format)?,
        CellValue::Int(i) => sheet.write_number_with_format(row, col, *i as f64, format)?,
        CellValue::Float(f) => sheet.write_number_with_format(row, col, *f, format)?,
        CellValue::Bool(b) => sheet.write_boolean_with_format(row, col, *b, format)?,
    };
    Ok(())
}

/// Width of each column: longest non-empty display value (header included) plus padding
pub fn column_widths(record_set: &RecordSet) -> Vec<usize> {
    record_set
        .columns()
        .iter()
        .map(|name| {
            let longest_value = record_set
                .column_values(name)
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string().chars().count())
                .max()
                .unwrap_or(0);
            name.chars().count().max(longest_value) + WIDTH_PADDING
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::table::record;

    #[test]
    fn test_column_widths() {
        let mut set = RecordSet::new(vec!["Product".into(), "Sales".into(), "Note".into()]);
        set.push_row(record([
            ("Product", CellValue::from("Extra Large Widget")),
            ("Sales", CellValue::Int(1200)),
        ]));
        set.push_row(record([
            ("Product", CellValue::from("Average")),
            ("Sales", CellValue::Float(1234.56)),
        ]));

        // "Extra Large Widget" = 18, "1234.56" = 7 vs "Sales" = 5, "Note" = 4
        assert_eq!(column_widths(&set), vec![20, 9, 6]);
    }
}
