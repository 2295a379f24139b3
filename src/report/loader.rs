use calamine::{Data, Reader, Xlsx, open_workbook};
use log::debug;
use std::collections::HashSet;
use std::path::Path;

use super::table::{CellValue, PRODUCT_COLUMN, Record, RecordSet, SALES_COLUMN};
use crate::error::{ReportError, Result};

/// Columns that must be present for a report to be produced, in check order
pub const REQUIRED_COLUMNS: [&str; 2] = [SALES_COLUMN, PRODUCT_COLUMN];

/// Read the first worksheet of an `.xlsx` file, using the first row as headers
pub fn load_record_set<P: AsRef<Path>>(path: P) -> Result<RecordSet> {
    let path = path.as_ref();

    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        _ => {
            return Err(ReportError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    let mut workbook =
        open_workbook::<Xlsx<_>, _>(path).map_err(|e| ReportError::Load(e.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => range,
        Some(Err(e)) => return Err(ReportError::Load(e.to_string())),
        None => return Err(ReportError::Load("Excel file contains no sheets".to_string())),
    };

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_names(header_row),
        None => Vec::new(),
    };

    let raw_rows: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(convert_cell).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|c| !c.is_empty()))
        .collect();

    debug!(
        "Loaded {} data rows with headers {:?} from {}",
        raw_rows.len(),
        headers,
        path.display()
    );

    let record_set = build_record_set(headers, raw_rows);
    check_required_columns(&record_set)?;
    Ok(record_set)
}

/// Fails with the first required column the set lacks
pub fn check_required_columns(record_set: &RecordSet) -> Result<()> {
    for column in REQUIRED_COLUMNS {
        if !record_set.has_column(column) {
            return Err(ReportError::MissingColumn(column.to_string()));
        }
    }
    Ok(())
}

fn header_names(row: &[Data]) -> Vec<String> {
    let mut seen = HashSet::new();
    row.iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = cell.to_string().trim().to_string();
            let base = if name.is_empty() {
                format!("Unnamed: {}", idx)
            } else {
                name
            };

            // Duplicate headers become "Sales.1", "Sales.2", ...
            let mut unique = base.clone();
            let mut suffix = 1;
            while !seen.insert(unique.clone()) {
                unique = format!("{}.{}", base, suffix);
                suffix += 1;
            }
            unique
        })
        .collect()
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        other => CellValue::Text(other.to_string()),
    }
}

fn build_record_set(headers: Vec<String>, mut raw_rows: Vec<Vec<CellValue>>) -> RecordSet {
    for col in 0..headers.len() {
        normalize_numeric_column(&mut raw_rows, col);
    }

    let mut record_set = RecordSet::new(headers.clone());
    for cells in raw_rows {
        let record: Record = headers
            .iter()
            .cloned()
            .zip(cells)
            .filter(|(_, value)| !value.is_empty())
            .collect();
        record_set.push_row(record);
    }
    record_set
}

/// A column whose numbers are all integral is stored as integers, otherwise as floats
fn normalize_numeric_column(rows: &mut [Vec<CellValue>], col: usize) {
    let all_integral = rows
        .iter()
        .filter_map(|row| row.get(col))
        .all(|cell| match cell {
            CellValue::Float(f) => {
                f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64
            }
            _ => true,
        });

    for row in rows.iter_mut() {
        let Some(cell) = row.get_mut(col) else {
            continue;
        };
        *cell = match std::mem::take(cell) {
            CellValue::Float(f) if all_integral => CellValue::Int(f as i64),
            CellValue::Int(i) if !all_integral => CellValue::Float(i as f64),
            other => other,
        };
    }
}
