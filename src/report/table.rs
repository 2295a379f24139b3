//! In-memory record set shared by the loader, the aggregator and both writers

use std::collections::HashMap;
use std::fmt;

pub const PRODUCT_COLUMN: &str = "Product";
pub const SALES_COLUMN: &str = "Sales";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(i) => write!(f, "{}", i),
            // Integral floats keep a trailing ".0" so 15.0 never reads as an integer
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Bool(b) => f.write_str(if *b { "True" } else { "False" }),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

pub type Record = HashMap<String, CellValue>;

/// Ordered rows of named columns; the header order is preserved for output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl RecordSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Appends a row; keys that are not known columns are ignored
    pub fn push_row(&mut self, mut record: Record) {
        record.retain(|key, _| self.columns.iter().any(|c| c == key));
        self.rows.push(record);
    }

    /// Cell lookup that treats absent keys as empty
    pub fn value(&self, row: usize, column: &str) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY)
    }

    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a CellValue> + 'a {
        (0..self.rows.len()).map(move |row| self.value(row, column))
    }
}

/// Convenience for building records from `(column, value)` pairs
pub fn record<I, K, V>(pairs: I) -> Record
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<CellValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_report_text() {
        assert_eq!(CellValue::Int(30).to_string(), "30");
        assert_eq!(CellValue::Float(15.0).to_string(), "15.0");
        assert_eq!(CellValue::Float(12.34).to_string(), "12.34");
        assert_eq!(CellValue::Text("Widget".into()).to_string(), "Widget");
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::Bool(true).to_string(), "True");
    }

    #[test]
    fn test_push_row_drops_unknown_columns() {
        let mut set = RecordSet::new(vec!["Product".into(), "Sales".into()]);
        set.push_row(record([("Product", CellValue::from("Widget")), ("Region", "North".into())]));

        assert_eq!(set.row_count(), 1);
        assert_eq!(set.value(0, "Product"), &CellValue::Text("Widget".into()));
        assert_eq!(set.value(0, "Region"), &CellValue::Empty);
        assert_eq!(set.value(0, "Sales"), &CellValue::Empty);
    }
}
