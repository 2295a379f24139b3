use log::{debug, warn};

use super::table::{CellValue, PRODUCT_COLUMN, RecordSet, SALES_COLUMN, record};
use crate::error::{ReportError, Result};

pub const TOTAL_LABEL: &str = "Total";
pub const AVERAGE_LABEL: &str = "Average";

/// Number of synthetic rows appended by [`augment`]
pub const SUMMARY_ROW_COUNT: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct SalesSummary {
    pub total: CellValue,
    pub average: CellValue,
    /// Sales cells that contributed to the statistics
    pub counted: usize,
}

/// Total and two-decimal average of the Sales column; empty cells are skipped
pub fn summarize(record_set: &RecordSet) -> Result<SalesSummary> {
    let mut int_total: Option<i64> = Some(0);
    let mut float_total = 0.0_f64;
    let mut counted = 0usize;

    for (idx, value) in record_set.column_values(SALES_COLUMN).enumerate() {
        match value {
            CellValue::Empty => continue,
            CellValue::Int(i) => {
                int_total = int_total.and_then(|t| t.checked_add(*i));
                float_total += *i as f64;
            }
            CellValue::Float(f) => {
                int_total = None;
                float_total += f;
            }
            other => {
                return Err(ReportError::NonNumericSales {
                    // Spreadsheet row: header is row 1
                    row: idx + 2,
                    value: other.to_string(),
                });
            }
        }
        counted += 1;
    }

    if counted == 0 {
        warn!("No Sales values found, reporting total 0 and average 0.0");
    }

    let average = if counted == 0 {
        0.0
    } else {
        round_half_away_from_zero(float_total / counted as f64, 2)
    };

    let total = match int_total {
        Some(t) => CellValue::Int(t),
        None => CellValue::Float(float_total),
    };

    debug!("Summarized {} Sales values: total={}, average={}", counted, total, average);

    Ok(SalesSummary {
        total,
        average: CellValue::Float(average),
        counted,
    })
}

/// Append the Total and Average rows, producing the set both writers consume
pub fn augment(mut record_set: RecordSet) -> Result<RecordSet> {
    let summary = summarize(&record_set)?;

    record_set.push_row(record([
        (PRODUCT_COLUMN, CellValue::from(TOTAL_LABEL)),
        (SALES_COLUMN, summary.total),
    ]));
    record_set.push_row(record([
        (PRODUCT_COLUMN, CellValue::from(AVERAGE_LABEL)),
        (SALES_COLUMN, summary.average),
    ]));

    Ok(record_set)
}

/// Round to `decimals` places, ties going away from zero (2.345 -> 2.35, -2.345 -> -2.35)
pub fn round_half_away_from_zero(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    // Absorb representation error so 1.005 * 100 = 100.49999... still rounds up
    let nudged = scaled + scaled.signum() * scaled.abs() * f64::EPSILON * 4.0;
    nudged.round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::table::record;

    fn sales_set(values: Vec<CellValue>) -> RecordSet {
        let mut set = RecordSet::new(vec![PRODUCT_COLUMN.into(), SALES_COLUMN.into()]);
        for (i, v) in values.into_iter().enumerate() {
            set.push_row(record([
                (PRODUCT_COLUMN, CellValue::Text(format!("Item {}", i))),
                (SALES_COLUMN, v),
            ]));
        }
        set
    }

    #[test]
    fn test_widget_gadget_totals() {
        let set = sales_set(vec![CellValue::Int(10), CellValue::Int(20)]);
        let summary = summarize(&set).unwrap();

        assert_eq!(summary.total, CellValue::Int(30));
        assert_eq!(summary.average, CellValue::Float(15.0));
        assert_eq!(summary.counted, 2);
    }

    #[test]
    fn test_augment_appends_total_then_average() {
        let set = sales_set(vec![CellValue::Float(1.5), CellValue::Float(2.25), CellValue::Float(3.0)]);
        let augmented = augment(set).unwrap();

        assert_eq!(augmented.row_count(), 3 + SUMMARY_ROW_COUNT);
        assert_eq!(augmented.value(3, PRODUCT_COLUMN), &CellValue::from(TOTAL_LABEL));
        assert_eq!(augmented.value(3, SALES_COLUMN), &CellValue::Float(6.75));
        assert_eq!(augmented.value(4, PRODUCT_COLUMN), &CellValue::from(AVERAGE_LABEL));
        assert_eq!(augmented.value(4, SALES_COLUMN), &CellValue::Float(2.25));
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let set = sales_set(vec![CellValue::Int(7), CellValue::Int(11), CellValue::Int(13)]);
        assert_eq!(summarize(&set).unwrap(), summarize(&set).unwrap());
    }

    #[test]
    fn test_empty_input_yields_zero() {
        let set = sales_set(Vec::new());
        let augmented = augment(set).unwrap();

        assert_eq!(augmented.row_count(), SUMMARY_ROW_COUNT);
        assert_eq!(augmented.value(0, SALES_COLUMN), &CellValue::Int(0));
        assert_eq!(augmented.value(1, SALES_COLUMN), &CellValue::Float(0.0));
    }

    #[test]
    fn test_empty_cells_are_skipped() {
        let set = sales_set(vec![CellValue::Int(4), CellValue::Empty, CellValue::Int(8)]);
        let summary = summarize(&set).unwrap();

        assert_eq!(summary.total, CellValue::Int(12));
        assert_eq!(summary.average, CellValue::Float(6.0));
        assert_eq!(summary.counted, 2);
    }

    #[test]
    fn test_non_numeric_sales_reports_row() {
        let set = sales_set(vec![CellValue::Int(4), CellValue::from("n/a")]);
        match summarize(&set) {
            Err(ReportError::NonNumericSales { row, value }) => {
                assert_eq!(row, 3);
                assert_eq!(value, "n/a");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_int_overflow_falls_back_to_float() {
        let set = sales_set(vec![CellValue::Int(i64::MAX), CellValue::Int(1)]);
        let summary = summarize(&set).unwrap();
        assert!(matches!(summary.total, CellValue::Float(_)));
    }

    #[test]
    fn test_rounding_ties_go_away_from_zero() {
        assert_eq!(round_half_away_from_zero(2.345, 2), 2.35);
        assert_eq!(round_half_away_from_zero(-2.345, 2), -2.35);
        assert_eq!(round_half_away_from_zero(1.005, 2), 1.01);
        assert_eq!(round_half_away_from_zero(2.5, 0), 3.0);
        assert_eq!(round_half_away_from_zero(10.0 / 3.0, 2), 3.33);
        assert_eq!(round_half_away_from_zero(0.0, 2), 0.0);
    }
}
