//! Load → aggregate → write pipeline behind both the TUI and headless mode

pub mod aggregate;
pub mod loader;
pub mod naming;
pub mod pdf;
pub mod styles;
pub mod table;
pub mod xlsx;

use chrono::{DateTime, Local};
use log::info;
use std::path::PathBuf;

pub use aggregate::{SalesSummary, augment, summarize};
pub use loader::load_record_set;
pub use naming::OutputPaths;
pub use table::{CellValue, Record, RecordSet};

use crate::config::OutputSettings;
use crate::error::{ReportError, Result};

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub paths: OutputPaths,
    pub data_rows: usize,
    pub summary: SalesSummary,
}

impl ReportOutput {
    pub fn success_message(&self) -> String {
        format!(
            "✅ Excel report saved as {}\n✅ PDF report saved as {}",
            self.paths.workbook_name(),
            self.paths.pdf_name()
        )
    }
}

/// One report run over a single input file
#[derive(Debug, Clone)]
pub struct ReportJob {
    input: PathBuf,
    output_dir: PathBuf,
    timestamp_format: String,
}

impl ReportJob {
    pub fn new(input: impl Into<PathBuf>, settings: &OutputSettings) -> Self {
        Self {
            input: input.into(),
            output_dir: settings.directory.clone(),
            timestamp_format: settings.timestamp_format.clone(),
        }
    }

    pub fn run(&self) -> Result<ReportOutput> {
        self.run_at(&Local::now())
    }

    /// Run with an explicit clock so output names are reproducible
    pub fn run_at(&self, now: &DateTime<Local>) -> Result<ReportOutput> {
        info!("Processing {}", self.input.display());

        let record_set = load_record_set(&self.input)?;
        let data_rows = record_set.row_count();
        let summary = summarize(&record_set)?;
        let augmented = augment(record_set)?;

        if !self.output_dir.as_os_str().is_empty() && !self.output_dir.exists() {
            std::fs::create_dir_all(&self.output_dir)
                .map_err(|e| ReportError::write(&self.output_dir, e))?;
            info!("Created output directory: {}", self.output_dir.display());
        }

        let paths = OutputPaths::new(&self.output_dir, now, &self.timestamp_format);

        // Both writers read the same augmented set; a PDF failure leaves the workbook in place
        xlsx::write_workbook(&augmented, &paths.workbook)?;
        pdf::write_pdf(&augmented, &paths.pdf)?;

        info!(
            "Report complete: {} data rows, total {}, average {}",
            data_rows, summary.total, summary.average
        );

        Ok(ReportOutput {
            paths,
            data_rows,
            summary,
        })
    }
}
