pub mod cli;
pub mod config;
pub mod error;
pub mod report;
pub mod ui;

pub use error::{ErrorCategory, ReportError};
pub use report::{ReportJob, ReportOutput};
