use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use log::warn;
use std::fmt::{Display, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M";

/// The pair of files one run produces, sharing a single timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub workbook: PathBuf,
    pub pdf: PathBuf,
}

impl OutputPaths {
    pub fn new<Tz>(dir: &Path, now: &DateTime<Tz>, timestamp_format: &str) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut stamp = String::new();
        if write!(stamp, "{}", now.format(timestamp_format)).is_err() {
            warn!("Invalid timestamp format '{}', using default", timestamp_format);
            stamp.clear();
            let _ = write!(stamp, "{}", now.format(DEFAULT_TIMESTAMP_FORMAT));
        }
        Self {
            workbook: dir.join(format!("cleaned_{}.xlsx", stamp)),
            pdf: dir.join(format!("report_{}.pdf", stamp)),
        }
    }

    pub fn workbook_name(&self) -> String {
        file_name(&self.workbook)
    }

    pub fn pdf_name(&self) -> String {
        file_name(&self.pdf)
    }
}

/// True when every strftime specifier in `format` is understood by chrono
pub fn is_valid_timestamp_format(format: &str) -> bool {
    !format.is_empty() && StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, Utc};

    #[test]
    fn test_names_share_minute_stamp() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 59).unwrap();
        let paths = OutputPaths::new(Path::new("."), &now, DEFAULT_TIMESTAMP_FORMAT);

        assert_eq!(paths.workbook_name(), "cleaned_2024-03-09_14-05.xlsx");
        assert_eq!(paths.pdf_name(), "report_2024-03-09_14-05.pdf");
        assert_eq!(paths.workbook, Path::new(".").join("cleaned_2024-03-09_14-05.xlsx"));
    }

    #[test]
    fn test_same_minute_collides() {
        let first = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 1).unwrap();
        let second = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 58).unwrap();

        assert_eq!(
            OutputPaths::new(Path::new("out"), &first, DEFAULT_TIMESTAMP_FORMAT),
            OutputPaths::new(Path::new("out"), &second, DEFAULT_TIMESTAMP_FORMAT)
        );
    }

    #[test]
    fn test_custom_format_with_seconds() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let paths = OutputPaths::new(Path::new("."), &now, "%Y%m%d-%H%M%S");
        assert_eq!(paths.pdf_name(), "report_20240309-140507.pdf");
    }

    #[test]
    fn test_timestamp_format_validation() {
        assert!(is_valid_timestamp_format(DEFAULT_TIMESTAMP_FORMAT));
        assert!(!is_valid_timestamp_format("%Y-%Q"));
        assert!(!is_valid_timestamp_format(""));
    }
}
