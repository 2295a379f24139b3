use anyhow::Result;
use clap::Args;
use colored::*;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Config;
use crate::report::ReportJob;

#[derive(Args, Debug)]
pub struct ProcessCommand {
    /// Sales workbook (.xlsx) with Product and Sales columns
    pub file: PathBuf,

    /// Directory for the generated reports (defaults to the configured one)
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,
}

/// Headless run: same pipeline and messages as the window, printed to the terminal.
///
/// Report failures are printed here and turned into a failing exit code;
/// `Err` is left for problems outside the report itself.
pub fn process_command(args: ProcessCommand, config: &Config) -> Result<ExitCode> {
    let mut output = config.output.clone();
    if let Some(dir) = args.output_dir {
        output.directory = dir;
    }

    info!("Headless processing of {}", args.file.display());

    match ReportJob::new(&args.file, &output).run() {
        Ok(report) => {
            for line in report.success_message().lines() {
                println!("{}", line.green());
            }
            println!(
                "{} {}   {} {}",
                "Total:".bold(),
                report.summary.total,
                "Average:".bold(),
                report.summary.average
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("Failed to process {}: {}", args.file.display(), e);
            eprintln!("{} {}", "✗".bright_red().bold(), e.user_message().red());
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn exit_code_name(code: ExitCode) -> String {
        format!("{:?}", code)
    }

    fn args(file: PathBuf, output_dir: PathBuf) -> ProcessCommand {
        ProcessCommand {
            file,
            output_dir: Some(output_dir),
        }
    }

    #[test]
    fn test_report_failure_is_exit_code_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.xlsx");

        let code = process_command(args(missing, dir.path().to_path_buf()), &Config::default()).unwrap();

        assert_eq!(exit_code_name(code), exit_code_name(ExitCode::FAILURE));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_successful_run_exits_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sales.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "Product").unwrap();
        sheet.write_string(0, 1, "Sales").unwrap();
        sheet.write_string(1, 0, "Widget").unwrap();
        sheet.write_number(1, 1, 10.0).unwrap();
        workbook.save(&input).unwrap();

        let out = dir.path().join("out");
        let code = process_command(args(input, out.clone()), &Config::default()).unwrap();

        assert_eq!(exit_code_name(code), exit_code_name(ExitCode::SUCCESS));
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 2);
    }
}
