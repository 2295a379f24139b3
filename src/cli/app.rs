use super::commands::process::ProcessCommand;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sales-report")]
#[command(about = "Turn a sales spreadsheet into a styled Excel summary and a PDF report")]
#[command(version)]
pub struct Cli {
    /// Without a subcommand the interactive window opens
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate both reports for one file without opening the window
    Process(ProcessCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_no_arguments_opens_window() {
        let cli = Cli::try_parse_from(["sales-report"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_process_arguments() {
        let cli = Cli::try_parse_from(["sales-report", "process", "q1.xlsx", "--output-dir", "out"])
            .unwrap();
        match cli.command {
            Some(Commands::Process(args)) => {
                assert_eq!(args.file, PathBuf::from("q1.xlsx"));
                assert_eq!(args.output_dir, Some(PathBuf::from("out")));
            }
            None => panic!("expected process subcommand"),
        }
    }

    #[test]
    fn test_process_requires_file() {
        assert!(Cli::try_parse_from(["sales-report", "process"]).is_err());
    }
}
