//! Window state machine
//!
//! `Idle → FileSelected → Processing → Done | Error → Idle/FileSelected`.
//! Transitions are plain functions of the current state and an [`Action`], so
//! they can be exercised without a terminal. Side effects (opening the file
//! browser, running the report, quitting) are returned as a [`Command`] for the
//! event loop to carry out.

use crate::error::{ErrorCategory, ReportError};
use crate::report::ReportOutput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    PathField,
    Browse,
    Process,
    Exit,
}

impl Focus {
    const ORDER: [Focus; 4] = [Focus::PathField, Focus::Browse, Focus::Process, Focus::Exit];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Error dialog contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub category: ErrorCategory,
    pub message: String,
}

impl From<&ReportError> for Notice {
    fn from(err: &ReportError) -> Self {
        Self {
            category: err.category(),
            message: err.user_message(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Phase {
    Idle,
    FileSelected,
    Processing,
    Done(ReportOutput),
    Error(Notice),
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::FileSelected => "FileSelected",
            Phase::Processing => "Processing",
            Phase::Done(_) => "Done",
            Phase::Error(_) => "Error",
        }
    }

    /// A dialog is on screen and swallows input until dismissed
    pub fn is_modal(&self) -> bool {
        matches!(self, Phase::Done(_) | Phase::Error(_))
    }
}

#[derive(Debug)]
pub enum Action {
    TypeChar(char),
    Backspace,
    ClearPath,
    FocusNext,
    FocusPrev,
    /// Enter on whatever currently has focus
    Activate,
    Browse,
    /// File picked in the browser
    PathChosen(String),
    Process,
    Finished(Result<ReportOutput, ReportError>),
    Dismiss,
    Exit,
}

/// Work the event loop has to perform after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    OpenBrowser,
    RunReport(String),
    Quit,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub path_input: String,
    pub focus: Focus,
    pub phase: Phase,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            path_input: String::new(),
            focus: Focus::PathField,
            phase: Phase::Idle,
        }
    }

    fn resting_phase(&self) -> Phase {
        if self.path_input.trim().is_empty() {
            Phase::Idle
        } else {
            Phase::FileSelected
        }
    }

    pub fn update(&mut self, action: Action) -> Command {
        match self.phase {
            Phase::Processing => self.update_processing(action),
            Phase::Done(_) | Phase::Error(_) => self.update_modal(action),
            Phase::Idle | Phase::FileSelected => self.update_form(action),
        }
    }

    fn update_processing(&mut self, action: Action) -> Command {
        match action {
            Action::Finished(Ok(output)) => {
                self.phase = Phase::Done(output);
            }
            Action::Finished(Err(err)) => {
                self.phase = Phase::Error(Notice::from(&err));
            }
            // The run is synchronous; anything else arriving now is stale
            _ => {}
        }
        Command::None
    }

    fn update_modal(&mut self, action: Action) -> Command {
        match action {
            Action::Exit => Command::Quit,
            Action::Finished(_) => Command::None,
            _ => {
                self.phase = self.resting_phase();
                Command::None
            }
        }
    }

    fn update_form(&mut self, action: Action) -> Command {
        let command = match action {
            Action::TypeChar(c) => {
                if self.focus == Focus::PathField {
                    self.path_input.push(c);
                }
                Command::None
            }
            Action::Backspace => {
                if self.focus == Focus::PathField {
                    self.path_input.pop();
                }
                Command::None
            }
            Action::ClearPath => {
                self.path_input.clear();
                Command::None
            }
            Action::FocusNext => {
                self.focus = self.focus.next();
                Command::None
            }
            Action::FocusPrev => {
                self.focus = self.focus.prev();
                Command::None
            }
            Action::Activate => {
                return match self.focus {
                    Focus::Browse => self.update_form(Action::Browse),
                    Focus::Exit => self.update_form(Action::Exit),
                    Focus::PathField | Focus::Process => self.update_form(Action::Process),
                };
            }
            Action::Browse => Command::OpenBrowser,
            Action::PathChosen(path) => {
                self.path_input = path;
                self.focus = Focus::Process;
                Command::None
            }
            Action::Process => {
                if self.path_input.trim().is_empty() {
                    self.phase = Phase::Error(Notice::from(&ReportError::EmptyPath));
                    return Command::None;
                }
                self.phase = Phase::Processing;
                return Command::RunReport(self.path_input.trim().to_string());
            }
            Action::Exit => return Command::Quit,
            Action::Finished(_) | Action::Dismiss => Command::None,
        };

        self.phase = self.resting_phase();
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::aggregate::SalesSummary;
    use crate::report::{CellValue, OutputPaths};
    use std::path::PathBuf;

    fn sample_output() -> ReportOutput {
        ReportOutput {
            paths: OutputPaths {
                workbook: PathBuf::from("cleaned_2024-01-01_10-00.xlsx"),
                pdf: PathBuf::from("report_2024-01-01_10-00.pdf"),
            },
            data_rows: 2,
            summary: SalesSummary {
                total: CellValue::Int(30),
                average: CellValue::Float(15.0),
                counted: 2,
            },
        }
    }

    fn typed(text: &str) -> AppState {
        let mut state = AppState::new();
        for c in text.chars() {
            state.update(Action::TypeChar(c));
        }
        state
    }

    #[test]
    fn test_typing_moves_idle_to_file_selected() {
        let mut state = AppState::new();
        assert_eq!(state.phase.name(), "Idle");

        state.update(Action::TypeChar('a'));
        assert_eq!(state.phase.name(), "FileSelected");

        state.update(Action::Backspace);
        assert_eq!(state.phase.name(), "Idle");
    }

    #[test]
    fn test_process_with_empty_path_is_validation_error() {
        let mut state = typed("   ");
        let command = state.update(Action::Process);

        assert_eq!(command, Command::None);
        match &state.phase {
            Phase::Error(notice) => {
                assert_eq!(notice.category, ErrorCategory::Validation);
                assert_eq!(notice.message, "Please select an Excel file.");
            }
            other => panic!("unexpected phase: {:?}", other),
        }

        // Dismissing goes back to the form, nothing was run
        state.update(Action::Dismiss);
        assert_eq!(state.phase.name(), "Idle");
    }

    #[test]
    fn test_process_requests_run_with_trimmed_path() {
        let mut state = typed(" sales.xlsx ");
        let command = state.update(Action::Process);

        assert_eq!(command, Command::RunReport("sales.xlsx".to_string()));
        assert_eq!(state.phase.name(), "Processing");
    }

    #[test]
    fn test_success_then_dismiss_keeps_path() {
        let mut state = typed("sales.xlsx");
        state.update(Action::Process);
        state.update(Action::Finished(Ok(sample_output())));
        assert_eq!(state.phase.name(), "Done");
        assert!(state.phase.is_modal());

        state.update(Action::Dismiss);
        assert_eq!(state.phase.name(), "FileSelected");
        assert_eq!(state.path_input, "sales.xlsx");
    }

    #[test]
    fn test_failure_reports_category_and_loop_continues() {
        let mut state = typed("missing.xlsx");
        state.update(Action::Process);
        state.update(Action::Finished(Err(ReportError::FileNotFound {
            path: PathBuf::from("missing.xlsx"),
        })));

        match &state.phase {
            Phase::Error(notice) => {
                assert_eq!(notice.category, ErrorCategory::FileNotFound);
                assert_eq!(notice.message, "File 'missing.xlsx' not found.");
            }
            other => panic!("unexpected phase: {:?}", other),
        }

        state.update(Action::Dismiss);
        assert_eq!(state.update(Action::Process), Command::RunReport("missing.xlsx".into()));
    }

    #[test]
    fn test_input_ignored_while_processing() {
        let mut state = typed("a.xlsx");
        state.update(Action::Process);

        assert_eq!(state.update(Action::Exit), Command::None);
        state.update(Action::TypeChar('x'));
        assert_eq!(state.path_input, "a.xlsx");
        assert_eq!(state.phase.name(), "Processing");
    }

    #[test]
    fn test_browser_choice_fills_path() {
        let mut state = AppState::new();
        state.focus = Focus::Browse;
        assert_eq!(state.update(Action::Activate), Command::OpenBrowser);

        state.update(Action::PathChosen("/data/q1.xlsx".into()));
        assert_eq!(state.path_input, "/data/q1.xlsx");
        assert_eq!(state.focus, Focus::Process);
        assert_eq!(state.phase.name(), "FileSelected");
    }

    #[test]
    fn test_exit_from_form_and_modal() {
        let mut state = AppState::new();
        assert_eq!(state.update(Action::Exit), Command::Quit);

        state.update(Action::Process);
        assert!(state.phase.is_modal());
        assert_eq!(state.update(Action::Exit), Command::Quit);
    }

    #[test]
    fn test_focus_cycles() {
        assert_eq!(Focus::PathField.next(), Focus::Browse);
        assert_eq!(Focus::Exit.next(), Focus::PathField);
        assert_eq!(Focus::PathField.prev(), Focus::Exit);
    }
}
