use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, info};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::file_browser::run_file_browser;
use super::popup::{render_error_popup, render_processing_popup, render_success_popup};
use super::state::{Action, AppState, Command, Focus, Phase};
use crate::config::Config;
use crate::report::ReportJob;

pub const WINDOW_TITLE: &str = "Excel Sales Report Generator";

/// Open the window and block on user input until Exit
pub fn run(config: &Config) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, config);
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, config: &Config) -> Result<()> {
    let mut state = AppState::new();
    info!("Window opened");

    loop {
        terminal.draw(|f| render(f, &state))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(action) = map_key(&state, key) else {
            continue;
        };

        let mut command = state.update(action);
        loop {
            command = match command {
                Command::None => break,
                Command::Quit => {
                    info!("Window closed");
                    return Ok(());
                }
                Command::OpenBrowser => {
                    let start = config.browser_start_dir();
                    match run_file_browser(terminal, start, config.browser.show_hidden)? {
                        Some(path) => {
                            debug!("Selected file: {}", path.display());
                            state.update(Action::PathChosen(path.display().to_string()))
                        }
                        None => Command::None,
                    }
                }
                Command::RunReport(path) => {
                    // Show progress before the blocking run
                    terminal.draw(|f| {
                        render(f, &state);
                        render_processing_popup(f, &path);
                    })?;
                    let result = ReportJob::new(&path, &config.output).run();
                    if let Err(e) = &result {
                        log::error!("Report failed for {}: {}", path, e);
                    }
                    state.update(Action::Finished(result))
                }
            };
        }
    }
}

fn map_key(state: &AppState, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => Some(Action::Exit),
            KeyCode::Char('o') => Some(Action::Browse),
            KeyCode::Char('u') => Some(Action::ClearPath),
            _ => None,
        };
    }

    if state.phase.is_modal() {
        return Some(Action::Dismiss);
    }

    match key.code {
        KeyCode::Tab => Some(Action::FocusNext),
        KeyCode::BackTab => Some(Action::FocusPrev),
        KeyCode::Enter => Some(Action::Activate),
        KeyCode::Esc => Some(Action::Exit),
        KeyCode::Backspace => Some(Action::Backspace),
        KeyCode::Char(c) if state.focus == Focus::PathField => Some(Action::TypeChar(c)),
        KeyCode::Left | KeyCode::Up => Some(Action::FocusPrev),
        KeyCode::Right | KeyCode::Down => Some(Action::FocusNext),
        _ => None,
    }
}

fn render(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(1), // Label
            Constraint::Length(3), // Path field
            Constraint::Length(3), // Buttons
            Constraint::Min(0),
            Constraint::Length(3), // Instructions
        ])
        .split(f.area());

    let title = Paragraph::new(WINDOW_TITLE)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    f.render_widget(Paragraph::new("Select Excel file:"), chunks[1]);

    let field_style = focus_style(state.focus == Focus::PathField);
    let cursor = if state.focus == Focus::PathField { "█" } else { "" };
    let path_field = Paragraph::new(format!("{}{}", state.path_input, cursor))
        .block(Block::default().borders(Borders::ALL).border_style(field_style));
    f.render_widget(path_field, chunks[2]);

    render_buttons(f, chunks[3], state.focus);

    let instructions = Paragraph::new(
        "Tab to move, Enter to press, Ctrl+O to browse, Esc to exit",
    )
    .style(Style::default().fg(Color::Gray))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(state.phase.name()));
    f.render_widget(instructions, chunks[5]);

    match &state.phase {
        Phase::Done(output) => render_success_popup(f, output),
        Phase::Error(notice) => render_error_popup(f, notice),
        _ => {}
    }
}

fn render_buttons(f: &mut Frame, area: Rect, focus: Focus) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Min(0),
        ])
        .split(area);

    let buttons = [
        ("Browse", Focus::Browse),
        ("Process", Focus::Process),
        ("Exit", Focus::Exit),
    ];
    for (i, (label, target)) in buttons.iter().enumerate() {
        let focused = focus == *target;
        let button = Paragraph::new(Line::from(Span::styled(
            *label,
            focus_style(focused),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(focus_style(focused)));
        f.render_widget(button, cells[i]);
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}
