use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    DefaultTerminal,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Extensions the browser offers for selection
pub const SPREADSHEET_EXTENSIONS: [&str; 1] = ["xlsx"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

/// Browse from `start` until a spreadsheet is picked (`Some`) or the user backs out (`None`)
pub fn run_file_browser(
    terminal: &mut DefaultTerminal,
    start: PathBuf,
    show_hidden: bool,
) -> Result<Option<PathBuf>> {
    let mut current_path = start;
    let mut list_state = ListState::default();
    list_state.select(Some(0));

    loop {
        let entries = match list_entries(&current_path, show_hidden) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Cannot read {}: {}", current_path.display(), e);
                // Unreadable directory: step back out of it
                match current_path.parent() {
                    Some(parent) if parent != current_path => {
                        current_path = parent.to_path_buf();
                        list_state.select(Some(0));
                        continue;
                    }
                    _ => return Ok(None),
                }
            }
        };

        terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(0),
                    Constraint::Length(3),
                ])
                .split(f.area());

            // Title with current path
            let title = Paragraph::new(format!("Select Excel file - {}", current_path.display()))
                .style(Style::default().fg(Color::Cyan))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(title, chunks[0]);

            let items: Vec<ListItem> = entries
                .iter()
                .map(|entry| {
                    let (display_name, color) = if entry.is_dir {
                        (format!("{}/", entry.name), Color::Blue)
                    } else {
                        (entry.name.clone(), Color::White)
                    };
                    ListItem::new(Line::from(Span::styled(
                        display_name,
                        Style::default().fg(color),
                    )))
                })
                .collect();

            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title("Excel Files (*.xlsx)"))
                .style(Style::default().fg(Color::White))
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("► ");
            f.render_stateful_widget(list, chunks[1], &mut list_state);

            let instructions = Paragraph::new("Use ↑/↓ to navigate, Enter to select, Esc/q to cancel")
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(instructions, chunks[2]);
        })?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(None),
            KeyCode::Down | KeyCode::Char('j') => {
                list_state.select(Some(wrap_next(list_state.selected(), entries.len())));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                list_state.select(Some(wrap_prev(list_state.selected(), entries.len())));
            }
            KeyCode::Enter => {
                let Some(entry) = list_state.selected().and_then(|i| entries.get(i)) else {
                    continue;
                };

                if entry.is_dir {
                    if entry.name == ".." {
                        if let Some(parent) = current_path.parent() {
                            current_path = parent.to_path_buf();
                        }
                    } else {
                        current_path = current_path.join(&entry.name);
                    }
                    list_state.select(Some(0));
                } else {
                    return Ok(Some(current_path.join(&entry.name)));
                }
            }
            _ => {}
        }
    }
}

fn wrap_next(selected: Option<usize>, len: usize) -> usize {
    match selected {
        Some(i) if len > 0 && i + 1 < len => i + 1,
        _ => 0,
    }
}

fn wrap_prev(selected: Option<usize>, len: usize) -> usize {
    match selected {
        Some(0) | None => len.saturating_sub(1),
        Some(i) => i - 1,
    }
}

pub fn is_spreadsheet(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// Directory listing: `..` first, then directories, then spreadsheets, each sorted by name
pub fn list_entries(path: &Path, show_hidden: bool) -> io::Result<Vec<Entry>> {
    let mut entries = Vec::new();

    // Add parent directory entry if not at root
    if path.parent().is_some() {
        entries.push(Entry {
            name: "..".to_string(),
            is_dir: true,
        });
    }

    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().to_string();

        if !show_hidden && file_name.starts_with('.') {
            continue;
        }

        // Follow symlinks so linked folders are browsable
        let is_dir = fs::metadata(entry.path())
            .map(|m| m.is_dir())
            .unwrap_or(false);

        if is_dir {
            dirs.push(Entry {
                name: file_name,
                is_dir: true,
            });
        } else if is_spreadsheet(&file_name) {
            files.push(Entry {
                name: file_name,
                is_dir: false,
            });
        }
    }

    dirs.sort_by(|a, b| a.name.cmp(&b.name));
    files.sort_by(|a, b| a.name.cmp(&b.name));

    entries.extend(dirs);
    entries.extend(files);

    Ok(entries)
}
