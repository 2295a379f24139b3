use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::state::Notice;
use crate::error::ErrorCategory;
use crate::report::ReportOutput;

pub fn render_success_popup(f: &mut Frame, output: &ReportOutput) {
    let mut lines: Vec<Line> = output
        .success_message()
        .lines()
        .map(|line| Line::from(Span::styled(line.to_string(), Style::default().fg(Color::Green))))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Total: {}   Average: {}", output.summary.total, output.summary.average),
        Style::default().fg(Color::White),
    )));

    render_dialog(f, "Report Generated", Color::Green, lines);
}

pub fn render_error_popup(f: &mut Frame, notice: &Notice) {
    let title = match notice.category {
        ErrorCategory::Validation => "⚠️  Input Required",
        ErrorCategory::FileNotFound => "✗ File Not Found",
        ErrorCategory::MissingColumn => "✗ Missing Column",
        ErrorCategory::Generic => "✗ Error",
    };
    let color = match notice.category {
        ErrorCategory::Validation => Color::Yellow,
        _ => Color::Red,
    };

    let lines = vec![Line::from(Span::styled(
        notice.message.clone(),
        Style::default().fg(color),
    ))];

    render_dialog(f, title, color, lines);
}

pub fn render_processing_popup(f: &mut Frame, file: &str) {
    let popup_area = centered_rect(60, 20, f.area());
    f.render_widget(Clear, popup_area);

    let block = Block::default().title("Processing").borders(Borders::ALL);
    let inner_area = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let content = vec![
        Line::from(vec![
            Span::styled("⠋", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(" Generating reports...", Style::default().fg(Color::Cyan)),
        ]),
        Line::from(""),
        Line::from(Span::styled(file, Style::default().fg(Color::White))),
    ];

    let paragraph = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, inner_area);
}

fn render_dialog(f: &mut Frame, title: &str, color: Color, body: Vec<Line>) {
    let popup_area = centered_rect(60, 40, f.area());
    f.render_widget(Clear, popup_area);

    let popup_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .style(Style::default().fg(color));
    f.render_widget(popup_block, popup_area);

    let inner_area = popup_area.inner(Margin::new(2, 1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Message
            Constraint::Length(2), // Instructions
        ])
        .split(inner_area);

    let message = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(message, chunks[0]);

    let instructions = Paragraph::new(Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::Gray)),
        Span::styled("any key", Style::default().fg(Color::Green)),
        Span::styled(" to continue", Style::default().fg(Color::Gray)),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(instructions, chunks[1]);
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
