//! Main UI rendering logic

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::app::{App, AppMode};
use super::messages::MessageType;
use super::utils::get_message_style;
use super::{entry_details, form_ui, week_view};

/// Main draw function
pub fn draw(f: &mut Frame, app: &App) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(5), // Messages
            Constraint::Length(3), // Footer
        ])
        .split(size);

    render_header(f, app, chunks[0]);

    match app.mode {
        AppMode::Help => render_help(f, chunks[1]),
        _ => render_main_content(f, app, chunks[1]),
    }

    render_messages(f, app, chunks[2]);
    render_footer(f, app, chunks[3]);

    // Modal on top of everything
    if app.dialog.is_open() {
        form_ui::render_dialog(f, &app.dialog, size);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let who = match &app.professional {
        Some(p) => format!("{} (#{})", p.name, p.id),
        None => "no professional selected".to_string(),
    };
    let title = format!(
        " Agenda - {} - {} to {} every {} min ",
        who, app.config.day_start, app.config.day_end, app.config.slot_minutes
    );
    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    f.render_widget(header, area);
}

fn render_main_content(f: &mut Frame, app: &App, area: Rect) {
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
        .split(area);

    week_view::render(f, app, content_chunks[0]);
    entry_details::render(f, app, content_chunks[1]);
}

fn render_help(f: &mut Frame, area: Rect) {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let key = Style::default().fg(Color::Yellow);

    let row = |keys: &'static str, action: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:14}", keys), key),
            Span::raw(action),
        ])
    };

    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Cyan),
        )),
        Line::from(""),
        Line::from(Span::styled("Grid:", heading)),
        row("←→ / h l", "Previous / next day"),
        row("↑↓ / k j", "Previous / next time slot"),
        row("Home / End", "First / last time slot"),
        row("Enter / e", "Edit the selected slot"),
        row("a", "New entry in the selected slot"),
        row("d", "Delete the selected entry"),
        row("r", "Reload schedule and activity types"),
        row("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled("Entry dialog:", heading)),
        row("Tab / ↓", "Next field"),
        row("Shift+Tab / ↑", "Previous field"),
        row("←→", "Move cursor, or change activity"),
        row("0-9", "Pick an activity from the list"),
        row("Enter", "Save"),
        row("Esc", "Cancel"),
    ];

    let paragraph = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(paragraph, area);
}

fn render_messages(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();

    // Last 3
    let recent_messages: Vec<_> = app.messages.iter().rev().take(3).collect();

    for msg in recent_messages.iter().rev() {
        let mut style = get_message_style(msg.message_type);

        if app.mode == AppMode::ConfirmDelete && msg.message_type == MessageType::Warning {
            style = style.add_modifier(Modifier::SLOW_BLINK);
        }

        lines.push(Line::from(vec![
            Span::styled(format!("{} ", msg.icon()), style),
            Span::styled(msg.text.as_str(), style),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Ready",
            Style::default().fg(Color::Gray),
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Messages ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(paragraph, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let shortcuts = if app.dialog.is_open() {
        "[Tab] Next field  [Shift+Tab] Prev field  [Enter] Save  [Esc] Cancel"
    } else {
        match app.mode {
            AppMode::Normal => {
                "[←→] Days  [↑↓] Slots  [Enter/e] Edit  [a]dd  [d]elete  [r]eload  [?] help  [q]uit"
            }
            AppMode::ConfirmDelete => "[y] Confirm  [any other key] Cancel",
            AppMode::Help => "Press any key to return",
        }
    };

    let footer = Paragraph::new(shortcuts)
        .style(Style::default().fg(Color::Gray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

    f.render_widget(footer, area);
}
