//! Rendering of the schedule entry dialog

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use super::activity_options::display_name;
use super::dialog::ScheduleEntryDialog;
use super::form::{byte_index, FormField};
use crate::schedule::DraftField;

/// Render the dialog as a popup over `area`
pub fn render_dialog(f: &mut Frame, dialog: &ScheduleEntryDialog, area: Rect) {
    let (Some(draft), Some(props), Some(cursor)) = (dialog.draft(), dialog.props(), dialog.cursor())
    else {
        return;
    };

    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(dialog.title())
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(inner);

    let error_style = Style::default().fg(Color::Red);
    let mut lines = vec![Line::from(Span::styled(
        "Tab/↑↓: Field | ←→: Cursor | Enter: Save | Esc: Cancel",
        Style::default().fg(Color::Gray),
    ))];
    lines.push(Line::from(""));

    // Fixed context
    let professional = props
        .professional
        .as_ref()
        .map(|p| format!("{} (#{})", p.name, p.id))
        .unwrap_or_default();
    lines.push(context_line(DraftField::ProfessionalId.label(), professional));
    if let Some(error) = dialog.error_for(DraftField::ProfessionalId) {
        lines.push(error_line(&error.to_string(), error_style));
    }
    lines.push(context_line(
        DraftField::Weekday.label(),
        props.weekday.label().to_string(),
    ));
    lines.push(Line::from(""));

    for field in FormField::all() {
        let is_current = cursor.current_field == field;

        let label_style = if is_current {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let value_style = if is_current {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let value = match field {
            FormField::Activity => {
                let choices = dialog.choices();
                format!("◀ {} ▶", display_name(&choices, &draft.activity_code))
            }
            _ => draft.text(field.draft_field()).unwrap_or_default().to_string(),
        };

        let display_value = if is_current && field.is_text() {
            let mut display = value;
            let index = byte_index(&display, cursor.cursor_position);
            display.insert(index, '█');
            display
        } else if value.is_empty() {
            "<empty>".to_string()
        } else {
            value
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:12}", field.label()), label_style),
            Span::raw(": "),
            Span::styled(display_value, value_style),
        ]));

        // Inline error beneath the field
        if let Some(error) = dialog.error_for(field.draft_field()) {
            lines.push(error_line(&error.to_string(), error_style));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("💡 {}", cursor.current_field.hint()),
        Style::default().fg(Color::Blue),
    )));

    f.render_widget(Paragraph::new(lines), columns[0]);
    render_activity_list(f, dialog, columns[1]);
}

/// Activity choices with the current selection highlighted
fn render_activity_list(f: &mut Frame, dialog: &ScheduleEntryDialog, area: Rect) {
    let choices = dialog.choices();
    let selected = dialog.selected_choice();

    let items: Vec<ListItem> = choices
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let is_selected = selected == Some(i);
            let style = if is_selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if is_selected { "▶ " } else { "  " };
            let number = if i < 10 {
                i.to_string()
            } else {
                " ".to_string()
            };
            ListItem::new(format!("{}{} - {}", prefix, number, option.name)).style(style)
        })
        .collect();

    let title = if dialog.options_loaded() {
        " Activities "
    } else {
        " Activities (loading…) "
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(list, area);
}

fn context_line(label: &str, value: String) -> Line<'static> {
    let value = if value.is_empty() {
        "<none>".to_string()
    } else {
        value
    };
    Line::from(vec![
        Span::styled(format!("{:12}", label), Style::default().fg(Color::DarkGray)),
        Span::raw(": "),
        Span::styled(value, Style::default().fg(Color::DarkGray)),
    ])
}

fn error_line(message: &str, style: Style) -> Line<'static> {
    Line::from(Span::styled(format!("{:14}⚠ {}", "", message), style))
}

/// Rectangle of the given percentage size centered in `area`
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
