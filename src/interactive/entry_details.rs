//! Details panel for the selected grid cell

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::app::App;
use super::utils::get_activity_color;

fn field_line<'a>(label: &'a str, value: Span<'a>) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            label,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        value,
    ])
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Render the details of the selected slot
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let slot = app.slots.get(app.selected_slot);
    let weekday = app.selected_weekday();

    let mut lines = Vec::new();
    if let (Some(weekday), Some(slot)) = (weekday, slot) {
        lines.push(field_line(
            "Slot: ",
            Span::raw(format!(
                "{} {}-{}",
                weekday.label(),
                slot.start_time,
                slot.end_time
            )),
        ));
    }

    match app.selected_entry() {
        Some(entry) => {
            let white = Style::default().fg(Color::White);
            lines.push(field_line(
                "Time: ",
                Span::styled(format!("{}-{}", entry.start_time, entry.end_time), white),
            ));
            lines.push(field_line(
                "Activity: ",
                Span::styled(
                    app.entry_label(entry),
                    Style::default().fg(get_activity_color(&entry.activity_code)),
                ),
            ));
            lines.push(field_line(
                "Location: ",
                Span::styled(or_dash(&entry.location), white),
            ));
            lines.push(field_line(
                "Notes: ",
                Span::styled(or_dash(&entry.notes), Style::default().fg(Color::Gray)),
            ));
        }
        None => {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Nothing booked. Press Enter or 'a' to add an entry.",
                Style::default().fg(Color::Gray),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Details ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}
