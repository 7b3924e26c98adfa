//! Weekly grid: one column per weekday, one row per time slot

use chrono::{Datelike, Local};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::app::App;
use super::utils::{get_activity_color, truncate_str};
use crate::schedule::{parse_time_of_day, ScheduleEntry, TimeSlotRef, Weekday};

/// Render the week grid
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let today = Weekday::from(Local::now().weekday());
    let mut header_cells = vec![Cell::from("")];
    for (i, weekday) in app.weekdays.iter().enumerate() {
        let mut style = Style::default();
        if *weekday == today {
            style = style.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED);
        }
        if i == app.selected_day {
            style = style.fg(Color::Cyan).bg(Color::DarkGray);
        }
        header_cells.push(Cell::from(weekday.short_label()).style(style));
    }
    let header = Row::new(header_cells)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .height(1);

    let rows: Vec<Row> = app
        .slots
        .iter()
        .enumerate()
        .map(|(slot_index, slot)| {
            let mut cells = vec![Cell::from(slot.start_time.clone())
                .style(Style::default().fg(Color::DarkGray))];
            for (day_index, weekday) in app.weekdays.iter().enumerate() {
                let is_selected =
                    day_index == app.selected_day && slot_index == app.selected_slot;
                cells.push(slot_cell(app, *weekday, day_index, slot_index, slot, is_selected));
            }
            Row::new(cells).height(1)
        })
        .collect();

    let mut widths = vec![Constraint::Length(6)];
    let day_width = 100 / app.weekdays.len().max(1) as u16;
    widths.extend(app.weekdays.iter().map(|_| Constraint::Percentage(day_width)));

    let title = match &app.professional {
        Some(p) => format!(" Weekly schedule: {} ", p.name),
        None => " Weekly schedule ".to_string(),
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .column_spacing(1);

    // Selected row drives scrolling when the day does not fit
    let mut state = TableState::default().with_selected(Some(app.selected_slot));
    f.render_stateful_widget(table, area, &mut state);
}

fn slot_cell<'a>(
    app: &'a App,
    weekday: Weekday,
    day_index: usize,
    slot_index: usize,
    slot: &TimeSlotRef,
    is_selected: bool,
) -> Cell<'a> {
    let mut style = Style::default();
    if is_selected {
        style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
    }

    if let Some(entry) = app.entry_at(day_index, slot_index) {
        let mut label = app.entry_label(entry).to_string();
        if !entry.location.is_empty() {
            label = format!("{} @ {}", label, entry.location);
        }
        let span = Span::styled(
            truncate_str(&label, 18),
            Style::default().fg(get_activity_color(&entry.activity_code)),
        );
        return Cell::from(span).style(style);
    }

    if let Some(entry) = covering_entry(app, weekday, slot) {
        let span = Span::styled("┆", Style::default().fg(get_activity_color(&entry.activity_code)));
        return Cell::from(span).style(style);
    }

    Cell::from("").style(style)
}

/// Entry that started in an earlier slot and still runs during `slot`
fn covering_entry<'a>(
    app: &'a App,
    weekday: Weekday,
    slot: &TimeSlotRef,
) -> Option<&'a ScheduleEntry> {
    let professional = app.professional.as_ref()?;
    let slot_start = parse_time_of_day(&slot.start_time).ok()?;
    app.schedule
        .entries_for(professional.id, weekday)
        .into_iter()
        .find(|entry| {
            match (
                parse_time_of_day(&entry.start_time),
                parse_time_of_day(&entry.end_time),
            ) {
                (Ok(start), Ok(end)) => start < slot_start && slot_start < end,
                _ => false,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::schedule::{ProfessionalRef, WeeklySchedule};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_grid_shows_entry_and_continuation() {
        let mut schedule = WeeklySchedule::new();
        schedule.upsert(
            ScheduleEntry {
                professional_id: 5,
                weekday: Weekday::Tuesday,
                start_time: "08:00".to_string(),
                end_time: "09:30".to_string(),
                activity_code: "consulta".to_string(),
                location: "Room 2".to_string(),
                notes: String::new(),
            },
            None,
        );
        let app = App::new(
            Config::default(),
            Some(ProfessionalRef {
                id: 5,
                name: "Dr. Lima".to_string(),
            }),
            schedule,
            std::env::temp_dir().join("agenda-week-view-test.json"),
            None,
        )
        .unwrap();

        assert!(app.entry_at(1, 0).is_some());
        assert!(app.entry_at(1, 1).is_none());
        assert!(covering_entry(&app, Weekday::Tuesday, &app.slots[1]).is_some());
        assert!(covering_entry(&app, Weekday::Tuesday, &app.slots[3]).is_none());

        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|f| render(f, &app, f.size())).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Dr. Lima"));
        assert!(text.contains("consulta @ Room 2"));
        assert!(text.contains("Tue"));
    }
}
