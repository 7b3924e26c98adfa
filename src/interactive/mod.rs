//! Interactive terminal UI for the weekly schedule
//!
//! A week grid of time slots for one professional. Editing a slot opens the
//! schedule entry dialog, whose activity list is fetched from the directory
//! service in the background while the UI keeps running.

pub mod activity_options;
pub mod app;
pub mod dialog;
pub mod entry_details;
pub mod events;
pub mod form;
pub mod form_ui;
pub mod messages;
pub mod ui;
pub mod utils;
pub mod week_view;

pub use app::App;
pub use dialog::{DialogHandler, DialogProps, ScheduleEntryDialog, SubmitOutcome};
pub use events::{AppEvent, EventHandler};

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::config::Config;
use crate::directory::DirectoryClient;
use crate::error::AgendaError;
use crate::schedule::{ProfessionalRef, WeeklySchedule};

/// Run the interactive UI application
pub async fn run_interactive(config: Config, professional: Option<ProfessionalRef>) -> Result<()> {
    let schedule_path = WeeklySchedule::get_store_path()
        .ok_or_else(|| AgendaError::Store("could not determine data directory".to_string()))?;
    let schedule = WeeklySchedule::load_from(&schedule_path)?;

    // Without a client the dialog still works with "available" only
    let client = match DirectoryClient::new(&config) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!(error = %e, "Directory client unavailable");
            None
        }
    };

    let mut app = App::new(config, professional, schedule, schedule_path, client)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!(error = %err, "Interactive session failed");
    }
    res
}

/// Main application loop
fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let events = EventHandler::default();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        match events.next()? {
            AppEvent::Key(key) => {
                if !app.handle_event(key)? {
                    break;
                }
            }
            AppEvent::Tick => {}
        }
        app.tick();
    }

    Ok(())
}
