//! Application state and logic for the weekly grid

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::cache::{OptionsCache, ACTIVITY_TYPES_KEY};
use crate::config::Config;
use crate::directory::DirectoryClient;
use crate::error::ApiError;
use crate::schedule::slots::slot_contains;
use crate::schedule::{
    generate_slots, parse_time_of_day, ActivityOption, EntryKey, ProfessionalRef, ScheduleEntry,
    TimeSlotRef, Weekday, WeeklySchedule,
};

use super::dialog::{DialogHandler, DialogProps, ScheduleEntryDialog};
use super::messages::{Message, MessageType};

/// Application mode outside the dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Grid navigation
    Normal,
    /// Waiting for 'y' to delete the selected entry
    ConfirmDelete,
    Help,
}

/// Result of a background activity-type fetch
#[derive(Debug)]
pub struct OptionsFetched {
    pub session: u64,
    pub result: std::result::Result<Vec<ActivityOption>, ApiError>,
}

/// Grid cell the dialog was opened on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DialogTarget {
    day: usize,
    slot: usize,
    force_new: bool,
}

/// Save handler handed to the dialog: writes into the schedule and persists it.
/// A grid cell holds one entry, so saving into a booked cell replaces what was there.
struct GridSaveHandler<'a> {
    schedule: &'a mut WeeklySchedule,
    schedule_path: &'a Path,
    slots: &'a [TimeSlotRef],
    replaces: Option<EntryKey>,
    messages: &'a mut Vec<Message>,
    closed: bool,
}

impl DialogHandler for GridSaveHandler<'_> {
    fn on_save(&mut self, entry: ScheduleEntry) {
        let summary = format!(
            "{} {}-{} {}",
            entry.weekday.short_label(),
            entry.start_time,
            entry.end_time,
            entry.activity_code
        );

        let target = parse_time_of_day(&entry.start_time)
            .ok()
            .and_then(|start| self.slots.iter().find(|slot| slot_contains(slot, start)));
        let displaced: Vec<ScheduleEntry> = match target {
            Some(slot) => self
                .schedule
                .clear_slot(entry.professional_id, entry.weekday, slot)
                .into_iter()
                .filter(|old| !self.replaces.as_ref().is_some_and(|key| key.matches(old)))
                .collect(),
            None => Vec::new(),
        };
        self.schedule.upsert(entry, self.replaces.as_ref());

        for old in &displaced {
            tracing::info!(
                weekday = %old.weekday,
                start = %old.start_time,
                activity_code = %old.activity_code,
                "Entry replaced by a save into its slot"
            );
            self.messages.push(Message::new(
                MessageType::Warning,
                format!(
                    "Replaced {} {}-{} {}",
                    old.weekday.short_label(),
                    old.start_time,
                    old.end_time,
                    old.activity_code
                ),
            ));
        }

        match self.schedule.save_to(self.schedule_path) {
            Ok(()) => self
                .messages
                .push(Message::new(MessageType::Success, format!("Saved {}", summary))),
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist schedule");
                self.messages.push(Message::new(
                    MessageType::Error,
                    format!("Saved in memory but not on disk: {}", e),
                ));
            }
        }
    }

    fn on_close(&mut self) {
        self.closed = true;
    }
}

/// Main application state
pub struct App {
    pub config: Config,
    pub professional: Option<ProfessionalRef>,
    /// Grid columns
    pub weekdays: Vec<Weekday>,
    /// Grid rows
    pub slots: Vec<TimeSlotRef>,
    pub selected_day: usize,
    pub selected_slot: usize,
    pub schedule: WeeklySchedule,
    pub schedule_path: PathBuf,
    pub dialog: ScheduleEntryDialog,
    pub options_cache: OptionsCache,
    pub mode: AppMode,
    pub messages: Vec<Message>,
    dialog_target: Option<DialogTarget>,
    editing_key: Option<EntryKey>,
    client: Option<DirectoryClient>,
    fetch_tx: UnboundedSender<OptionsFetched>,
    fetch_rx: UnboundedReceiver<OptionsFetched>,
}

impl App {
    /// Build the grid. Without a client the dialog only offers "available".
    pub fn new(
        config: Config,
        professional: Option<ProfessionalRef>,
        schedule: WeeklySchedule,
        schedule_path: PathBuf,
        client: Option<DirectoryClient>,
    ) -> Result<Self> {
        config.validate()?;
        let slots = generate_slots(
            parse_time_of_day(&config.day_start)?,
            parse_time_of_day(&config.day_end)?,
            config.slot_minutes,
        );
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();

        let mut messages = Vec::new();
        if professional.is_none() {
            messages.push(Message::new(
                MessageType::Warning,
                "No professional selected: pass --professional-id or run `agenda config`",
            ));
        }

        Ok(App {
            weekdays: config.weekdays(),
            options_cache: OptionsCache::new(config.options_ttl_secs),
            config,
            professional,
            slots,
            selected_day: 0,
            selected_slot: 0,
            schedule,
            schedule_path,
            dialog: ScheduleEntryDialog::new(),
            mode: AppMode::Normal,
            messages,
            dialog_target: None,
            editing_key: None,
            client,
            fetch_tx,
            fetch_rx,
        })
    }

    /// Handle one key press. Returns false when the user quits.
    pub fn handle_event(&mut self, event: KeyEvent) -> Result<bool> {
        if self.dialog.is_open() {
            self.handle_dialog_key(event);
            return Ok(true);
        }

        match self.mode {
            AppMode::Normal => self.handle_normal_mode(event),
            AppMode::ConfirmDelete => {
                self.handle_delete_mode(event);
                Ok(true)
            }
            AppMode::Help => {
                self.mode = AppMode::Normal;
                Ok(true)
            }
        }
    }

    fn handle_normal_mode(&mut self, event: KeyEvent) -> Result<bool> {
        match event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(false),
            KeyCode::Char('?') => self.mode = AppMode::Help,
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_day = self.selected_day.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.selected_day + 1 < self.weekdays.len() {
                    self.selected_day += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_slot = self.selected_slot.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_slot + 1 < self.slots.len() {
                    self.selected_slot += 1;
                }
            }
            KeyCode::Home => self.selected_slot = 0,
            KeyCode::End => self.selected_slot = self.slots.len().saturating_sub(1),
            KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('E') => self.open_dialog(false),
            KeyCode::Char('a') | KeyCode::Char('A') => self.open_dialog(true),
            KeyCode::Char('d') | KeyCode::Char('D') => {
                if self.selected_entry().is_some() {
                    self.mode = AppMode::ConfirmDelete;
                    self.messages.push(Message::new(
                        MessageType::Warning,
                        "Delete this entry? Press 'y' to confirm, any other key to cancel",
                    ));
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.reload(),
            _ => {}
        }
        Ok(true)
    }

    fn handle_delete_mode(&mut self, event: KeyEvent) {
        self.mode = AppMode::Normal;
        if !matches!(event.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
            self.messages
                .push(Message::new(MessageType::Info, "Delete cancelled"));
            return;
        }

        let Some(key) = self.selected_entry().map(EntryKey::of) else {
            return;
        };
        if self.schedule.remove(&key).is_some() {
            tracing::info!(weekday = %key.weekday, start = %key.start_time, "Entry deleted");
            match self.schedule.save_to(&self.schedule_path) {
                Ok(()) => self
                    .messages
                    .push(Message::new(MessageType::Success, "Entry deleted")),
                Err(e) => self.messages.push(Message::new(
                    MessageType::Error,
                    format!("Failed to save schedule: {}", e),
                )),
            }
        }
    }

    fn handle_dialog_key(&mut self, event: KeyEvent) {
        let mut handler = GridSaveHandler {
            schedule: &mut self.schedule,
            schedule_path: &self.schedule_path,
            slots: &self.slots,
            replaces: self.editing_key.clone(),
            messages: &mut self.messages,
            closed: false,
        };
        self.dialog.handle_key(event, &mut handler);

        if handler.closed {
            self.dialog_target = None;
            self.editing_key = None;
        }
    }

    /// Open the dialog on the selected cell. `force_new` starts a blank entry even
    /// when the cell is booked.
    pub fn open_dialog(&mut self, force_new: bool) {
        if self.slots.is_empty() || self.weekdays.is_empty() {
            return;
        }
        let target = DialogTarget {
            day: self.selected_day,
            slot: self.selected_slot,
            force_new,
        };
        let props = self.props_for(target);
        self.editing_key = if force_new {
            None
        } else {
            self.selected_entry().map(EntryKey::of)
        };
        self.dialog_target = Some(target);

        let session = self.dialog.open(props);
        self.request_options(session);
    }

    /// Dialog context for a grid cell, derived from the current schedule
    fn props_for(&self, target: DialogTarget) -> DialogProps {
        let weekday = self.weekdays[target.day];
        let slot = &self.slots[target.slot];
        let existing = if target.force_new {
            None
        } else {
            self.entry_at(target.day, target.slot)
        };

        DialogProps {
            professional: self.professional.clone(),
            time_slot: Some(existing.map(|e| e.time_slot()).unwrap_or_else(|| slot.clone())),
            current_activity: existing.map(|e| e.as_current_activity()),
            weekday,
            is_new: existing.is_none(),
        }
    }

    /// Serve options from the cache or fetch them in the background
    fn request_options(&mut self, session: u64) {
        if let Some(options) = self.options_cache.fresh(ACTIVITY_TYPES_KEY) {
            let options = options.to_vec();
            self.dialog.apply_options(session, options);
            return;
        }

        let Some(client) = self.client.clone() else {
            self.dialog.mark_options_unavailable(session);
            return;
        };
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_activity_types().await;
            // Receiver gone means the app is shutting down
            let _ = tx.send(OptionsFetched { session, result });
        });
    }

    /// Take a fetch result: refresh the cache and hand the options to the dialog if
    /// it is still on the same session
    pub fn handle_fetch_result(&mut self, fetched: OptionsFetched) {
        match fetched.result {
            Ok(options) => {
                self.options_cache.insert(ACTIVITY_TYPES_KEY, options.clone());
                self.dialog.apply_options(fetched.session, options);
            }
            Err(e) if self.dialog.session_id() == Some(fetched.session) => {
                tracing::warn!(
                    session = fetched.session,
                    error = %e,
                    "Activity types unavailable, only 'available' can be selected"
                );
                self.dialog.mark_options_unavailable(fetched.session);
            }
            Err(e) => {
                tracing::debug!(
                    session = fetched.session,
                    error = %e,
                    "Activity type lookup failed for a closed dialog"
                );
            }
        }
    }

    /// Periodic work between key presses
    pub fn tick(&mut self) {
        while let Ok(fetched) = self.fetch_rx.try_recv() {
            self.handle_fetch_result(fetched);
        }
        self.sync_dialog_props();
        self.messages.retain(|m| !m.is_expired());
    }

    /// Re-derive the open dialog's props so it resets if its cell changed underneath it
    fn sync_dialog_props(&mut self) {
        if let Some(target) = self.dialog_target {
            if target.day < self.weekdays.len() && target.slot < self.slots.len() {
                let props = self.props_for(target);
                self.dialog.sync_props(props);
            }
        }
    }

    /// Reload the schedule file and forget cached activity types
    pub fn reload(&mut self) {
        self.options_cache.invalidate(ACTIVITY_TYPES_KEY);
        match WeeklySchedule::load_from(&self.schedule_path) {
            Ok(schedule) => {
                self.schedule = schedule;
                self.messages
                    .push(Message::new(MessageType::Success, "Schedule reloaded"));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to reload schedule");
                self.messages.push(Message::new(
                    MessageType::Error,
                    format!("Failed to reload schedule: {}", e),
                ));
            }
        }
    }

    pub fn selected_weekday(&self) -> Option<Weekday> {
        self.weekdays.get(self.selected_day).copied()
    }

    /// Entry shown in a grid cell
    pub fn entry_at(&self, day: usize, slot: usize) -> Option<&ScheduleEntry> {
        let professional = self.professional.as_ref()?;
        let weekday = *self.weekdays.get(day)?;
        let slot = self.slots.get(slot)?;
        self.schedule.entry_in_slot(professional.id, weekday, slot)
    }

    pub fn selected_entry(&self) -> Option<&ScheduleEntry> {
        self.entry_at(self.selected_day, self.selected_slot)
    }

    /// Grid label for an entry; "available" is named even before any listing arrives
    pub fn entry_label<'a>(&'a self, entry: &'a ScheduleEntry) -> &'a str {
        if entry.is_available() {
            "Available"
        } else {
            self.activity_name(&entry.activity_code)
        }
    }

    /// Display name of an activity code from the last fetched listing
    pub fn activity_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.options_cache
            .entries
            .get(ACTIVITY_TYPES_KEY)
            .and_then(|cached| cached.options.iter().find(|o| o.code == code))
            .map(|o| o.name.as_str())
            .unwrap_or(code)
    }
}
