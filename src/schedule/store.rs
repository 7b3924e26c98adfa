use chrono::Local;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::model::{ScheduleEntry, TimeSlotRef};
use super::slots::slot_contains;
use super::validation::parse_time_of_day;
use super::weekday::Weekday;
use crate::error::{AgendaError, Result};

/// Identity of a stored entry: one professional, one day, one start time
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub professional_id: i64,
    pub weekday: Weekday,
    pub start_time: String,
}

impl EntryKey {
    pub fn of(entry: &ScheduleEntry) -> Self {
        EntryKey {
            professional_id: entry.professional_id,
            weekday: entry.weekday,
            start_time: entry.start_time.clone(),
        }
    }

    pub fn matches(&self, entry: &ScheduleEntry) -> bool {
        entry.professional_id == self.professional_id
            && entry.weekday == self.weekday
            && entry.start_time == self.start_time
    }
}

/// Saved weekly schedule for every professional
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub entries: Vec<ScheduleEntry>,
    pub last_updated: String, // RFC 3339 timestamp
}

impl WeeklySchedule {
    pub fn new() -> Self {
        WeeklySchedule {
            entries: Vec::new(),
            last_updated: Local::now().to_rfc3339(),
        }
    }

    /// Default location of the schedule file
    pub fn get_store_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "agenda", "agenda")
            .map(|proj_dirs| proj_dirs.data_dir().join("schedule.json"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::get_store_path()
            .ok_or_else(|| AgendaError::Store("could not determine data directory".to_string()))?;
        Self::load_from(&path)
    }

    /// Save to the platform data directory, returning the path written
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::get_store_path()
            .ok_or_else(|| AgendaError::Store("could not determine data directory".to_string()))?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Load from `path`; a missing file is an empty schedule
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let data = fs::read_to_string(path)?;
        let schedule: WeeklySchedule = serde_json::from_str(&data)?;
        tracing::debug!(path = %path.display(), entries = schedule.entries.len(), "Schedule loaded");
        Ok(schedule)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        tracing::debug!(path = %path.display(), entries = self.entries.len(), "Schedule saved");
        Ok(())
    }

    /// Insert `entry`, first removing the entry it replaces (the slot the dialog was
    /// opened on) and any entry already holding the same key
    pub fn upsert(&mut self, entry: ScheduleEntry, replaces: Option<&EntryKey>) {
        if let Some(old) = replaces {
            self.entries.retain(|e| !old.matches(e));
        }
        let key = EntryKey::of(&entry);
        self.entries.retain(|e| !key.matches(e));
        self.entries.push(entry);
        self.sort();
        self.last_updated = Local::now().to_rfc3339();
    }

    /// Remove the entry with `key`, returning it if present
    pub fn remove(&mut self, key: &EntryKey) -> Option<ScheduleEntry> {
        let index = self.entries.iter().position(|e| key.matches(e))?;
        self.last_updated = Local::now().to_rfc3339();
        Some(self.entries.remove(index))
    }

    /// Entries of one professional on one day, ordered by start time
    pub fn entries_for(&self, professional_id: i64, weekday: Weekday) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.professional_id == professional_id && e.weekday == weekday)
            .collect()
    }

    /// The entry whose start time falls inside `slot`
    pub fn entry_in_slot(
        &self,
        professional_id: i64,
        weekday: Weekday,
        slot: &TimeSlotRef,
    ) -> Option<&ScheduleEntry> {
        self.entries_for(professional_id, weekday)
            .into_iter()
            .find(|e| {
                parse_time_of_day(&e.start_time)
                    .map(|start| slot_contains(slot, start))
                    .unwrap_or(false)
            })
    }

    /// Remove every entry of the professional whose start time falls inside `slot`,
    /// returning them
    pub fn clear_slot(
        &mut self,
        professional_id: i64,
        weekday: Weekday,
        slot: &TimeSlotRef,
    ) -> Vec<ScheduleEntry> {
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.entries).into_iter().partition(|e| {
                e.professional_id == professional_id
                    && e.weekday == weekday
                    && parse_time_of_day(&e.start_time)
                        .map(|start| slot_contains(slot, start))
                        .unwrap_or(false)
            });
        self.entries = kept;
        if !removed.is_empty() {
            self.last_updated = Local::now().to_rfc3339();
        }
        removed
    }

    fn sort(&mut self) {
        self.entries.sort_by(|a, b| {
            (a.professional_id, a.weekday, &a.start_time).cmp(&(
                b.professional_id,
                b.weekday,
                &b.start_time,
            ))
        });
    }
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self::new()
    }
}
