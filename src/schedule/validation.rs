//! Submission-time validation of a draft

use chrono::NaiveTime;
use std::collections::BTreeMap;

use super::draft::{DraftField, ScheduleEntryDraft};
use super::model::ScheduleEntry;
use crate::error::ValidationError;

const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

/// Parse a time of day written as H:MM, HH:MM or HH:MM:SS
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required);
    }

    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| ValidationError::InvalidTime(value.to_string()))
}

pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Field-level failures of one submission attempt, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<DraftField, ValidationError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: DraftField, error: ValidationError) {
        self.errors.insert(field, error);
    }

    pub fn get(&self, field: DraftField) -> Option<&ValidationError> {
        self.errors.get(&field)
    }

    pub fn clear_field(&mut self, field: DraftField) {
        self.errors.remove(&field);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DraftField, &ValidationError)> {
        self.errors.iter().map(|(field, error)| (*field, error))
    }
}

/// Check a draft and resolve it into the payload handed to the save handler.
///
/// Location and notes are free text. Weekday validity is carried by its type.
pub fn validate(draft: &ScheduleEntryDraft) -> Result<ScheduleEntry, FieldErrors> {
    let mut errors = FieldErrors::new();

    let professional_id = match draft.professional_id {
        None => {
            errors.insert(DraftField::ProfessionalId, ValidationError::Required);
            0
        }
        Some(id) if id <= 0 => {
            errors.insert(DraftField::ProfessionalId, ValidationError::NotPositive(id));
            0
        }
        Some(id) => id,
    };

    let mut time_field = |field: DraftField, value: &str| match parse_time_of_day(value) {
        Ok(time) => format_time_of_day(time),
        Err(e) => {
            errors.insert(field, e);
            String::new()
        }
    };
    let start_time = time_field(DraftField::StartTime, &draft.start_time);
    let end_time = time_field(DraftField::EndTime, &draft.end_time);

    let activity_code = draft.activity_code.trim().to_string();
    if activity_code.is_empty() {
        errors.insert(DraftField::ActivityCode, ValidationError::Required);
    }

    if !errors.is_empty() {
        tracing::debug!(count = errors.len(), "Draft failed validation");
        return Err(errors);
    }

    Ok(ScheduleEntry {
        professional_id,
        weekday: draft.weekday,
        start_time,
        end_time,
        activity_code,
        location: draft.location.clone(),
        notes: draft.notes.clone(),
    })
}
