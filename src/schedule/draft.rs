//! Mutable form state for one schedule entry

use super::model::{CurrentActivity, ProfessionalRef, TimeSlotRef, AVAILABLE_ACTIVITY_CODE};
use super::weekday::Weekday;

/// Every field of a draft, including the ones the user cannot edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DraftField {
    ProfessionalId,
    Weekday,
    StartTime,
    EndTime,
    ActivityCode,
    Location,
    Notes,
}

impl DraftField {
    pub fn label(&self) -> &'static str {
        match self {
            DraftField::ProfessionalId => "Professional",
            DraftField::Weekday => "Weekday",
            DraftField::StartTime => "Start time",
            DraftField::EndTime => "End time",
            DraftField::ActivityCode => "Activity",
            DraftField::Location => "Location",
            DraftField::Notes => "Notes",
        }
    }
}

/// In-progress, unsaved state of the dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntryDraft {
    pub professional_id: Option<i64>,
    pub weekday: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub activity_code: String,
    pub location: String,
    pub notes: String,
}

impl ScheduleEntryDraft {
    /// Build a fresh draft from the caller's context. Absent context leaves the
    /// matching fields blank; an absent activity means "available".
    pub fn from_context(
        professional: Option<&ProfessionalRef>,
        time_slot: Option<&TimeSlotRef>,
        current_activity: Option<&CurrentActivity>,
        weekday: Weekday,
    ) -> Self {
        ScheduleEntryDraft {
            professional_id: professional.map(|p| p.id),
            weekday,
            start_time: time_slot.map(|s| s.start_time.clone()).unwrap_or_default(),
            end_time: time_slot.map(|s| s.end_time.clone()).unwrap_or_default(),
            activity_code: current_activity
                .map(|a| a.activity_code.clone())
                .unwrap_or_else(|| AVAILABLE_ACTIVITY_CODE.to_string()),
            location: current_activity
                .and_then(|a| a.location.clone())
                .unwrap_or_default(),
            notes: current_activity
                .and_then(|a| a.notes.clone())
                .unwrap_or_default(),
        }
    }

    /// Text of a user-editable field; `None` for the fixed ones
    pub fn text(&self, field: DraftField) -> Option<&str> {
        match field {
            DraftField::StartTime => Some(&self.start_time),
            DraftField::EndTime => Some(&self.end_time),
            DraftField::ActivityCode => Some(&self.activity_code),
            DraftField::Location => Some(&self.location),
            DraftField::Notes => Some(&self.notes),
            DraftField::ProfessionalId | DraftField::Weekday => None,
        }
    }

    pub fn text_mut(&mut self, field: DraftField) -> Option<&mut String> {
        match field {
            DraftField::StartTime => Some(&mut self.start_time),
            DraftField::EndTime => Some(&mut self.end_time),
            DraftField::ActivityCode => Some(&mut self.activity_code),
            DraftField::Location => Some(&mut self.location),
            DraftField::Notes => Some(&mut self.notes),
            DraftField::ProfessionalId | DraftField::Weekday => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_defaults_to_available() {
        let slot = TimeSlotRef::new("14:15", "15:45");
        let draft = ScheduleEntryDraft::from_context(None, Some(&slot), None, Weekday::Monday);

        assert_eq!(draft.professional_id, None);
        assert_eq!(draft.start_time, "14:15");
        assert_eq!(draft.end_time, "15:45");
        assert_eq!(draft.activity_code, AVAILABLE_ACTIVITY_CODE);
        assert!(draft.location.is_empty());
        assert!(draft.notes.is_empty());
    }

    #[test]
    fn test_existing_activity_is_copied() {
        let professional = ProfessionalRef {
            id: 5,
            name: "Ana".to_string(),
        };
        let current = CurrentActivity {
            activity_code: "consulta".to_string(),
            location: Some("Room 2".to_string()),
            notes: Some("bring chart".to_string()),
        };
        let draft = ScheduleEntryDraft::from_context(
            Some(&professional),
            None,
            Some(&current),
            Weekday::Thursday,
        );

        assert_eq!(draft.professional_id, Some(5));
        assert!(draft.start_time.is_empty());
        assert_eq!(draft.activity_code, "consulta");
        assert_eq!(draft.location, "Room 2");
        assert_eq!(draft.notes, "bring chart");
    }

    #[test]
    fn test_fixed_fields_have_no_text() {
        let mut draft = ScheduleEntryDraft::from_context(None, None, None, Weekday::Friday);
        assert!(draft.text(DraftField::Weekday).is_none());
        assert!(draft.text_mut(DraftField::ProfessionalId).is_none());
        draft.text_mut(DraftField::Notes).unwrap().push_str("hi");
        assert_eq!(draft.notes, "hi");
    }
}
