//! Field navigation and text editing for the schedule entry form

use crate::schedule::{DraftField, ScheduleEntryDraft};

/// Editable form fields, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    StartTime,
    EndTime,
    Activity,
    Location,
    Notes,
}

impl FormField {
    /// Get all fields in order
    pub fn all() -> [FormField; 5] {
        [
            FormField::StartTime,
            FormField::EndTime,
            FormField::Activity,
            FormField::Location,
            FormField::Notes,
        ]
    }

    pub fn next(&self) -> FormField {
        match self {
            FormField::StartTime => FormField::EndTime,
            FormField::EndTime => FormField::Activity,
            FormField::Activity => FormField::Location,
            FormField::Location => FormField::Notes,
            FormField::Notes => FormField::StartTime,
        }
    }

    pub fn previous(&self) -> FormField {
        match self {
            FormField::StartTime => FormField::Notes,
            FormField::EndTime => FormField::StartTime,
            FormField::Activity => FormField::EndTime,
            FormField::Location => FormField::Activity,
            FormField::Notes => FormField::Location,
        }
    }

    pub fn draft_field(&self) -> DraftField {
        match self {
            FormField::StartTime => DraftField::StartTime,
            FormField::EndTime => DraftField::EndTime,
            FormField::Activity => DraftField::ActivityCode,
            FormField::Location => DraftField::Location,
            FormField::Notes => DraftField::Notes,
        }
    }

    pub fn label(&self) -> &'static str {
        self.draft_field().label()
    }

    /// Whether keystrokes edit the field as free text
    pub fn is_text(&self) -> bool {
        !matches!(self, FormField::Activity)
    }

    pub fn hint(&self) -> &'static str {
        match self {
            FormField::StartTime | FormField::EndTime => "Format: HH:MM (e.g., 14:15)",
            FormField::Activity => "←→ to change, or press 0-9 to pick from the list",
            FormField::Location => "Optional room or address",
            FormField::Notes => "Optional notes",
        }
    }
}

/// Which field has focus and where the cursor sits inside it (in characters)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormCursor {
    pub current_field: FormField,
    pub cursor_position: usize,
}

impl FormCursor {
    /// Focus the first field with the cursor at the end of its text
    pub fn new(draft: &ScheduleEntryDraft) -> Self {
        let mut cursor = FormCursor {
            current_field: FormField::StartTime,
            cursor_position: 0,
        };
        cursor.update_cursor_for_field(draft);
        cursor
    }

    pub fn next_field(&mut self, draft: &ScheduleEntryDraft) {
        self.current_field = self.current_field.next();
        self.update_cursor_for_field(draft);
    }

    pub fn previous_field(&mut self, draft: &ScheduleEntryDraft) {
        self.current_field = self.current_field.previous();
        self.update_cursor_for_field(draft);
    }

    /// Start at end of the newly focused field
    pub fn update_cursor_for_field(&mut self, draft: &ScheduleEntryDraft) {
        self.cursor_position = field_len(draft, self.current_field);
    }

    /// Insert character at cursor position. Returns whether the draft changed.
    pub fn insert_char(&mut self, draft: &mut ScheduleEntryDraft, c: char) -> bool {
        if !self.current_field.is_text() {
            return false;
        }
        let pos = self.cursor_position;
        let Some(text) = draft.text_mut(self.current_field.draft_field()) else {
            return false;
        };
        let pos = pos.min(text.chars().count());
        let index = byte_index(text, pos);
        text.insert(index, c);
        self.cursor_position = pos + 1;
        true
    }

    /// Delete character before cursor (backspace)
    pub fn delete_char_before(&mut self, draft: &mut ScheduleEntryDraft) -> bool {
        if !self.current_field.is_text() || self.cursor_position == 0 {
            return false;
        }
        let cursor_pos = self.cursor_position;
        let Some(text) = draft.text_mut(self.current_field.draft_field()) else {
            return false;
        };
        let pos = cursor_pos.min(text.chars().count());
        if pos == 0 {
            return false;
        }
        let index = byte_index(text, pos - 1);
        text.remove(index);
        self.cursor_position = pos - 1;
        true
    }

    /// Delete character at cursor (delete key)
    pub fn delete_char_at(&mut self, draft: &mut ScheduleEntryDraft) -> bool {
        if !self.current_field.is_text() {
            return false;
        }
        let cursor_pos = self.cursor_position;
        let Some(text) = draft.text_mut(self.current_field.draft_field()) else {
            return false;
        };
        if cursor_pos >= text.chars().count() {
            return false;
        }
        let index = byte_index(text, cursor_pos);
        text.remove(index);
        true
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self, draft: &ScheduleEntryDraft) {
        if self.cursor_position < field_len(draft, self.current_field) {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self, draft: &ScheduleEntryDraft) {
        self.cursor_position = field_len(draft, self.current_field);
    }
}

fn field_len(draft: &ScheduleEntryDraft, field: FormField) -> usize {
    draft
        .text(field.draft_field())
        .map(|text| text.chars().count())
        .unwrap_or(0)
}

/// Byte offset of the `char_pos`-th character
pub fn byte_index(text: &str, char_pos: usize) -> usize {
    text.char_indices()
        .nth(char_pos)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}
