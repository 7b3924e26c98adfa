//! Modal dialog for creating or editing one weekly schedule entry
//!
//! The dialog is either closed or open. Opening it seeds a draft from the caller's
//! context; submitting validates the draft and, on success, hands the entry to the
//! caller's [`DialogHandler`] and closes. Activity options arrive asynchronously and
//! are tagged with the session they were requested for, so a late answer never
//! touches a dialog that has since been closed or reopened.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::schedule::{
    validate, ActivityOption, CurrentActivity, DraftField, FieldErrors, ProfessionalRef,
    ScheduleEntry, ScheduleEntryDraft, TimeSlotRef, Weekday,
};
use crate::error::ValidationError;

use super::activity_options::{build_choices, position_of};
use super::form::{FormCursor, FormField};

/// Receives the outcome of an open dialog
pub trait DialogHandler {
    /// Called once per successful submission, before `on_close`
    fn on_save(&mut self, entry: ScheduleEntry);
    /// Called once per cancel or successful submission
    fn on_close(&mut self);
}

/// Context the caller opens the dialog with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogProps {
    pub professional: Option<ProfessionalRef>,
    pub time_slot: Option<TimeSlotRef>,
    pub current_activity: Option<CurrentActivity>,
    pub weekday: Weekday,
    /// Only changes the title
    pub is_new: bool,
}

impl DialogProps {
    /// Whether both props would seed the same draft
    fn same_context(&self, other: &DialogProps) -> bool {
        self.professional == other.professional
            && self.time_slot == other.time_slot
            && self.current_activity == other.current_activity
            && self.weekday == other.weekday
    }

    fn draft(&self) -> ScheduleEntryDraft {
        ScheduleEntryDraft::from_context(
            self.professional.as_ref(),
            self.time_slot.as_ref(),
            self.current_activity.as_ref(),
            self.weekday,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Entry handed to `on_save`, dialog closed
    Saved,
    /// Field errors recorded, dialog still open
    Invalid,
    /// Nothing to submit
    NotOpen,
}

/// Where the activity listing for the open session stands
#[derive(Debug, Clone, PartialEq, Eq)]
enum OptionsState {
    Loading,
    Loaded(Vec<ActivityOption>),
    /// Lookup failed; only "available" is offered
    Unavailable,
}

/// State that exists only while the dialog is open
#[derive(Debug, Clone)]
struct OpenSession {
    id: u64,
    props: DialogProps,
    draft: ScheduleEntryDraft,
    cursor: FormCursor,
    errors: FieldErrors,
    options: OptionsState,
}

impl OpenSession {
    fn new(id: u64, props: DialogProps) -> Self {
        let draft = props.draft();
        let cursor = FormCursor::new(&draft);
        OpenSession {
            id,
            props,
            draft,
            cursor,
            errors: FieldErrors::new(),
            options: OptionsState::Loading,
        }
    }

    fn reset_draft(&mut self) {
        self.draft = self.props.draft();
        self.cursor = FormCursor::new(&self.draft);
        self.errors = FieldErrors::new();
    }
}

#[derive(Debug, Default)]
pub struct ScheduleEntryDialog {
    session: Option<OpenSession>,
    last_session_id: u64,
}

impl ScheduleEntryDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or reopen) with a fresh draft. Returns the session id that option
    /// fetches for this opening must carry.
    pub fn open(&mut self, props: DialogProps) -> u64 {
        self.last_session_id += 1;
        let id = self.last_session_id;
        tracing::info!(
            session = id,
            weekday = %props.weekday,
            is_new = props.is_new,
            "Schedule entry dialog opened"
        );
        self.session = Some(OpenSession::new(id, props));
        id
    }

    /// Feed the caller's current props. A change in professional, time slot, current
    /// activity or weekday resets the draft and drops unsaved edits.
    pub fn sync_props(&mut self, props: DialogProps) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let reset = !session.props.same_context(&props);
        session.props = props;
        if reset {
            tracing::debug!(session = session.id, "Dialog context changed, draft reset");
            session.reset_draft();
        }
    }

    /// Close without saving
    pub fn cancel(&mut self, handler: &mut dyn DialogHandler) {
        if let Some(session) = self.session.take() {
            tracing::debug!(session = session.id, "Schedule entry dialog cancelled");
            handler.on_close();
        }
    }

    /// Validate the draft; on success save and close, otherwise keep the dialog
    /// open with per-field errors
    pub fn submit(&mut self, handler: &mut dyn DialogHandler) -> SubmitOutcome {
        let Some(session) = self.session.as_mut() else {
            return SubmitOutcome::NotOpen;
        };

        match validate(&session.draft) {
            Ok(entry) => {
                if let OptionsState::Loaded(fetched) = &session.options {
                    let listed = position_of(&build_choices(fetched), &entry.activity_code);
                    if listed.is_none() {
                        tracing::warn!(
                            activity_code = %entry.activity_code,
                            "Saving an activity code missing from the directory listing"
                        );
                    }
                }
                tracing::info!(
                    session = session.id,
                    weekday = %entry.weekday,
                    start = %entry.start_time,
                    activity_code = %entry.activity_code,
                    "Schedule entry submitted"
                );
                self.session = None;
                handler.on_save(entry);
                handler.on_close();
                SubmitOutcome::Saved
            }
            Err(errors) => {
                session.errors = errors;
                SubmitOutcome::Invalid
            }
        }
    }

    /// Replace the option list if `session_id` is the current open session.
    /// Returns whether the options were taken.
    pub fn apply_options(&mut self, session_id: u64, options: Vec<ActivityOption>) -> bool {
        tracing::debug!(session = session_id, count = options.len(), "Options received");
        self.settle_options(session_id, OptionsState::Loaded(options))
    }

    /// Stop waiting for a listing that will not come; the list stays at "available"
    pub fn mark_options_unavailable(&mut self, session_id: u64) -> bool {
        self.settle_options(session_id, OptionsState::Unavailable)
    }

    fn settle_options(&mut self, session_id: u64, state: OptionsState) -> bool {
        match self.session.as_mut() {
            Some(session) if session.id == session_id => {
                session.options = state;
                true
            }
            _ => {
                tracing::debug!(session = session_id, "Discarding options for a stale session");
                false
            }
        }
    }

    /// Set the activity selection. The list highlight is derived from it.
    pub fn select_activity(&mut self, code: &str) {
        if let Some(session) = self.session.as_mut() {
            session.draft.activity_code = code.to_string();
            session.errors.clear_field(DraftField::ActivityCode);
        }
    }

    /// Select the `index`-th entry of [`Self::choices`]
    pub fn select_choice(&mut self, index: usize) -> bool {
        match self.choices().get(index) {
            Some(option) => {
                let code = option.code.clone();
                self.select_activity(&code);
                true
            }
            None => false,
        }
    }

    /// Move the selection by `delta`, wrapping around the list
    pub fn cycle_choice(&mut self, delta: isize) {
        let choices = self.choices();
        if choices.is_empty() {
            return;
        }
        let len = choices.len() as isize;
        let next = match self.selected_choice() {
            Some(current) => (current as isize + delta).rem_euclid(len),
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.select_choice(next as usize);
    }

    /// Keyboard driver. Returns whether the key was used.
    pub fn handle_key(&mut self, key: KeyEvent, handler: &mut dyn DialogHandler) -> bool {
        let Some(field) = self.current_field() else {
            return false;
        };

        match key.code {
            KeyCode::Esc => self.cancel(handler),
            KeyCode::Enter => {
                self.submit(handler);
            }
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => self.previous_field(),
            KeyCode::BackTab | KeyCode::Up => self.previous_field(),
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::Left if field == FormField::Activity => self.cycle_choice(-1),
            KeyCode::Right if field == FormField::Activity => self.cycle_choice(1),
            KeyCode::Char(c) if field == FormField::Activity => match c.to_digit(10) {
                Some(digit) => {
                    self.select_choice(digit as usize);
                }
                None => return false,
            },
            KeyCode::Char(_) if key.modifiers.contains(KeyModifiers::CONTROL) => return false,
            _ => return self.edit_text(key.code),
        }
        true
    }

    fn edit_text(&mut self, code: KeyCode) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let OpenSession {
            draft,
            cursor,
            errors,
            ..
        } = session;

        let changed = match code {
            KeyCode::Left => {
                cursor.move_cursor_left();
                false
            }
            KeyCode::Right => {
                cursor.move_cursor_right(draft);
                false
            }
            KeyCode::Home => {
                cursor.move_cursor_to_start();
                false
            }
            KeyCode::End => {
                cursor.move_cursor_to_end(draft);
                false
            }
            KeyCode::Backspace => cursor.delete_char_before(draft),
            KeyCode::Delete => cursor.delete_char_at(draft),
            KeyCode::Char(c) => cursor.insert_char(draft, c),
            _ => return false,
        };

        if changed {
            errors.clear_field(cursor.current_field.draft_field());
        }
        true
    }

    fn next_field(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.cursor.next_field(&session.draft);
        }
    }

    fn previous_field(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.cursor.previous_field(&session.draft);
        }
    }

    /// Focus a specific field
    pub fn focus(&mut self, field: FormField) {
        if let Some(session) = self.session.as_mut() {
            session.cursor.current_field = field;
            session.cursor.update_cursor_for_field(&session.draft);
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session_id(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.id)
    }

    pub fn props(&self) -> Option<&DialogProps> {
        self.session.as_ref().map(|s| &s.props)
    }

    pub fn draft(&self) -> Option<&ScheduleEntryDraft> {
        self.session.as_ref().map(|s| &s.draft)
    }

    pub fn cursor(&self) -> Option<&FormCursor> {
        self.session.as_ref().map(|s| &s.cursor)
    }

    pub fn current_field(&self) -> Option<FormField> {
        self.cursor().map(|c| c.current_field)
    }

    pub fn error_for(&self, field: DraftField) -> Option<&ValidationError> {
        self.session.as_ref().and_then(|s| s.errors.get(field))
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        self.session.as_ref().map(|s| &s.errors)
    }

    /// Whether the lookup for the current session has finished, successfully or not
    pub fn options_loaded(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| s.options != OptionsState::Loading)
            .unwrap_or(false)
    }

    /// "Available" followed by the fetched options
    pub fn choices(&self) -> Vec<ActivityOption> {
        match self.session.as_ref().map(|s| &s.options) {
            Some(OptionsState::Loaded(fetched)) => build_choices(fetched),
            _ => build_choices(&[]),
        }
    }

    /// Index of the current activity in [`Self::choices`]
    pub fn selected_choice(&self) -> Option<usize> {
        let draft = self.draft()?;
        position_of(&self.choices(), &draft.activity_code)
    }

    pub fn title(&self) -> &'static str {
        match self.props() {
            Some(props) if props.is_new => " New schedule entry ",
            _ => " Edit schedule entry ",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::AVAILABLE_ACTIVITY_CODE;

    #[derive(Default)]
    struct Recorder {
        saved: Vec<ScheduleEntry>,
        closed: usize,
    }

    impl DialogHandler for Recorder {
        fn on_save(&mut self, entry: ScheduleEntry) {
            self.saved.push(entry);
        }

        fn on_close(&mut self) {
            self.closed += 1;
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn props() -> DialogProps {
        DialogProps {
            professional: Some(ProfessionalRef {
                id: 3,
                name: "Dr. Souza".to_string(),
            }),
            time_slot: Some(TimeSlotRef::new("14:15", "15:45")),
            current_activity: None,
            weekday: Weekday::Wednesday,
            is_new: true,
        }
    }

    fn options() -> Vec<ActivityOption> {
        vec![
            ActivityOption {
                id: 1,
                code: "consulta".to_string(),
                name: "Consulta".to_string(),
            },
            ActivityOption {
                id: 2,
                code: "cirurgia".to_string(),
                name: "Cirurgia".to_string(),
            },
        ]
    }

    #[test]
    fn test_closed_dialog_ignores_everything() {
        let mut dialog = ScheduleEntryDialog::new();
        let mut recorder = Recorder::default();

        assert_eq!(dialog.submit(&mut recorder), SubmitOutcome::NotOpen);
        dialog.cancel(&mut recorder);
        assert!(!dialog.handle_key(key(KeyCode::Enter), &mut recorder));
        assert!(!dialog.apply_options(1, options()));

        assert!(recorder.saved.is_empty());
        assert_eq!(recorder.closed, 0);
    }

    #[test]
    fn test_cancel_closes_once() {
        let mut dialog = ScheduleEntryDialog::new();
        let mut recorder = Recorder::default();
        dialog.open(props());

        dialog.handle_key(key(KeyCode::Esc), &mut recorder);
        dialog.cancel(&mut recorder);

        assert!(!dialog.is_open());
        assert_eq!(recorder.closed, 1);
        assert!(recorder.saved.is_empty());
    }

    #[test]
    fn test_sync_props_resets_only_on_context_change() {
        let mut dialog = ScheduleEntryDialog::new();
        dialog.open(props());
        dialog.select_activity("consulta");

        // Title flag alone keeps the edits
        let mut same = props();
        same.is_new = false;
        dialog.sync_props(same);
        assert_eq!(dialog.draft().unwrap().activity_code, "consulta");
        assert_eq!(dialog.title(), " Edit schedule entry ");

        let mut moved = props();
        moved.weekday = Weekday::Thursday;
        dialog.sync_props(moved);
        let draft = dialog.draft().unwrap();
        assert_eq!(draft.activity_code, AVAILABLE_ACTIVITY_CODE);
        assert_eq!(draft.weekday, Weekday::Thursday);
    }

    #[test]
    fn test_sync_props_on_closed_dialog_does_not_open() {
        let mut dialog = ScheduleEntryDialog::new();
        dialog.sync_props(props());
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_stale_options_are_discarded() {
        let mut dialog = ScheduleEntryDialog::new();
        let first = dialog.open(props());
        let second = dialog.open(props());
        assert_ne!(first, second);

        assert!(!dialog.apply_options(first, options()));
        assert!(!dialog.options_loaded());
        assert_eq!(dialog.choices().len(), 1);

        assert!(dialog.apply_options(second, options()));
        assert!(dialog.options_loaded());
        assert_eq!(dialog.choices().len(), 3);
    }

    #[test]
    fn test_unavailable_options_settle_with_sentinel_only() {
        let mut dialog = ScheduleEntryDialog::new();
        let first = dialog.open(props());
        let second = dialog.open(props());
        assert!(!dialog.options_loaded());

        assert!(!dialog.mark_options_unavailable(first));
        assert!(!dialog.options_loaded());
        assert!(dialog.mark_options_unavailable(second));
        assert!(dialog.options_loaded());
        assert_eq!(dialog.choices().len(), 1);
        assert_eq!(dialog.selected_choice(), Some(0));
    }

    #[test]
    fn test_choice_cycling_wraps_and_stays_in_sync() {
        let mut dialog = ScheduleEntryDialog::new();
        let session = dialog.open(props());
        dialog.apply_options(session, options());
        assert_eq!(dialog.selected_choice(), Some(0));

        dialog.cycle_choice(1);
        assert_eq!(dialog.draft().unwrap().activity_code, "consulta");
        dialog.cycle_choice(1);
        dialog.cycle_choice(1);
        assert_eq!(dialog.selected_choice(), Some(0));
        dialog.cycle_choice(-1);
        assert_eq!(dialog.draft().unwrap().activity_code, "cirurgia");

        assert!(!dialog.select_choice(9));
        assert_eq!(dialog.selected_choice(), Some(2));
    }

    #[test]
    fn test_digit_keys_pick_choices_on_activity_field() {
        let mut dialog = ScheduleEntryDialog::new();
        let mut recorder = Recorder::default();
        let session = dialog.open(props());
        dialog.apply_options(session, options());
        dialog.focus(FormField::Activity);

        dialog.handle_key(key(KeyCode::Char('2')), &mut recorder);
        assert_eq!(dialog.draft().unwrap().activity_code, "cirurgia");
        assert!(!dialog.handle_key(key(KeyCode::Char('x')), &mut recorder));
    }

    #[test]
    fn test_unlisted_current_activity_has_no_highlight() {
        let mut dialog = ScheduleEntryDialog::new();
        let mut with_activity = props();
        with_activity.current_activity = Some(CurrentActivity {
            activity_code: "retorno".to_string(),
            location: None,
            notes: None,
        });
        dialog.open(with_activity);
        assert_eq!(dialog.selected_choice(), None);

        dialog.cycle_choice(1);
        assert_eq!(dialog.selected_choice(), Some(0));
    }

    #[test]
    fn test_editing_clears_field_error() {
        let mut dialog = ScheduleEntryDialog::new();
        let mut recorder = Recorder::default();
        let mut blank = props();
        blank.time_slot = None;
        dialog.open(blank);

        assert_eq!(dialog.submit(&mut recorder), SubmitOutcome::Invalid);
        assert!(dialog.error_for(DraftField::StartTime).is_some());
        assert!(dialog.error_for(DraftField::EndTime).is_some());

        dialog.handle_key(key(KeyCode::Char('9')), &mut recorder);
        assert!(dialog.error_for(DraftField::StartTime).is_none());
        assert!(dialog.error_for(DraftField::EndTime).is_some());
    }

    #[test]
    fn test_missing_professional_blocks_submit() {
        let mut dialog = ScheduleEntryDialog::new();
        let mut recorder = Recorder::default();
        let mut anonymous = props();
        anonymous.professional = None;
        dialog.open(anonymous);

        assert_eq!(dialog.submit(&mut recorder), SubmitOutcome::Invalid);
        assert_eq!(
            dialog.error_for(DraftField::ProfessionalId),
            Some(&ValidationError::Required)
        );
        assert!(dialog.is_open());
        assert_eq!(recorder.closed, 0);
    }
}
