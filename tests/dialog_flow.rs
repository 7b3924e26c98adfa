// End-to-end flows through the schedule entry dialog using only the public API

use agenda::error::ValidationError;
use agenda::interactive::form::FormField;
use agenda::interactive::{DialogHandler, DialogProps, ScheduleEntryDialog, SubmitOutcome};
use agenda::schedule::{
    ActivityOption, CurrentActivity, DraftField, ProfessionalRef, ScheduleEntry, TimeSlotRef,
    Weekday, AVAILABLE_ACTIVITY_CODE,
};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

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

fn press(dialog: &mut ScheduleEntryDialog, recorder: &mut Recorder, code: KeyCode) {
    dialog.handle_key(KeyEvent::new(code, KeyModifiers::NONE), recorder);
}

fn type_text(dialog: &mut ScheduleEntryDialog, recorder: &mut Recorder, text: &str) {
    for c in text.chars() {
        press(dialog, recorder, KeyCode::Char(c));
    }
}

fn props(current_activity: Option<CurrentActivity>) -> DialogProps {
    DialogProps {
        professional: Some(ProfessionalRef {
            id: 7,
            name: "Dra. Costa".to_string(),
        }),
        time_slot: Some(TimeSlotRef::new("14:15", "15:45")),
        current_activity,
        weekday: Weekday::Tuesday,
        is_new: false,
    }
}

fn consulta_in_room_2() -> CurrentActivity {
    CurrentActivity {
        activity_code: "consulta".to_string(),
        location: Some("Room 2".to_string()),
        notes: None,
    }
}

fn directory_options() -> Vec<ActivityOption> {
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
fn unchanged_new_slot_saves_as_available() {
    let mut dialog = ScheduleEntryDialog::new();
    let mut recorder = Recorder::default();
    dialog.open(props(None));

    assert_eq!(dialog.submit(&mut recorder), SubmitOutcome::Saved);

    assert_eq!(recorder.saved.len(), 1);
    assert_eq!(recorder.closed, 1);
    let entry = &recorder.saved[0];
    assert_eq!(entry.professional_id, 7);
    assert_eq!(entry.weekday, Weekday::Tuesday);
    assert_eq!(entry.activity_code, AVAILABLE_ACTIVITY_CODE);
    assert_eq!(entry.start_time, "14:15");
    assert_eq!(entry.end_time, "15:45");
    assert_eq!(entry.location, "");
    assert_eq!(entry.notes, "");
    assert!(!dialog.is_open());
}

#[test]
fn editing_end_time_keeps_current_activity_and_location() {
    let mut dialog = ScheduleEntryDialog::new();
    let mut recorder = Recorder::default();
    dialog.open(props(Some(consulta_in_room_2())));

    dialog.focus(FormField::EndTime);
    for _ in 0..5 {
        press(&mut dialog, &mut recorder, KeyCode::Backspace);
    }
    type_text(&mut dialog, &mut recorder, "16:00");
    press(&mut dialog, &mut recorder, KeyCode::Enter);

    assert_eq!(recorder.saved.len(), 1);
    let entry = &recorder.saved[0];
    assert_eq!(entry.activity_code, "consulta");
    assert_eq!(entry.start_time, "14:15");
    assert_eq!(entry.end_time, "16:00");
    assert_eq!(entry.location, "Room 2");
}

#[test]
fn cleared_start_time_blocks_submission() {
    let mut dialog = ScheduleEntryDialog::new();
    let mut recorder = Recorder::default();
    dialog.open(props(None));

    for _ in 0..5 {
        press(&mut dialog, &mut recorder, KeyCode::Backspace);
    }
    press(&mut dialog, &mut recorder, KeyCode::Enter);

    assert!(recorder.saved.is_empty());
    assert_eq!(recorder.closed, 0);
    assert!(dialog.is_open());
    assert_eq!(
        dialog.error_for(DraftField::StartTime),
        Some(&ValidationError::Required)
    );
    assert_eq!(ValidationError::Required.to_string(), "Required");
    assert!(dialog.error_for(DraftField::EndTime).is_none());
}

#[test]
fn reopening_resets_selection_to_new_context() {
    let mut dialog = ScheduleEntryDialog::new();
    let mut recorder = Recorder::default();

    let first = dialog.open(props(None));
    dialog.apply_options(first, directory_options());
    dialog.select_activity("cirurgia");
    press(&mut dialog, &mut recorder, KeyCode::Esc);
    assert_eq!(recorder.closed, 1);

    dialog.open(props(Some(consulta_in_room_2())));
    assert_eq!(dialog.draft().unwrap().activity_code, "consulta");

    dialog.open(props(None));
    assert_eq!(dialog.draft().unwrap().activity_code, AVAILABLE_ACTIVITY_CODE);
    assert!(recorder.saved.is_empty());
}

#[test]
fn changing_context_while_open_discards_edits() {
    let mut dialog = ScheduleEntryDialog::new();
    dialog.open(props(None));
    dialog.select_activity("cirurgia");

    dialog.sync_props(props(Some(consulta_in_room_2())));

    let draft = dialog.draft().unwrap();
    assert_eq!(draft.activity_code, "consulta");
    assert_eq!(draft.location, "Room 2");
}

#[test]
fn highlighted_choice_always_matches_submitted_code() {
    let mut dialog = ScheduleEntryDialog::new();
    let mut recorder = Recorder::default();
    let session = dialog.open(props(None));
    dialog.focus(FormField::Activity);

    // Usable before the directory answers
    assert_eq!(dialog.choices().len(), 1);
    assert_eq!(dialog.selected_choice(), Some(0));

    dialog.apply_options(session, directory_options());
    for step in [1, 1, -1, 1, 1] {
        press(
            &mut dialog,
            &mut recorder,
            if step > 0 { KeyCode::Right } else { KeyCode::Left },
        );
        let choices = dialog.choices();
        let highlighted = &choices[dialog.selected_choice().unwrap()];
        assert_eq!(highlighted.code, dialog.draft().unwrap().activity_code);
    }

    let expected = dialog.draft().unwrap().activity_code.clone();
    press(&mut dialog, &mut recorder, KeyCode::Enter);
    assert_eq!(recorder.saved[0].activity_code, expected);
}

#[test]
fn late_options_for_a_closed_dialog_are_ignored() {
    let mut dialog = ScheduleEntryDialog::new();
    let mut recorder = Recorder::default();
    let session = dialog.open(props(None));
    dialog.cancel(&mut recorder);

    assert!(!dialog.apply_options(session, directory_options()));
    assert!(!dialog.is_open());

    let reopened = dialog.open(props(None));
    assert!(!dialog.apply_options(session, directory_options()));
    assert!(dialog.apply_options(reopened, directory_options()));
    assert_eq!(dialog.choices().len(), 3);
}

#[test]
fn missing_time_slot_reports_both_times() {
    let mut dialog = ScheduleEntryDialog::new();
    let mut recorder = Recorder::default();
    let mut without_slot = props(None);
    without_slot.time_slot = None;
    dialog.open(without_slot);

    assert_eq!(dialog.submit(&mut recorder), SubmitOutcome::Invalid);
    let errors = dialog.errors().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors.get(DraftField::EndTime),
        Some(&ValidationError::Required)
    );
}
