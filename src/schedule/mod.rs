//! Schedule domain model: weekdays, draft state, validation, time slots and the
//! local store the grid saves into

pub mod draft;
pub mod model;
pub mod slots;
pub mod store;
pub mod validation;
pub mod weekday;

pub use draft::{DraftField, ScheduleEntryDraft};
pub use model::{
    ActivityOption, CurrentActivity, ProfessionalRef, ScheduleEntry, TimeSlotRef,
    AVAILABLE_ACTIVITY_CODE,
};
pub use slots::generate_slots;
pub use store::{EntryKey, WeeklySchedule};
pub use validation::{format_time_of_day, parse_time_of_day, validate, FieldErrors};
pub use weekday::Weekday;
