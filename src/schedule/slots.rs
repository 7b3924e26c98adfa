use chrono::{Duration, NaiveTime};

use super::model::TimeSlotRef;
use super::validation::format_time_of_day;

/// Grid rows from `day_start` to `day_end` in `slot_minutes` steps. The last row is
/// cut short when the day does not divide evenly.
pub fn generate_slots(day_start: NaiveTime, day_end: NaiveTime, slot_minutes: u32) -> Vec<TimeSlotRef> {
    let mut slots = Vec::new();
    if slot_minutes == 0 || day_end <= day_start {
        return slots;
    }

    let step = Duration::minutes(i64::from(slot_minutes));
    let mut start = day_start;
    while start < day_end {
        // overflowing_add_signed wraps past midnight; treat a wrap as the end of the day
        let (next, wrapped) = start.overflowing_add_signed(step);
        let end = if wrapped != 0 || next > day_end { day_end } else { next };
        slots.push(TimeSlotRef::new(
            format_time_of_day(start),
            format_time_of_day(end),
        ));
        start = end;
    }
    slots
}

/// Whether `time` falls inside `[slot.start, slot.end)`
pub fn slot_contains(slot: &TimeSlotRef, time: NaiveTime) -> bool {
    let parse = |s: &str| NaiveTime::parse_from_str(s, "%H:%M").ok();
    match (parse(&slot.start_time), parse(&slot.end_time)) {
        (Some(start), Some(end)) => time >= start && time < end,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_generate_half_hour_slots() {
        let slots = generate_slots(t(8, 0), t(10, 0), 30);
        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0], TimeSlotRef::new("08:00", "08:30"));
        assert_eq!(slots[3], TimeSlotRef::new("09:30", "10:00"));
    }

    #[test]
    fn test_last_slot_is_truncated() {
        let slots = generate_slots(t(8, 0), t(9, 10), 30);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[2], TimeSlotRef::new("09:00", "09:10"));
    }

    #[test]
    fn test_degenerate_ranges() {
        assert!(generate_slots(t(9, 0), t(9, 0), 30).is_empty());
        assert!(generate_slots(t(9, 0), t(10, 0), 0).is_empty());
        assert_eq!(generate_slots(t(23, 0), t(23, 59), 90).len(), 1);
    }

    #[test]
    fn test_slot_contains() {
        let slot = TimeSlotRef::new("14:00", "14:30");
        assert!(slot_contains(&slot, t(14, 0)));
        assert!(slot_contains(&slot, t(14, 15)));
        assert!(!slot_contains(&slot, t(14, 30)));
        assert!(!slot_contains(&TimeSlotRef::new("", ""), t(14, 0)));
    }
}
