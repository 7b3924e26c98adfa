use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::weekday::Weekday;

/// Activity code of the synthetic "available" choice
pub const AVAILABLE_ACTIVITY_CODE: &str = "disponivel";

/// Activity type served by the activity directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityOption {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: i64,
    pub code: String,
    pub name: String,
}

impl ActivityOption {
    /// The synthetic choice listed before every fetched option
    pub fn available() -> Self {
        ActivityOption {
            id: 0,
            code: AVAILABLE_ACTIVITY_CODE.to_string(),
            name: "Available".to_string(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.code == AVAILABLE_ACTIVITY_CODE
    }
}

// The directory sends ids either as numbers or as numeric strings
fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    match value {
        Value::Number(num) => num
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom("Invalid integer ID")),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom("Invalid string ID")),
        _ => Err(serde::de::Error::custom("ID must be a string or integer")),
    }
}

/// Professional whose week is being edited
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionalRef {
    pub id: i64,
    pub name: String,
}

/// Start/end pair of a grid row, as entered or generated (HH:MM)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotRef {
    pub start_time: String,
    pub end_time: String,
}

impl TimeSlotRef {
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        TimeSlotRef {
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }
}

/// Activity already booked in a slot, used to pre-populate an edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentActivity {
    pub activity_code: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A validated schedule entry, as handed to the save handler and persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEntry {
    pub professional_id: i64,
    pub weekday: Weekday,
    pub start_time: String,
    pub end_time: String,
    pub activity_code: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
}

impl ScheduleEntry {
    pub fn is_available(&self) -> bool {
        self.activity_code == AVAILABLE_ACTIVITY_CODE
    }

    pub fn as_current_activity(&self) -> CurrentActivity {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        CurrentActivity {
            activity_code: self.activity_code.clone(),
            location: non_empty(&self.location),
            notes: non_empty(&self.notes),
        }
    }

    pub fn time_slot(&self) -> TimeSlotRef {
        TimeSlotRef::new(self.start_time.clone(), self.end_time.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_option_id_forms() {
        let numeric: ActivityOption =
            serde_json::from_str(r#"{"id": 3, "code": "consulta", "name": "Consulta"}"#).unwrap();
        let string: ActivityOption =
            serde_json::from_str(r#"{"id": "3", "code": "consulta", "name": "Consulta"}"#)
                .unwrap();
        assert_eq!(numeric, string);

        let bad = serde_json::from_str::<ActivityOption>(r#"{"id": "x", "code": "a", "name": "A"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = ScheduleEntry {
            professional_id: 9,
            weekday: Weekday::Monday,
            start_time: "14:15".to_string(),
            end_time: "15:45".to_string(),
            activity_code: AVAILABLE_ACTIVITY_CODE.to_string(),
            location: String::new(),
            notes: String::new(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["professionalId"], 9);
        assert_eq!(value["activityCode"], "disponivel");
        assert_eq!(value["startTime"], "14:15");
        assert_eq!(value["weekday"], "monday");
    }

    #[test]
    fn test_as_current_activity_drops_empty_strings() {
        let entry = ScheduleEntry {
            professional_id: 1,
            weekday: Weekday::Friday,
            start_time: "09:00".to_string(),
            end_time: "09:30".to_string(),
            activity_code: "consulta".to_string(),
            location: "Room 2".to_string(),
            notes: String::new(),
        };
        let current = entry.as_current_activity();
        assert_eq!(current.location.as_deref(), Some("Room 2"));
        assert_eq!(current.notes, None);
        assert!(!entry.is_available());
        assert!(ActivityOption::available().is_available());
    }
}
