use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

/// Day of week for a recurring slot. Full weekday names on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SlotDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl SlotDay {
    pub const ALL: [SlotDay; 7] = [
        SlotDay::Monday,
        SlotDay::Tuesday,
        SlotDay::Wednesday,
        SlotDay::Thursday,
        SlotDay::Friday,
        SlotDay::Saturday,
        SlotDay::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotDay::Monday => "Monday",
            SlotDay::Tuesday => "Tuesday",
            SlotDay::Wednesday => "Wednesday",
            SlotDay::Thursday => "Thursday",
            SlotDay::Friday => "Friday",
            SlotDay::Saturday => "Saturday",
            SlotDay::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for SlotDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotDay {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SlotDay::ALL
            .iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or(())
    }
}

/// Serde adapter for slot boundaries: "HH:mm" 24-hour strings,
/// zero-padded on output.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

/// One recurring weekly time window at a clinic. Boundaries are
/// half-open: a slot ending exactly when another begins does not
/// overlap it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub day: SlotDay,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub is_active: bool,
}

/// Raw slot as submitted by a client, before syntactic validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotInput {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

/// The recurring weekly schedule of one practitioner at one clinic.
/// Exists only while the pair has an active affiliation; archived (not
/// deleted) when that affiliation is removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityDocument {
    pub id: Uuid,
    pub practitioner_id: Uuid,
    pub clinic_id: Uuid,
    pub slots: Vec<Slot>,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AvailabilityDocument {
    pub fn active_slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|slot| slot.is_active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Append,
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictScope {
    SameClinic,
    OtherClinic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            self.start.format(hhmm::FORMAT),
            self.end.format(hhmm::FORMAT)
        )
    }
}

/// What gets reported back on a rejected write: the day, both ranges,
/// and whether the existing slot belongs to the clinic being edited or
/// a different one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub day: SlotDay,
    pub candidate: TimeRange,
    pub existing: TimeRange,
    pub scope: ConflictScope,
    pub clinic_id: Option<Uuid>,
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            ConflictScope::SameClinic => write!(
                f,
                "Slot {} {} overlaps {} at this clinic",
                self.day, self.candidate, self.existing
            ),
            ConflictScope::OtherClinic => write!(
                f,
                "Slot {} {} overlaps {} at clinic {}",
                self.day,
                self.candidate,
                self.existing,
                self.clinic_id.map(|id| id.to_string()).unwrap_or_default()
            ),
        }
    }
}

#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(ConflictReport),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<AvailabilityError> for AppError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::Validation(msg) => AppError::Validation(msg),
            AvailabilityError::Conflict(report) => AppError::ScheduleConflict {
                message: report.to_string(),
                report: serde_json::to_value(&report).unwrap_or_default(),
            },
            AvailabilityError::Forbidden(msg) => AppError::Forbidden(msg),
            AvailabilityError::NotFound(msg) => AppError::NotFound(msg),
            AvailabilityError::Database(msg) => AppError::Database(msg),
        }
    }
}

/// Body of availability write requests.
#[derive(Debug, Clone, Deserialize)]
pub struct SlotListRequest {
    pub slots: Vec<SlotInput>,
}
