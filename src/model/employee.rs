use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use utoipa::ToSchema;

use crate::model::role::Role;

/// Keys owned by the system, never accepted from a registration payload.
pub const RESERVED_PROFILE_KEYS: [&str; 4] = ["_id", "employeeId", "attendance", "performance"];

/// One employee's stored profile plus attendance/performance history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    #[serde(rename = "_id")]
    pub id: String,

    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    pub employee_id: String,

    #[serde(default)]
    pub attendance: Vec<AttendanceEntry>,

    #[serde(default)]
    pub performance: Vec<PerformanceEntry>,

    /// Free-form registration fields (name, designation, photo, ...).
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl EmployeeRecord {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(Role::Admin.as_ref())
    }

    pub fn attendance_on(&self, date: &str) -> Option<&AttendanceEntry> {
        self.attendance.iter().find(|entry| entry.date == date)
    }

    pub fn performance_on(&self, date: &str) -> Option<&PerformanceEntry> {
        self.performance.iter().find(|entry| entry.date == date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    #[serde(default)]
    #[schema(example = "Monday")]
    pub week_day: String,

    #[schema(example = "2025-07-01")]
    pub date: String,

    /// Empty means not recorded.
    #[serde(default)]
    #[schema(example = "09:02 AM")]
    pub clock_in: String,

    #[serde(default)]
    #[schema(example = "")]
    pub clock_out: String,

    #[serde(default)]
    #[schema(example = "")]
    pub payroll: String,

    #[serde(default)]
    #[schema(example = 0)]
    pub communication_rating: i64,
}

impl AttendanceEntry {
    /// An entry for `date` with every other field at its default.
    pub fn blank(date: impl Into<String>) -> Self {
        Self {
            week_day: String::new(),
            date: date.into(),
            clock_in: String::new(),
            clock_out: String::new(),
            payroll: String::new(),
            communication_rating: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PerformanceEntry {
    #[schema(example = "2025-07-01")]
    pub date: String,

    /// Kept exactly as submitted, integers stay integers.
    #[schema(value_type = f64, example = 87.5)]
    pub score: Number,
}

/// A single field assignment on the attendance entry matching a date.
#[derive(Debug, Clone, PartialEq)]
pub enum AttendancePatch {
    ClockOut(String),
    Payroll(String),
    CommunicationRating(i64),
}

impl AttendancePatch {
    pub fn apply(&self, entry: &mut AttendanceEntry) {
        match self {
            AttendancePatch::ClockOut(value) => entry.clock_out = value.clone(),
            AttendancePatch::Payroll(value) => entry.payroll = value.clone(),
            AttendancePatch::CommunicationRating(value) => entry.communication_rating = *value,
        }
    }
}

pub const NOT_RECORDED: &str = "Not Recorded";
pub const NO_PAYROLL: &str = "N/A";

/// Read view of one attendance day with display defaults substituted.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackDay {
    #[schema(example = "2025-07-01")]
    pub date: String,
    #[schema(example = "09:02 AM")]
    pub clock_in: String,
    #[schema(example = "Not Recorded")]
    pub clock_out: String,
    #[schema(example = 0)]
    pub communication_rating: i64,
    #[schema(example = "N/A")]
    pub payroll: String,
}

impl From<&AttendanceEntry> for FeedbackDay {
    fn from(entry: &AttendanceEntry) -> Self {
        fn or_default(value: &str, default: &str) -> String {
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        }

        Self {
            date: entry.date.clone(),
            clock_in: or_default(&entry.clock_in, NOT_RECORDED),
            clock_out: or_default(&entry.clock_out, NOT_RECORDED),
            communication_rating: entry.communication_rating,
            payroll: or_default(&entry.payroll, NO_PAYROLL),
        }
    }
}
