use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::model::problem::{Problem, text_field};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    ToSchema,
)]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
    Leave,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    /// Identifier of the employee the record belongs to (free text).
    #[schema(example = "asha.rao@company.com")]
    pub employee: String,

    #[serde(deserialize_with = "deserialize_calendar_day")]
    #[schema(example = "2024-01-03", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[serde(default)]
    pub status: AttendanceStatus,
}

#[derive(Debug, sqlx::FromRow)]
pub struct AttendanceRow {
    pub id: u64,
    pub employee: String,
    pub date: NaiveDate,
    pub status: String,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = strum::ParseError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            employee: row.employee,
            date: row.date,
            status: row.status.parse()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendance {
    pub employee: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

impl NewAttendance {
    /// Validates a loosely-typed JSON object.
    ///
    /// When `default_status` is `None` the `status` field is required.
    pub fn from_value(
        value: &Value,
        default_status: Option<AttendanceStatus>,
    ) -> Result<Self, Vec<Problem>> {
        let Some(obj) = value.as_object() else {
            return Err(vec![Problem::NotAnObject]);
        };

        let mut problems = Vec::new();
        let employee = text_field(obj, "employee", &mut problems);

        let date = text_field(obj, "date", &mut problems).and_then(|raw| {
            parse_calendar_day(&raw)
                .map_err(|_| problems.push(Problem::NotADate("date")))
                .ok()
        });

        let status = match obj.get("status") {
            None | Some(Value::Null) => match default_status {
                Some(status) => Some(status),
                None => {
                    problems.push(Problem::Missing("status"));
                    None
                }
            },
            Some(_) => text_field(obj, "status", &mut problems).and_then(|raw| {
                raw.parse::<AttendanceStatus>()
                    .map_err(|_| problems.push(Problem::UnknownStatus(raw.clone())))
                    .ok()
            }),
        };

        match (employee, date, status) {
            (Some(employee), Some(date), Some(status)) if problems.is_empty() => Ok(Self {
                employee,
                date,
                status,
            }),
            _ => Err(problems),
        }
    }

    pub fn with_id(self, id: u64) -> AttendanceRecord {
        AttendanceRecord {
            id,
            employee: self.employee,
            date: self.date,
            status: self.status,
        }
    }
}

/// Parses a date-only string or a timestamp down to its calendar day.
///
/// Zoned timestamps keep the day as written in their own offset.
pub fn parse_calendar_day(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
}

pub fn deserialize_calendar_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_day(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_dates_and_timestamps_to_calendar_day() {
        assert_eq!(parse_calendar_day("2024-01-03").unwrap(), day(2024, 1, 3));
        assert_eq!(
            parse_calendar_day("2024-01-03T23:59:59Z").unwrap(),
            day(2024, 1, 3)
        );
        assert_eq!(
            parse_calendar_day("2024-01-03T00:00:01+05:30").unwrap(),
            day(2024, 1, 3)
        );
        assert_eq!(
            parse_calendar_day("2024-01-03T08:15:00.250").unwrap(),
            day(2024, 1, 3)
        );
        assert!(parse_calendar_day("03/01/2024").is_err());
    }

    #[test]
    fn status_defaults_to_present_when_absent() {
        let record: AttendanceRecord = serde_json::from_value(json!({
            "id": 1,
            "employee": "E1",
            "date": "2024-01-03"
        }))
        .unwrap();
        assert_eq!(record.status, AttendanceStatus::Present);
    }

    #[test]
    fn row_with_unknown_status_is_rejected() {
        let row = AttendanceRow {
            id: 1,
            employee: "E1".into(),
            date: day(2024, 1, 3),
            status: "Sick".into(),
        };
        assert!(AttendanceRecord::try_from(row).is_err());
    }

    #[test]
    fn required_status_is_reported_when_missing() {
        let problems =
            NewAttendance::from_value(&json!({ "employee": "E1", "date": "2024-01-03" }), None)
                .unwrap_err();
        assert_eq!(problems, vec![Problem::Missing("status")]);
    }

    #[test]
    fn collects_date_and_status_problems() {
        let problems = NewAttendance::from_value(
            &json!({ "employee": "E1", "date": "yesterday", "status": "Holiday" }),
            Some(AttendanceStatus::Present),
        )
        .unwrap_err();
        assert_eq!(
            problems,
            vec![
                Problem::NotADate("date"),
                Problem::UnknownStatus("Holiday".into())
            ]
        );
    }

    #[test]
    fn defaults_status_for_inserts() {
        let new = NewAttendance::from_value(
            &json!({ "employee": "E1", "date": "2024-01-03T10:00:00" }),
            Some(AttendanceStatus::Present),
        )
        .unwrap();
        assert_eq!(new.status, AttendanceStatus::Present);
        assert_eq!(new.date, day(2024, 1, 3));
    }
}
