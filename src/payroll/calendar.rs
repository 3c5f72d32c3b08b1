use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

use crate::model::attendance::AttendanceRecord;

/// Anything that falls on a calendar day.
pub trait CalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

/// Uses the day as seen in the timestamp's own zone.
impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl CalendarDay for AttendanceRecord {
    fn calendar_day(&self) -> NaiveDate {
        self.date
    }
}

/// Same year, month and day; time of day is ignored.
pub fn is_same_day(a: &impl CalendarDay, b: &impl CalendarDay) -> bool {
    a.calendar_day() == b.calendar_day()
}

/// Records falling on the same calendar day as `reference`, in input order.
pub fn on_day(records: &[AttendanceRecord], reference: &impl CalendarDay) -> Vec<AttendanceRecord> {
    records
        .iter()
        .filter(|r| is_same_day(*r, reference))
        .cloned()
        .collect()
}

/// Newest first. Records sharing a date keep their relative input order.
pub fn sorted_newest_first(records: &[AttendanceRecord]) -> Vec<AttendanceRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;
    use chrono::{FixedOffset, NaiveTime, Utc};
    use serde_json::json;

    fn record(id: u64, date: &str) -> AttendanceRecord {
        serde_json::from_value(json!({ "id": id, "employee": format!("E{id}"), "date": date }))
            .unwrap()
    }

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_time(NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap())
    }

    #[test]
    fn timestamps_on_the_same_day_are_equal() {
        assert!(is_same_day(
            &at("2024-01-03", "00:00:00"),
            &at("2024-01-03", "23:59:59")
        ));
        assert!(!is_same_day(
            &at("2024-01-03", "23:59:59"),
            &at("2024-01-04", "00:00:00")
        ));

        let utc = Utc.with_ymd_and_hms(2024, 1, 3, 18, 0, 0).unwrap();
        assert!(is_same_day(&utc, &at("2024-01-03", "06:00:00")));

        let ist = FixedOffset::east_opt(5 * 3600 + 1800)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 4, 1, 0, 0)
            .unwrap();
        assert!(!is_same_day(&ist, &utc));
    }

    #[test]
    fn same_day_filter_ignores_time_of_day() {
        let records = vec![
            record(1, "2024-01-03T08:00:00"),
            record(2, "2024-01-03T22:30:00Z"),
            record(3, "2024-01-04T00:00:01"),
            record(4, "2024-01-02"),
        ];

        let today = on_day(&records, &at("2024-01-03", "12:00:00"));
        let ids: Vec<_> = today.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn same_day_filter_on_empty_input_is_empty() {
        let reference = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert!(on_day(&[], &reference).is_empty());
    }

    #[test]
    fn newest_first_sort_is_stable() {
        let mut records = vec![
            record(1, "2024-01-02"),
            record(2, "2024-01-03"),
            record(3, "2024-01-02"),
            record(4, "2024-01-03"),
            record(5, "2024-01-01"),
        ];
        records[0].status = AttendanceStatus::Absent;

        let sorted = sorted_newest_first(&records);
        let ids: Vec<_> = sorted.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3, 5]);
        assert_eq!(sorted[2].status, AttendanceStatus::Absent);

        // input untouched
        assert_eq!(records[0].id, 1);
    }
}
