use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::{fetch_failed, wall_clock_today, write_failed},
    auth::auth::AuthUser,
    config::Config,
    db,
    error::ApiError,
    model::attendance::{AttendanceRecord, AttendanceStatus, NewAttendance, parse_calendar_day},
    payroll::{
        aggregate::{DailyCounts, daily_counts},
        calendar::{on_day, sorted_newest_first},
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DayQuery {
    /// Calendar day (`YYYY-MM-DD` or a timestamp); defaults to the dashboard reference day
    pub date: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DayAttendanceResponse {
    #[schema(example = "2024-01-03", value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    pub counts: DailyCounts,
    /// Records on the day, all statuses.
    #[schema(example = 2)]
    pub total: usize,
    pub records: Vec<AttendanceRecord>,
}

impl DayAttendanceResponse {
    pub fn for_day(all: &[AttendanceRecord], date: Option<NaiveDate>) -> Self {
        let (counts, records) = match date {
            Some(day) => (daily_counts(all, &day), on_day(all, &day)),
            None => (DailyCounts::default(), Vec::new()),
        };

        Self {
            date,
            total: counts.total(),
            counts,
            records,
        }
    }
}

/// List attendance, newest first
#[utoipa::path(
    get,
    path = "/api/attendance",
    responses(
        (status = 200, description = "All records sorted by date descending", body = [AttendanceRecord]),
        (status = 500, description = "Failed to fetch data")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn list_attendance(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let records = db::fetch_attendance(pool.get_ref())
        .await
        .map_err(fetch_failed("attendance"))?;

    Ok(HttpResponse::Ok().json(sorted_newest_first(&records)))
}

/// Record attendance
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body(content = Object, description = "status defaults to Present", example = json!({
        "employee": "asha.rao@company.com",
        "date": "2024-01-03",
        "status": "Present"
    })),
    responses(
        (status = 201, description = "Attendance recorded", body = AttendanceRecord),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "HR/Admin only")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn create_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    let new = NewAttendance::from_value(&payload, Some(AttendanceStatus::default()))
        .map_err(|problems| ApiError::from_problems(&problems))?;

    let record = db::insert_attendance(pool.get_ref(), new)
        .await
        .map_err(write_failed("attendance"))?;

    info!(attendance_id = record.id, date = %record.date, status = %record.status, "Attendance recorded");
    Ok(HttpResponse::Created().json(record))
}

/// Attendance on one calendar day
#[utoipa::path(
    get,
    path = "/api/attendance/day",
    params(DayQuery),
    responses(
        (status = 200, description = "Records and per-status counts for the day", body = DayAttendanceResponse),
        (status = 400, description = "Unparseable date")
    ),
    tag = "Attendance",
    security(("bearer_auth" = []))
)]
pub async fn attendance_on_day(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<DayQuery>,
) -> Result<HttpResponse, ApiError> {
    let requested = query
        .date
        .as_deref()
        .map(parse_calendar_day)
        .transpose()
        .map_err(|e| ApiError::BadRequest(format!("invalid date: {e}")))?;

    let records = db::fetch_attendance(pool.get_ref())
        .await
        .map_err(fetch_failed("attendance"))?;

    let date = requested.or_else(|| config.reference_day.resolve(&records, wall_clock_today()));

    Ok(HttpResponse::Ok().json(DayAttendanceResponse::for_day(&records, date)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: u64, date: &str, status: &str) -> AttendanceRecord {
        serde_json::from_value(json!({
            "id": id,
            "employee": format!("E{id}"),
            "date": date,
            "status": status
        }))
        .unwrap()
    }

    #[test]
    fn day_view_counts_and_totals_one_day() {
        let all = vec![
            record(1, "2024-01-03", "Present"),
            record(2, "2024-01-02", "Present"),
            record(3, "2024-01-03T17:30:00Z", "Leave"),
        ];
        let day = NaiveDate::from_ymd_opt(2024, 1, 3);

        let view = DayAttendanceResponse::for_day(&all, day);
        assert_eq!(view.total, 2);
        assert_eq!(view.counts.present, 1);
        assert_eq!(view.counts.leave, 1);
        let ids: Vec<_> = view.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn day_view_without_a_day_is_empty() {
        let view = DayAttendanceResponse::for_day(&[record(1, "2024-01-03", "Absent")], None);
        assert_eq!(view.total, 0);
        assert!(view.records.is_empty());
        assert_eq!(serde_json::to_value(&view).unwrap()["date"], json!(null));
    }
}
