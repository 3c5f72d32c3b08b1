use actix_web::{HttpResponse, web};
use sqlx::MySqlPool;
use tracing::debug;

use crate::{
    api::{fetch_failed, wall_clock_today},
    config::Config,
    db,
    error::ApiError,
    payroll::aggregate::DashboardStats,
};

/// Dashboard snapshot
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Headcount, today's attendance and payroll figures", body = DashboardStats),
        (status = 500, description = "Failed to fetch data")
    ),
    tag = "Dashboard",
    security(("bearer_auth" = []))
)]
pub async fn dashboard(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let (employees, attendance) = futures::try_join!(
        db::fetch_employees(pool.get_ref()),
        db::fetch_attendance(pool.get_ref()),
    )
    .map_err(fetch_failed("dashboard"))?;

    let reference = config.reference_day.resolve(&attendance, wall_clock_today());
    debug!(
        employees = employees.len(),
        attendance = attendance.len(),
        reference = ?reference,
        "Computing dashboard"
    );

    Ok(HttpResponse::Ok().json(DashboardStats::compute(&employees, &attendance, reference)))
}
