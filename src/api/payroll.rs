use actix_web::{HttpResponse, web};
use sqlx::MySqlPool;

use crate::{
    api::fetch_failed, db, error::ApiError, payroll::aggregate::PayrollOverview,
};

/// Payroll overview
#[utoipa::path(
    get,
    path = "/api/payroll",
    responses(
        (status = 200, description = "Net salary per employee with total, highest and lowest", body = PayrollOverview),
        (status = 500, description = "Failed to fetch data")
    ),
    tag = "Payroll",
    security(("bearer_auth" = []))
)]
pub async fn payroll_overview(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let employees = db::fetch_employees(pool.get_ref())
        .await
        .map_err(fetch_failed("payroll"))?;

    Ok(HttpResponse::Ok().json(PayrollOverview::compute(&employees)))
}
