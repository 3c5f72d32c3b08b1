use actix_web::{
    HttpResponse,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web,
};
use serde::Deserialize;
use serde_json::Value;
use sqlx::MySqlPool;
use tracing::{debug, info};
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::{fetch_failed, write_failed},
    auth::auth::AuthUser,
    config::Config,
    db,
    error::ApiError,
    model::employee::{Employee, NewEmployee},
    payroll::slip::SalarySlip,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SlipFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SlipQuery {
    /// `json` (default) or `text`
    pub format: Option<SlipFormat>,
}

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees in insertion order", body = [Employee]),
        (status = 500, description = "Failed to fetch data")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn list_employees(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let employees = db::fetch_employees(pool.get_ref())
        .await
        .map_err(fetch_failed("employees"))?;

    debug!(count = employees.len(), "Fetched employees");
    Ok(HttpResponse::Ok().json(employees))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body(content = Object, description = "name, email, designation and basicSalary are required", example = json!({
        "name": "Asha Rao",
        "email": "asha.rao@company.com",
        "designation": "Accountant",
        "basicSalary": 42000,
        "allowances": 5000,
        "deductions": 1500
    })),
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 400, description = "Validation failure", body = Object, example = json!({
            "message": "Missing required fields",
            "missing": ["designation", "basicSalary"]
        })),
        (status = 403, description = "HR/Admin only"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    auth.require_hr_or_admin()?;

    let new = NewEmployee::from_value(&payload)
        .map_err(|problems| ApiError::from_problems(&problems))?;

    let employee = db::insert_employee(pool.get_ref(), new)
        .await
        .map_err(write_failed("employee"))?;

    info!(employee_id = employee.id, created_by = %auth.email, "Employee created");
    Ok(HttpResponse::Created().json(employee))
}

async fn load_employee(pool: &MySqlPool, employee_id: u64) -> Result<Employee, ApiError> {
    db::find_employee(pool, employee_id)
        .await
        .map_err(fetch_failed("employee"))?
        .ok_or(ApiError::NotFound("Employee"))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(("employee_id", Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee not found"
        }))
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn get_employee(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let employee = load_employee(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Plain-text slip as a file attachment.
fn slip_download(slip: &SalarySlip, currency: &str) -> HttpResponse {
    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(format!("{}.txt", slip.file_name))],
    };

    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header(disposition)
        .body(slip.render_text(currency))
}

/// Salary slip for one employee
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}/slip",
    params(("employee_id", Path, description = "Employee ID"), SlipQuery),
    responses(
        (status = 200, description = "Salary slip fields, or a text attachment with format=text", body = SalarySlip),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee",
    security(("bearer_auth" = []))
)]
pub async fn employee_slip(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    query: web::Query<SlipQuery>,
) -> Result<HttpResponse, ApiError> {
    let employee = load_employee(pool.get_ref(), path.into_inner()).await?;
    let slip = SalarySlip::for_employee(&employee);

    match query.format.unwrap_or_default() {
        SlipFormat::Json => Ok(HttpResponse::Ok().json(slip)),
        SlipFormat::Text => Ok(slip_download(&slip, &config.currency_symbol)),
    }
}
