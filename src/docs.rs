use crate::api::attendance::DayAttendanceResponse;
use crate::api::employee::SlipFormat;
use crate::auth::handlers::{LoginResponse, LoginUser};
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::employee::Employee;
use crate::model::user::LoginRequest;
use crate::payroll::aggregate::{
    DailyCounts, DashboardStats, PayrollOverview, PayrollRow, PayrollSummary,
};
use crate::payroll::slip::{SalarySlip, SlipField};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR + Payroll API",
        version = "1.0.0",
        description = r#"
## HR + Payroll Portal

Backend for a small HR/payroll dashboard.

### 🔹 Key Features
- **Employees**: list, add and look up employee salary records
- **Attendance**: daily Present / Absent / Leave records, newest first
- **Dashboard**: headcount, today's attendance split and payroll snapshot
- **Salary slips**: printable field list per employee (JSON or text)

### 🔐 Security
All `/api` endpoints require a **JWT Bearer** token from `/auth/login`.
Only **Admin** or **HR** users may add records.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::login,

        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::employee_slip,

        crate::api::attendance::list_attendance,
        crate::api::attendance::create_attendance,
        crate::api::attendance::attendance_on_day,

        crate::api::dashboard::dashboard,
        crate::api::payroll::payroll_overview
    ),
    components(
        schemas(
            LoginRequest,
            LoginResponse,
            LoginUser,
            Employee,
            AttendanceRecord,
            AttendanceStatus,
            DayAttendanceResponse,
            DailyCounts,
            DashboardStats,
            PayrollSummary,
            PayrollRow,
            PayrollOverview,
            SalarySlip,
            SlipField,
            SlipFormat
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login"),
        (name = "Employee", description = "Employee records and salary slips"),
        (name = "Attendance", description = "Attendance records"),
        (name = "Dashboard", description = "Aggregated dashboard figures"),
        (name = "Payroll", description = "Payroll overview"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
