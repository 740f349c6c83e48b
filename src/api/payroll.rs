use actix_web::{HttpResponse, Responder, web};

use crate::api::AppState;
use crate::engine::MonthPeriod;
use crate::service::payroll as service;

/// Salaries of all employees for a month
#[utoipa::path(
    get,
    path = "/api/payroll/{year}/{month}",
    params(
        ("year" = i32, Path, description = "Year", example = 2026),
        ("month" = u32, Path, description = "Month 1-12", example = 1)
    ),
    responses(
        (status = 200, description = "One salary per employee; failures listed separately", body = crate::service::payroll::PayrollRun),
        (status = 400, description = "Invalid month")
    ),
    tag = "Payroll"
)]
pub async fn salaries_for_all(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32)>,
) -> actix_web::Result<impl Responder> {
    let (year, month) = path.into_inner();
    let period = MonthPeriod::new(year, month)?;

    let run = service::salaries_for_all(state.store.as_ref(), &state.rules, period).await?;
    Ok(HttpResponse::Ok().json(run))
}

/// Attendance and salary breakdown of one employee-month
#[utoipa::path(
    get,
    path = "/api/payroll/{employee_id}/{year}/{month}",
    params(
        ("employee_id" = String, Path, description = "Employee ID"),
        ("year" = i32, Path, description = "Year", example = 2026),
        ("month" = u32, Path, description = "Month 1-12", example = 1)
    ),
    responses(
        (status = 200, description = "Monthly report", body = crate::model::MonthlyReport),
        (status = 400, description = "Invalid month"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee EMP-404 not found"
        }))
    ),
    tag = "Payroll"
)]
pub async fn monthly_report(
    state: web::Data<AppState>,
    path: web::Path<(String, i32, u32)>,
) -> actix_web::Result<impl Responder> {
    let (employee_id, year, month) = path.into_inner();
    let period = MonthPeriod::new(year, month)?;

    let report = service::monthly_report(state.store.as_ref(), &state.rules, &employee_id, period).await?;
    Ok(HttpResponse::Ok().json(report))
}
