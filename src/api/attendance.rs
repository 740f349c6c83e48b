use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde_json::json;

use crate::api::{AppState, parse_date};
use crate::engine::MonthPeriod;
use crate::service::attendance::{self as service, AttendanceOverride, PunchRequest};

/// Clock in
#[utoipa::path(
    post,
    path = "/api/attendance/in/{employee_id}",
    request_body = PunchRequest,
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Clocked in", body = crate::model::AttendanceRecord),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee EMP-404 not found"
        })),
        (status = 409, description = "Invalid punch code, outside geofence, already clocked in or too late", body = Object, example = json!({
            "message": "Already clocked in today"
        })),
        (status = 429, description = "Too many requests")
    ),
    tag = "Attendance"
)]
pub async fn clock_in(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PunchRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let now = Local::now().naive_local();

    let record = service::clock_in(
        state.store.as_ref(),
        state.validator.as_ref(),
        &state.rules,
        &employee_id,
        now,
        &body,
    )
    .await?;

    Ok(HttpResponse::Ok().json(record))
}

/// Clock out
#[utoipa::path(
    post,
    path = "/api/attendance/out/{employee_id}",
    request_body = PunchRequest,
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Clocked out", body = crate::model::AttendanceRecord),
        (status = 404, description = "Employee or clock-in not found"),
        (status = 409, description = "Invalid punch, already clocked out or too little work", body = Object, example = json!({
            "message": "Cannot clock out before 240 minutes of work"
        })),
        (status = 429, description = "Too many requests")
    ),
    tag = "Attendance"
)]
pub async fn clock_out(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PunchRequest>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    let now = Local::now().naive_local();

    let record = service::clock_out(
        state.store.as_ref(),
        state.validator.as_ref(),
        &state.rules,
        &employee_id,
        now,
        &body,
    )
    .await?;

    Ok(HttpResponse::Ok().json(record))
}

/// Administrative override of one employee-day
#[utoipa::path(
    post,
    path = "/api/attendance/override",
    request_body = AttendanceOverride,
    responses(
        (status = 200, description = "Record updated or created", body = crate::model::AttendanceRecord),
        (status = 400, description = "Malformed request"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn override_attendance(
    state: web::Data<AppState>,
    body: web::Json<AttendanceOverride>,
) -> actix_web::Result<impl Responder> {
    let record = service::admin_override(state.store.as_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Delete the attendance of one employee-day
#[utoipa::path(
    delete,
    path = "/api/attendance/{employee_id}/{date}",
    params(
        ("employee_id" = String, Path, description = "Employee ID"),
        ("date" = String, Path, description = "Date as YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Deleted", body = Object, example = json!({
            "message": "Attendance deleted",
            "removed": 1
        })),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "Employee or attendance not found")
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<impl Responder> {
    let (employee_id, date) = path.into_inner();
    let date = parse_date(&date)?;

    let removed = service::delete_attendance(state.store.as_ref(), &employee_id, date).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Attendance deleted",
        "removed": removed
    })))
}

/// Classification of one day
#[utoipa::path(
    get,
    path = "/api/attendance/{employee_id}/daily/{date}",
    params(
        ("employee_id" = String, Path, description = "Employee ID"),
        ("date" = String, Path, description = "Date as YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Day classification", body = crate::model::DayClassification),
        (status = 400, description = "Malformed date"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn daily_attendance(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> actix_web::Result<impl Responder> {
    let (employee_id, date) = path.into_inner();
    let date = parse_date(&date)?;

    let day = service::daily_attendance(state.store.as_ref(), &state.rules, &employee_id, date).await?;
    Ok(HttpResponse::Ok().json(day))
}

/// Attendance for a whole month
#[utoipa::path(
    get,
    path = "/api/attendance/{employee_id}/monthly/{year}/{month}",
    params(
        ("employee_id" = String, Path, description = "Employee ID"),
        ("year" = i32, Path, description = "Year", example = 2026),
        ("month" = u32, Path, description = "Month 1-12", example = 1)
    ),
    responses(
        (status = 200, description = "Per-day classifications and totals", body = crate::model::MonthlyAttendance),
        (status = 400, description = "Invalid month"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn monthly_attendance(
    state: web::Data<AppState>,
    path: web::Path<(String, i32, u32)>,
) -> actix_web::Result<impl Responder> {
    let (employee_id, year, month) = path.into_inner();
    let period = MonthPeriod::new(year, month)?;

    let month = service::monthly_attendance(state.store.as_ref(), &state.rules, &employee_id, period).await?;
    Ok(HttpResponse::Ok().json(month))
}
