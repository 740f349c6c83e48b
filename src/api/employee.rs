use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::service::employee as service;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SalaryUpdate {
    #[schema(example = "30000", value_type = String)]
    pub salary: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BonusUpdate {
    #[schema(example = "1500", value_type = String)]
    pub bonus: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ShiftUpdate {
    #[schema(example = "09:00:00", value_type = String)]
    pub start: NaiveTime,
    #[schema(example = "17:00:00", value_type = String)]
    pub end: NaiveTime,
}

/// List employees
#[utoipa::path(
    get,
    path = "/api/employee",
    responses(
        (status = 200, description = "All employees", body = [crate::model::Employee])
    ),
    tag = "Employee"
)]
pub async fn list_employees(state: web::Data<AppState>) -> actix_web::Result<impl Responder> {
    let employees = service::list_employees(state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(employees))
}

/// Get employee by ID
#[utoipa::path(
    get,
    path = "/api/employee/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = crate::model::Employee),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Employee EMP-404 not found"
        }))
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let employee = service::require_employee(state.store.as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Set monthly salary
#[utoipa::path(
    put,
    path = "/api/employee/{employee_id}/salary",
    request_body = SalaryUpdate,
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Salary updated", body = crate::model::Employee),
        (status = 400, description = "Negative salary"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn update_salary(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<SalaryUpdate>,
) -> actix_web::Result<impl Responder> {
    let employee = service::set_salary(state.store.as_ref(), &path, body.salary).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Set bonus
#[utoipa::path(
    put,
    path = "/api/employee/{employee_id}/bonus",
    request_body = BonusUpdate,
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Bonus updated", body = crate::model::Employee),
        (status = 400, description = "Negative bonus"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn update_bonus(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<BonusUpdate>,
) -> actix_web::Result<impl Responder> {
    let employee = service::set_bonus(state.store.as_ref(), &path, body.bonus).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Set default shift
#[utoipa::path(
    put,
    path = "/api/employee/{employee_id}/shift",
    request_body = ShiftUpdate,
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Shift updated", body = crate::model::Employee),
        (status = 400, description = "Shift end not after start"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn update_shift(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ShiftUpdate>,
) -> actix_web::Result<impl Responder> {
    let employee = service::set_shift(state.store.as_ref(), &path, body.start, body.end).await?;
    Ok(HttpResponse::Ok().json(employee))
}

/// Effective default shift
#[utoipa::path(
    get,
    path = "/api/employee/{employee_id}/shift",
    params(
        ("employee_id" = String, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Explicit shift, or the group default", body = crate::model::Shift),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn get_shift(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let shift = service::shift_for(state.store.as_ref(), &state.rules, &path).await?;
    Ok(HttpResponse::Ok().json(shift))
}
