use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::engine::MonthPeriod;
use crate::service::holiday as service;

#[derive(Debug, Deserialize, ToSchema)]
pub struct HolidayRequest {
    #[schema(example = "2026-01-26", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "Republic Day")]
    pub reason: String,
}

/// Declare a holiday for every employee
#[utoipa::path(
    post,
    path = "/api/holiday",
    request_body = HolidayRequest,
    responses(
        (status = 200, description = "Holiday recorded per employee", body = crate::service::BatchOutcome),
        (status = 400, description = "Malformed date or empty reason")
    ),
    tag = "Holiday"
)]
pub async fn mark_holiday(
    state: web::Data<AppState>,
    body: web::Json<HolidayRequest>,
) -> actix_web::Result<impl Responder> {
    let outcome = service::mark_holiday_for_all(state.store.as_ref(), body.date, &body.reason).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Correct a holiday: future dates are reverted, past dates un-flagged
#[utoipa::path(
    put,
    path = "/api/holiday/manage",
    request_body = HolidayRequest,
    responses(
        (status = 200, description = "Holiday corrected per employee", body = crate::service::BatchOutcome),
        (status = 400, description = "Malformed date or empty reason")
    ),
    tag = "Holiday"
)]
pub async fn manage_holiday(
    state: web::Data<AppState>,
    body: web::Json<HolidayRequest>,
) -> actix_web::Result<impl Responder> {
    let today = Local::now().date_naive();

    let outcome = service::manage_holiday(state.store.as_ref(), body.date, &body.reason, today).await?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Holiday dates of a month
#[utoipa::path(
    get,
    path = "/api/holiday/{year}/{month}",
    params(
        ("year" = i32, Path, description = "Year", example = 2026),
        ("month" = u32, Path, description = "Month 1-12", example = 1)
    ),
    responses(
        (status = 200, description = "Distinct holiday dates", body = [crate::service::holiday::HolidayEntry]),
        (status = 400, description = "Invalid month")
    ),
    tag = "Holiday"
)]
pub async fn holidays_for_month(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32)>,
) -> actix_web::Result<impl Responder> {
    let (year, month) = path.into_inner();
    let period = MonthPeriod::new(year, month)?;

    let holidays = service::holidays_for_month(state.store.as_ref(), period).await?;
    Ok(HttpResponse::Ok().json(holidays))
}

/// Mark every Sunday of a month as a holiday
#[utoipa::path(
    post,
    path = "/api/holiday/sundays/{year}/{month}",
    params(
        ("year" = i32, Path, description = "Year", example = 2026),
        ("month" = u32, Path, description = "Month 1-12", example = 1)
    ),
    responses(
        (status = 200, description = "Sundays recorded per employee", body = crate::service::BatchOutcome),
        (status = 400, description = "Invalid month")
    ),
    tag = "Holiday"
)]
pub async fn generate_sundays(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32)>,
) -> actix_web::Result<impl Responder> {
    let (year, month) = path.into_inner();
    let period = MonthPeriod::new(year, month)?;

    let outcome = service::generate_sunday_holidays(state.store.as_ref(), period).await?;
    Ok(HttpResponse::Ok().json(outcome))
}
