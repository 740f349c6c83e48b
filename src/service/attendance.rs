use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::engine::{MonthPeriod, PayrollRules, aggregate_month};
use crate::error::AppError;
use crate::model::{AttendanceRecord, DayClassification, MonthlyAttendance, pick_latest};
use crate::service::employee::require_employee;
use crate::service::payroll::load_month;
use crate::service::punch::{PunchDirection, PunchValidator};
use crate::service::BatchOutcome;
use crate::store::RecordStore;

pub const AUTO_ABSENT_REMARK: &str = "Auto-marked absent (no clock-in before the daily cutoff)";

/// What the punch terminal submits with every clock-in or clock-out.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PunchRequest {
    #[schema(example = "FIXEDQR123")]
    pub code: String,
    #[schema(example = 22.5726)]
    pub latitude: f64,
    #[schema(example = 88.3639)]
    pub longitude: f64,
}

/// Administrative correction of one employee-day.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceOverride {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    pub present: bool,
    pub half_day: bool,
    pub overtime_allowed: bool,

    #[schema(example = "Approved overtime")]
    pub remarks: Option<String>,

    #[schema(example = "2026-01-05T09:00:00", value_type = Option<String>)]
    pub clock_in: Option<NaiveDateTime>,

    #[schema(example = "2026-01-05T19:00:00", value_type = Option<String>)]
    pub clock_out: Option<NaiveDateTime>,
}

fn check_gate(validator: &dyn PunchValidator, punch: &PunchRequest, direction: PunchDirection) -> Result<(), AppError> {
    if !validator.is_valid_punch(&punch.code, direction) {
        return Err(AppError::invalid_state("Invalid punch code"));
    }
    if !validator.is_within_geofence(punch.latitude, punch.longitude) {
        return Err(AppError::invalid_state(format!(
            "Not within company location to clock {}",
            direction
        )));
    }
    Ok(())
}

/// Whole elapsed minutes as hours, at storage precision.
fn elapsed_hours(from: NaiveDateTime, to: NaiveDateTime) -> Decimal {
    (Decimal::from((to - from).num_minutes()) / Decimal::from(60)).round_dp(2)
}

#[instrument(skip(store, validator, rules, punch))]
pub async fn clock_in(
    store: &dyn RecordStore,
    validator: &dyn PunchValidator,
    rules: &PayrollRules,
    employee_id: &str,
    at: NaiveDateTime,
    punch: &PunchRequest,
) -> Result<AttendanceRecord, AppError> {
    let employee = require_employee(store, employee_id).await?;
    check_gate(validator, punch, PunchDirection::In)?;

    let date = at.date();
    let existing = store.find_by_employee_and_date(employee_id, date).await?;
    if existing.iter().any(|r| r.clock_in.is_some()) {
        return Err(AppError::invalid_state("Already clocked in today"));
    }

    let shift = rules.employee_shift(&employee);
    if at.time() - shift.start >= rules.max_late_clock_in {
        return Err(AppError::invalid_state(format!(
            "Cannot clock in {} minutes or more after shift start",
            rules.max_late_clock_in.num_minutes()
        )));
    }

    // A record left by an administrator or the absence job is taken over.
    let mut record = pick_latest(&existing)
        .cloned()
        .unwrap_or_else(|| AttendanceRecord::new(employee_id, date));

    if record.remarks.as_deref() == Some(AUTO_ABSENT_REMARK) {
        record.remarks = None;
    }

    let (_, late) = rules.effective_start(at.time(), &shift);
    record.clock_in = Some(at);
    record.latitude = Some(punch.latitude);
    record.longitude = Some(punch.longitude);
    record.shift_start = Some(shift.start);
    record.shift_end = Some(shift.end);
    record.late = late;
    record.half_day = false;
    record.present = true;
    record.overtime_allowed = false;

    let saved = store.save(record).await?;
    info!(employee_id = %employee_id, clock_in = %at, late, "Clocked in");
    Ok(saved)
}

#[instrument(skip(store, validator, rules, punch))]
pub async fn clock_out(
    store: &dyn RecordStore,
    validator: &dyn PunchValidator,
    rules: &PayrollRules,
    employee_id: &str,
    at: NaiveDateTime,
    punch: &PunchRequest,
) -> Result<AttendanceRecord, AppError> {
    require_employee(store, employee_id).await?;
    check_gate(validator, punch, PunchDirection::Out)?;

    let existing = store.find_by_employee_and_date(employee_id, at.date()).await?;
    let Some(mut record) = pick_latest(&existing).filter(|r| r.clock_in.is_some()).cloned() else {
        return Err(AppError::not_found("No clock-in found for today, clock in first"));
    };
    let Some(clock_in) = record.clock_in else {
        return Err(AppError::not_found("No clock-in found for today, clock in first"));
    };

    if record.clock_out.is_some() {
        return Err(AppError::invalid_state("Already clocked out today"));
    }
    if at - clock_in < rules.min_work_before_clock_out {
        return Err(AppError::invalid_state(format!(
            "Cannot clock out before {} minutes of work",
            rules.min_work_before_clock_out.num_minutes()
        )));
    }

    record.clock_out = Some(at);
    record.latitude = Some(punch.latitude);
    record.longitude = Some(punch.longitude);
    record.worked_hours = Some(elapsed_hours(clock_in, at));

    let saved = store.save(record).await?;
    info!(employee_id = %employee_id, clock_out = %at, "Clocked out");
    Ok(saved)
}

/// Fetch-or-create the employee-day and apply the administrator's flags.
///
/// Clock times are replaced only when given. Not-present clears the
/// half-day flag and zeroes the worked hours.
#[instrument(skip(store, request), fields(employee_id = %request.employee_id, date = %request.date))]
pub async fn admin_override(store: &dyn RecordStore, request: AttendanceOverride) -> Result<AttendanceRecord, AppError> {
    require_employee(store, &request.employee_id).await?;

    let existing = store
        .find_by_employee_and_date(&request.employee_id, request.date)
        .await?;
    let mut record = pick_latest(&existing)
        .cloned()
        .unwrap_or_else(|| AttendanceRecord::new(request.employee_id.clone(), request.date));

    record.overtime_allowed = request.overtime_allowed;
    record.present = request.present;
    record.half_day = request.half_day;
    record.remarks = request.remarks;

    if request.clock_in.is_some() {
        record.clock_in = request.clock_in;
    }
    if request.clock_out.is_some() {
        record.clock_out = request.clock_out;
    }

    if let (Some(clock_in), Some(clock_out)) = (record.clock_in, record.clock_out) {
        record.worked_hours = Some(elapsed_hours(clock_in, clock_out).max(Decimal::ZERO));
    }

    if !record.present {
        record.half_day = false;
        record.worked_hours = Some(Decimal::ZERO);
    }

    let saved = store.save(record).await?;
    info!(present = saved.present, half_day = saved.half_day, "Attendance overridden");
    Ok(saved)
}

/// Removes every record of the employee-day; returns how many were removed.
#[instrument(skip(store))]
pub async fn delete_attendance(store: &dyn RecordStore, employee_id: &str, date: NaiveDate) -> Result<usize, AppError> {
    require_employee(store, employee_id).await?;

    let records = store.find_by_employee_and_date(employee_id, date).await?;
    if records.is_empty() {
        return Err(AppError::not_found(format!(
            "No attendance for {} on {}",
            employee_id, date
        )));
    }

    for record in &records {
        store.delete(record).await?;
    }

    info!(employee_id = %employee_id, date = %date, removed = records.len(), "Attendance deleted");
    Ok(records.len())
}

pub async fn monthly_attendance(
    store: &dyn RecordStore,
    rules: &PayrollRules,
    employee_id: &str,
    period: MonthPeriod,
) -> Result<MonthlyAttendance, AppError> {
    let employee = require_employee(store, employee_id).await?;
    let (records, holidays) = load_month(store, employee_id, period).await?;

    Ok(aggregate_month(&employee, period, &records, &holidays, rules))
}

/// One day as classified inside its month, so the grace absence is
/// attributed exactly as the monthly view attributes it.
pub async fn daily_attendance(
    store: &dyn RecordStore,
    rules: &PayrollRules,
    employee_id: &str,
    date: NaiveDate,
) -> Result<DayClassification, AppError> {
    let period = MonthPeriod::containing(date)?;
    let month = monthly_attendance(store, rules, employee_id, period).await?;

    month
        .days
        .into_iter()
        .find(|day| day.date == date)
        .ok_or_else(|| AppError::not_found(format!("No classification for {}", date)))
}

/// Gives every employee without a record for `today` an explicit absence.
#[instrument(skip(store))]
pub async fn mark_absent_for_missed_in(store: &dyn RecordStore, today: NaiveDate) -> Result<BatchOutcome, AppError> {
    let employees = store.all_employees().await?;
    let mut outcome = BatchOutcome::default();

    for employee in &employees {
        match mark_absent(store, &employee.employee_id, today).await {
            Ok(()) => outcome.record_success(),
            Err(e) => outcome.record_failure(&employee.employee_id, &e),
        }
    }

    info!(
        date = %today,
        processed = outcome.processed,
        failed = outcome.failed.len(),
        "Absence cutoff applied"
    );
    Ok(outcome)
}

async fn mark_absent(store: &dyn RecordStore, employee_id: &str, date: NaiveDate) -> Result<(), AppError> {
    if store.exists_for_employee_and_date(employee_id, date).await? {
        return Ok(());
    }

    let mut record = AttendanceRecord::new(employee_id, date);
    record.remarks = Some(AUTO_ABSENT_REMARK.to_string());
    store.save(record).await?;

    debug!(employee_id = %employee_id, date = %date, "Marked absent");
    Ok(())
}
