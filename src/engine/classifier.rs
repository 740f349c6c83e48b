use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::engine::payroll::PayRates;
use crate::engine::rules::{PayrollRules, hours_between};
use crate::model::{AttendanceRecord, DayClassification, DayStatus, Employee, pick_latest};

/// Everything about an employee-month that stays fixed while its days are
/// classified.
#[derive(Debug, Clone)]
pub struct DayContext<'a> {
    pub employee: &'a Employee,
    pub rules: &'a PayrollRules,
    pub rates: PayRates,
}

impl<'a> DayContext<'a> {
    pub fn new(employee: &'a Employee, rules: &'a PayrollRules) -> Self {
        Self {
            employee,
            rules,
            rates: PayRates::new(employee.salary, rules),
        }
    }
}

/// Classifies and prices one date.
///
/// `records` are the employee's records for `date` (several are resolved to
/// the latest clock-in); `paid_leave_used` is the month's grace-absence flag
/// before this date, and the returned classification carries its value after.
pub fn classify(
    ctx: &DayContext<'_>,
    date: NaiveDate,
    records: &[AttendanceRecord],
    is_holiday: bool,
    paid_leave_used: bool,
) -> DayClassification {
    let Some(record) = pick_latest(records) else {
        if is_holiday {
            return paid_day(ctx, date, DayStatus::Holiday, paid_leave_used);
        }
        return unexplained_absence(ctx, date, paid_leave_used);
    };

    let mut day = if record.holiday {
        paid_day(ctx, date, DayStatus::Holiday, paid_leave_used)
    } else if !record.present {
        unexplained_absence(ctx, date, paid_leave_used)
    } else {
        match (record.clock_in, record.clock_out) {
            (None, None) => paid_day(ctx, date, DayStatus::PresentManual, paid_leave_used),
            (Some(_), None) => blank(date, DayStatus::NoClockOut, paid_leave_used),
            // An out-punch without an in-punch is only reachable through
            // direct edits; nothing to measure from.
            (None, Some(_)) => blank(date, DayStatus::NoClockOut, paid_leave_used),
            (Some(_), Some(_)) => punched_day(ctx, date, record, paid_leave_used),
        }
    };

    day.clock_in = record.clock_in;
    day.clock_out = record.clock_out;
    day.remarks = record.remarks.clone();
    day.overtime_allowed = record.overtime_allowed;
    day
}

/// First unexplained absence of the month is paid once, later ones are not.
fn unexplained_absence(ctx: &DayContext<'_>, date: NaiveDate, paid_leave_used: bool) -> DayClassification {
    if paid_leave_used {
        blank(date, DayStatus::Absent, true)
    } else {
        paid_day(ctx, date, DayStatus::PaidLeaveAuto, true)
    }
}

fn punched_day(
    ctx: &DayContext<'_>,
    date: NaiveDate,
    record: &AttendanceRecord,
    paid_leave_used: bool,
) -> DayClassification {
    let (Some(clock_in), Some(clock_out)) = (record.clock_in, record.clock_out) else {
        return blank(date, DayStatus::NoClockOut, paid_leave_used);
    };

    let shift = ctx.rules.effective_shift(ctx.employee, record);
    let actual_out = clock_out.time();
    let (effective_start, late) = ctx.rules.effective_start(clock_in.time(), &shift);
    let worked_hours = hours_between(effective_start, actual_out).max(Decimal::ZERO);

    let mut day = blank(date, DayStatus::Present, paid_leave_used);
    day.late = late;
    day.worked_hours = worked_hours;

    if record.half_day {
        day.status = DayStatus::HalfDay;
        day.half_day = true;
        day.base_pay = ctx.rates.half_day_pay(worked_hours, &shift);
    } else if record.overtime_allowed && actual_out > shift.end {
        let overtime_hours = hours_between(shift.end, actual_out);
        day.overtime_hours = overtime_hours;
        day.base_pay = ctx.rates.daily();
        day.overtime_pay = ctx.rates.overtime_pay(overtime_hours, &shift);
    } else {
        day.base_pay = ctx.rates.full_day_pay(worked_hours, &shift);
    }

    day.salary = day.base_pay + day.overtime_pay;
    day
}

fn paid_day(ctx: &DayContext<'_>, date: NaiveDate, status: DayStatus, paid_leave_used: bool) -> DayClassification {
    let mut day = blank(date, status, paid_leave_used);
    day.base_pay = ctx.rates.daily();
    day.salary = day.base_pay;
    day
}

fn blank(date: NaiveDate, status: DayStatus, paid_leave_used: bool) -> DayClassification {
    DayClassification {
        date,
        status,
        clock_in: None,
        clock_out: None,
        remarks: None,
        late: false,
        half_day: false,
        overtime_allowed: false,
        worked_hours: Decimal::ZERO,
        overtime_hours: Decimal::ZERO,
        base_pay: Decimal::ZERO,
        overtime_pay: Decimal::ZERO,
        salary: Decimal::ZERO,
        paid_leave_used,
    }
}
