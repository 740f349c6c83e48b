use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::engine::aggregator::aggregate_month;
use crate::engine::period::MonthPeriod;
use crate::engine::rules::PayrollRules;
use crate::model::{AttendanceRecord, Employee, MonthlyAttendance, MonthlyReport, SalarySummary, Shift};

/// Salary rates of one employee under the flat pay-cycle normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayRates {
    daily: Decimal,
    overtime_multiplier: Decimal,
}

impl PayRates {
    pub fn new(monthly_salary: Decimal, rules: &PayrollRules) -> Self {
        Self {
            daily: monthly_salary / Decimal::from(rules.pay_cycle_days.max(1)),
            overtime_multiplier: rules.overtime_multiplier,
        }
    }

    /// `monthly salary / pay cycle days`, whatever the month's real length.
    pub fn daily(&self) -> Decimal {
        self.daily
    }

    pub fn hourly(&self, shift: &Shift) -> Decimal {
        let hours = shift.hours();
        if hours <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.daily / hours
    }

    pub fn half_day_pay(&self, worked_hours: Decimal, shift: &Shift) -> Decimal {
        let payable = worked_hours.min(shift.hours() / Decimal::TWO);
        payable * self.hourly(shift)
    }

    /// Normal attendance never exceeds one day's salary.
    pub fn full_day_pay(&self, worked_hours: Decimal, shift: &Shift) -> Decimal {
        let payable = worked_hours.min(shift.hours());
        (payable * self.hourly(shift)).min(self.daily)
    }

    pub fn overtime_pay(&self, overtime_hours: Decimal, shift: &Shift) -> Decimal {
        overtime_hours * self.hourly(shift) * self.overtime_multiplier
    }
}

/// Attendance plus salary for one employee-month.
pub fn compute_payroll(
    employee: &Employee,
    period: MonthPeriod,
    records: &[AttendanceRecord],
    holidays: &HashSet<NaiveDate>,
    rules: &PayrollRules,
) -> MonthlyReport {
    let mut attendance = aggregate_month(employee, period, records, holidays, rules);
    let salary = settle(employee, period, &mut attendance, rules);

    MonthlyReport {
        employee_id: employee.employee_id.clone(),
        employee_name: employee.full_name.clone(),
        year: period.year(),
        month: period.month(),
        attendance,
        salary,
    }
}

/// Totals the priced days and applies the 31-day correction.
///
/// With a flat 30-day divisor a 31-day month would pay for an implicit 31st
/// day; when the paid-day-equivalent exceeds the pay cycle one daily rate is
/// taken back and, if any holiday was counted, one holiday is discounted.
/// The amount taken back is capped at the month's earnings.
pub fn settle(
    employee: &Employee,
    period: MonthPeriod,
    attendance: &mut MonthlyAttendance,
    rules: &PayrollRules,
) -> SalarySummary {
    let rates = PayRates::new(employee.salary, rules);

    let base_pay: Decimal = attendance.days.iter().map(|d| d.base_pay).sum();
    let overtime_pay: Decimal = attendance.days.iter().map(|d| d.overtime_pay).sum();
    let paid_day_equivalent: Decimal = attendance.days.iter().map(|d| d.status.paid_day_weight()).sum();

    let cycle = Decimal::from(rules.pay_cycle_days);
    let month_length_deduction = if period.days_in_month() == 31 && paid_day_equivalent > cycle {
        if attendance.counts.holiday > 0 {
            attendance.counts.holiday -= 1;
        }
        // never takes back more than was earned
        let earned = (base_pay + overtime_pay + employee.bonus).max(Decimal::ZERO);
        rates.daily().min(earned)
    } else {
        Decimal::ZERO
    };

    let total_salary = base_pay + employee.bonus + overtime_pay - month_length_deduction;

    SalarySummary {
        daily_rate: rates.daily(),
        paid_day_equivalent,
        base_pay,
        overtime_pay,
        bonus: employee.bonus,
        month_length_deduction,
        total_salary,
    }
}
