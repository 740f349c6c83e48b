use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};
use utoipa::ToSchema;

/// Classification of one employee-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    #[strum(serialize = "Present")]
    Present,
    #[strum(serialize = "Present (Manual)")]
    PresentManual,
    #[strum(serialize = "Half-day")]
    HalfDay,
    #[strum(serialize = "Absent")]
    Absent,
    #[strum(serialize = "Holiday")]
    Holiday,
    #[strum(serialize = "Paid Leave (Auto)")]
    PaidLeaveAuto,
    #[strum(serialize = "No Clock-Out")]
    NoClockOut,
}

impl DayStatus {
    /// Contribution of the day to the paid-day-equivalent used by the
    /// 31-day correction.
    pub fn paid_day_weight(self) -> Decimal {
        match self {
            DayStatus::Present | DayStatus::PresentManual | DayStatus::Holiday | DayStatus::PaidLeaveAuto => {
                Decimal::ONE
            }
            DayStatus::HalfDay => Decimal::new(5, 1),
            DayStatus::Absent | DayStatus::NoClockOut => Decimal::ZERO,
        }
    }
}

/// Result of classifying one date for one employee, priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DayClassification {
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    pub status: DayStatus,

    #[schema(value_type = Option<String>)]
    pub clock_in: Option<NaiveDateTime>,

    #[schema(value_type = Option<String>)]
    pub clock_out: Option<NaiveDateTime>,

    pub remarks: Option<String>,

    pub late: bool,
    pub half_day: bool,
    pub overtime_allowed: bool,

    #[schema(example = "8", value_type = String)]
    pub worked_hours: Decimal,

    #[schema(example = "0.5", value_type = String)]
    pub overtime_hours: Decimal,

    /// Pay for the day excluding overtime.
    #[schema(example = "1000", value_type = String)]
    pub base_pay: Decimal,

    #[schema(example = "62.5", value_type = String)]
    pub overtime_pay: Decimal,

    /// `base_pay + overtime_pay`.
    #[schema(example = "1062.5", value_type = String)]
    pub salary: Decimal,

    /// Whether the month's grace absence has been consumed once this day is
    /// accounted for.
    #[serde(skip)]
    pub paid_leave_used: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceCounts {
    /// Includes No-Clock-Out days.
    pub present: u32,
    pub half_day: u32,
    pub absent: u32,
    pub holiday: u32,
    pub paid_leave: u32,
    pub no_clock_out: u32,
}

impl AttendanceCounts {
    pub fn record(&mut self, status: DayStatus) {
        match status {
            DayStatus::Present | DayStatus::PresentManual => self.present += 1,
            DayStatus::NoClockOut => {
                self.present += 1;
                self.no_clock_out += 1;
            }
            DayStatus::HalfDay => self.half_day += 1,
            DayStatus::Absent => self.absent += 1,
            DayStatus::Holiday => self.holiday += 1,
            DayStatus::PaidLeaveAuto => self.paid_leave += 1,
        }
    }
}

/// A month of daily classifications with running totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyAttendance {
    pub days: Vec<DayClassification>,
    pub counts: AttendanceCounts,

    #[schema(value_type = String)]
    pub total_hours_worked: Decimal,

    #[schema(value_type = String)]
    pub total_overtime_hours: Decimal,

    /// Calendar days minus holidays.
    pub working_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalarySummary {
    #[schema(example = "1000", value_type = String)]
    pub daily_rate: Decimal,

    #[schema(value_type = String)]
    pub paid_day_equivalent: Decimal,

    /// Sum of per-day base pay.
    #[schema(value_type = String)]
    pub base_pay: Decimal,

    #[schema(value_type = String)]
    pub overtime_pay: Decimal,

    #[schema(value_type = String)]
    pub bonus: Decimal,

    /// One daily rate when the 31-day correction applies, zero otherwise.
    #[schema(value_type = String)]
    pub month_length_deduction: Decimal,

    #[schema(example = "31062.5", value_type = String)]
    pub total_salary: Decimal,
}

/// Derived per employee per month; recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyReport {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub employee_name: String,

    #[schema(example = 2026)]
    pub year: i32,

    #[schema(example = 1)]
    pub month: u32,

    pub attendance: MonthlyAttendance,
    pub salary: SalarySummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeSalary {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub employee_name: String,

    #[schema(example = "30000", value_type = String)]
    pub salary: Decimal,
}

impl From<&MonthlyReport> for EmployeeSalary {
    fn from(report: &MonthlyReport) -> Self {
        Self {
            employee_id: report.employee_id.clone(),
            employee_name: report.employee_name.clone(),
            salary: report.salary.total_salary,
        }
    }
}
