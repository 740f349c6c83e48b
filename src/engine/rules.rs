use chrono::{Duration, NaiveTime};
use rust_decimal::Decimal;

use crate::config::Config;
use crate::model::{AttendanceRecord, Employee, Shift, ShiftGroup};

/// Tunable constants of the attendance and payroll rules.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollRules {
    /// Grace period after shift start during which a late arrival is snapped
    /// back to the shift start.
    pub late_tolerance: Duration,
    /// Salary divisor; every month is treated as this many days.
    pub pay_cycle_days: u32,
    pub overtime_multiplier: Decimal,
    /// Clock-ins at or beyond shift start plus this are refused.
    pub max_late_clock_in: Duration,
    /// Clock-outs before this much elapsed work are refused.
    pub min_work_before_clock_out: Duration,
    pub primary_shift: Shift,
    pub secondary_shift: Shift,
}

impl Default for PayrollRules {
    fn default() -> Self {
        Self {
            late_tolerance: Duration::minutes(5),
            pay_cycle_days: 30,
            overtime_multiplier: Decimal::ONE,
            max_late_clock_in: Duration::hours(4),
            min_work_before_clock_out: Duration::hours(4),
            primary_shift: Shift {
                start: hm(9, 0),
                end: hm(17, 0),
            },
            secondary_shift: Shift {
                start: hm(9, 30),
                end: hm(17, 30),
            },
        }
    }
}

impl PayrollRules {
    pub fn from_config(config: &Config) -> Self {
        Self {
            late_tolerance: Duration::minutes(config.late_tolerance_minutes),
            pay_cycle_days: config.pay_cycle_days,
            overtime_multiplier: config.overtime_multiplier,
            max_late_clock_in: Duration::minutes(config.max_late_clock_in_minutes),
            min_work_before_clock_out: Duration::minutes(config.min_work_before_clock_out_minutes),
            primary_shift: config.primary_shift,
            secondary_shift: config.secondary_shift,
        }
    }

    pub fn group_shift(&self, group: ShiftGroup) -> Shift {
        match group {
            ShiftGroup::Primary => self.primary_shift,
            ShiftGroup::Secondary => self.secondary_shift,
        }
    }

    /// Employee default, falling back to the group pattern.
    pub fn employee_shift(&self, employee: &Employee) -> Shift {
        let fallback = self.group_shift(employee.group);
        Shift {
            start: employee.shift_start.unwrap_or(fallback.start),
            end: employee.shift_end.unwrap_or(fallback.end),
        }
    }

    /// Per-record override first, then the employee default, then the group.
    pub fn effective_shift(&self, employee: &Employee, record: &AttendanceRecord) -> Shift {
        let fallback = self.employee_shift(employee);
        Shift {
            start: record.shift_start.unwrap_or(fallback.start),
            end: record.shift_end.unwrap_or(fallback.end),
        }
    }

    /// Start time that counts towards worked hours, and whether the arrival is
    /// late. Early arrivals and arrivals within the tolerance window both
    /// count from the shift start; the boundary itself is still on time.
    pub fn effective_start(&self, clock_in: NaiveTime, shift: &Shift) -> (NaiveTime, bool) {
        if clock_in <= shift.start {
            return (shift.start, false);
        }

        if clock_in - shift.start <= self.late_tolerance {
            (shift.start, false)
        } else {
            (clock_in, true)
        }
    }
}

/// Signed whole minutes from `from` to `to`, in hours.
pub fn hours_between(from: NaiveTime, to: NaiveTime) -> Decimal {
    Decimal::from((to - from).num_minutes()) / Decimal::from(60)
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn tolerance_window_is_inclusive() {
        let rules = PayrollRules::default();
        let shift = rules.primary_shift;

        assert_eq!(rules.effective_start(t(8, 45), &shift), (t(9, 0), false));
        assert_eq!(rules.effective_start(t(9, 0), &shift), (t(9, 0), false));
        assert_eq!(rules.effective_start(t(9, 5), &shift), (t(9, 0), false));
        assert_eq!(rules.effective_start(t(9, 6), &shift), (t(9, 6), true));
    }

    #[test]
    fn seconds_past_the_boundary_are_late() {
        let rules = PayrollRules::default();
        let shift = rules.primary_shift;
        let in_time = NaiveTime::from_hms_opt(9, 5, 30).unwrap();

        assert_eq!(rules.effective_start(in_time, &shift), (in_time, true));
    }

    #[test]
    fn shift_resolution_order() {
        let rules = PayrollRules::default();
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let mut employee = Employee::new("E1", "Ann", dec!(30000));
        employee.group = ShiftGroup::Secondary;
        let mut record = AttendanceRecord::new("E1", date);

        assert_eq!(rules.effective_shift(&employee, &record), rules.secondary_shift);

        employee.shift_start = Some(t(8, 0));
        assert_eq!(rules.effective_shift(&employee, &record).start, t(8, 0));
        assert_eq!(rules.effective_shift(&employee, &record).end, t(17, 30));

        record.shift_start = Some(t(10, 0));
        record.shift_end = Some(t(18, 0));
        let shift = rules.effective_shift(&employee, &record);
        assert_eq!((shift.start, shift.end), (t(10, 0), t(18, 0)));
    }

    #[test]
    fn hours_between_uses_whole_minutes() {
        assert_eq!(hours_between(t(9, 0), t(17, 30)), dec!(8.5));
        assert_eq!(hours_between(t(17, 0), t(9, 0)), dec!(-8));
    }
}
