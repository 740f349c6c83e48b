use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::engine::classifier::{DayContext, classify};
use crate::engine::period::MonthPeriod;
use crate::engine::rules::PayrollRules;
use crate::model::{AttendanceCounts, AttendanceRecord, Employee, MonthlyAttendance};

/// Walks every date of `period` in order, classifying each against the
/// employee's records and the month's holiday dates.
///
/// Records outside the period are ignored. The grace-absence flag is carried
/// from one day to the next so only the first unexplained absence is paid.
pub fn aggregate_month(
    employee: &Employee,
    period: MonthPeriod,
    records: &[AttendanceRecord],
    holidays: &HashSet<NaiveDate>,
    rules: &PayrollRules,
) -> MonthlyAttendance {
    let mut by_date: BTreeMap<NaiveDate, Vec<AttendanceRecord>> = BTreeMap::new();
    for record in records.iter().filter(|r| period.contains(r.date)) {
        by_date.entry(record.date).or_default().push(record.clone());
    }

    let ctx = DayContext::new(employee, rules);
    let mut days = Vec::with_capacity(period.days_in_month() as usize);
    let mut counts = AttendanceCounts::default();
    let mut total_hours_worked = Decimal::ZERO;
    let mut total_overtime_hours = Decimal::ZERO;
    let mut paid_leave_used = false;

    for date in period.days() {
        let day_records = by_date.get(&date).map(Vec::as_slice).unwrap_or(&[]);
        let day = classify(&ctx, date, day_records, holidays.contains(&date), paid_leave_used);

        paid_leave_used = day.paid_leave_used;
        counts.record(day.status);
        total_hours_worked += day.worked_hours;
        total_overtime_hours += day.overtime_hours;
        days.push(day);
    }

    let working_days = period.days_in_month().saturating_sub(counts.holiday);

    MonthlyAttendance {
        days,
        counts,
        total_hours_worked,
        total_overtime_hours,
        working_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DayStatus;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    fn april() -> MonthPeriod {
        MonthPeriod::new(2026, 4).unwrap()
    }

    fn worked(d: u32, out_hour: u32) -> AttendanceRecord {
        let mut record = AttendanceRecord::new("EMP-001", date(d));
        record.present = true;
        record.clock_in = date(d).and_hms_opt(9, 0, 0);
        record.clock_out = date(d).and_hms_opt(out_hour, 0, 0);
        record
    }

    fn employee() -> Employee {
        Employee::new("EMP-001", "John Doe", dec!(30000))
    }

    #[test]
    fn only_first_unexplained_absence_is_paid() {
        let holidays: HashSet<_> = [date(1)].into_iter().collect();
        let records: Vec<_> = (4..=30).map(|d| worked(d, 17)).collect();

        let month = aggregate_month(&employee(), april(), &records, &holidays, &PayrollRules::default());

        assert_eq!(month.days[0].status, DayStatus::Holiday);
        assert_eq!(month.days[1].status, DayStatus::PaidLeaveAuto);
        assert_eq!(month.days[2].status, DayStatus::Absent);
        assert_eq!(month.counts.paid_leave, 1);
        assert_eq!(month.counts.absent, 1);
        assert_eq!(month.counts.holiday, 1);
        assert_eq!(month.counts.present, 27);
    }

    #[test]
    fn one_entry_per_calendar_day_in_order() {
        let month = aggregate_month(&employee(), april(), &[], &HashSet::new(), &PayrollRules::default());

        assert_eq!(month.days.len(), 30);
        assert!(month.days.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(month.working_days, 30);
    }

    #[test]
    fn records_outside_period_are_ignored() {
        let mut stray = worked(10, 17);
        stray.date = NaiveDate::from_ymd_opt(2026, 5, 10).unwrap();

        let month = aggregate_month(&employee(), april(), &[stray], &HashSet::new(), &PayrollRules::default());

        assert_eq!(month.counts.present, 0);
        assert_eq!(month.total_hours_worked, Decimal::ZERO);
    }

    #[test]
    fn duplicate_records_resolve_to_latest_clock_in() {
        let early = worked(7, 17);
        let mut later = worked(7, 17);
        later.clock_in = date(7).and_hms_opt(10, 0, 0);

        let month = aggregate_month(
            &employee(),
            april(),
            &[early, later],
            &HashSet::new(),
            &PayrollRules::default(),
        );

        let day = &month.days[6];
        assert!(day.late);
        assert_eq!(day.worked_hours, dec!(7));
    }

    #[test]
    fn totals_and_working_days() {
        let mut overtime = worked(2, 19);
        overtime.overtime_allowed = true;
        let records = vec![worked(1, 17), overtime, worked(3, 12)];
        let holidays: HashSet<_> = [date(5), date(12)].into_iter().collect();

        let month = aggregate_month(&employee(), april(), &records, &holidays, &PayrollRules::default());

        assert_eq!(month.total_hours_worked, dec!(8) + dec!(10) + dec!(3));
        assert_eq!(month.total_overtime_hours, dec!(2));
        assert_eq!(month.working_days, 28);
    }

    #[test]
    fn no_clock_out_counts_present_but_pays_nothing() {
        let mut record = worked(1, 17);
        record.clock_out = None;

        let month = aggregate_month(&employee(), april(), &[record], &HashSet::new(), &PayrollRules::default());

        assert_eq!(month.days[0].status, DayStatus::NoClockOut);
        assert_eq!(month.counts.present, 1);
        assert_eq!(month.counts.no_clock_out, 1);
        assert_eq!(month.days[0].salary, Decimal::ZERO);
    }
}
