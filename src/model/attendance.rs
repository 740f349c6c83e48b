use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One stored attendance entry for an employee on a calendar date.
///
/// A record with neither clock-in nor clock-out is an administrative status
/// (manual presence, leave, holiday).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: Option<u64>,

    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "2026-01-05T09:03:00", value_type = Option<String>)]
    pub clock_in: Option<NaiveDateTime>,

    #[schema(example = "2026-01-05T17:00:00", value_type = Option<String>)]
    pub clock_out: Option<NaiveDateTime>,

    #[schema(example = "7.95", value_type = Option<String>)]
    pub worked_hours: Option<Decimal>,

    pub present: bool,
    pub half_day: bool,
    pub late: bool,
    pub holiday: bool,
    pub overtime_allowed: bool,

    pub remarks: Option<String>,

    #[schema(value_type = Option<String>)]
    pub shift_start: Option<NaiveTime>,

    #[schema(value_type = Option<String>)]
    pub shift_end: Option<NaiveTime>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl AttendanceRecord {
    /// Blank, unsaved record: not present, no punches, no flags.
    pub fn new(employee_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: None,
            employee_id: employee_id.into(),
            date,
            clock_in: None,
            clock_out: None,
            worked_hours: None,
            present: false,
            half_day: false,
            late: false,
            holiday: false,
            overtime_allowed: false,
            remarks: None,
            shift_start: None,
            shift_end: None,
            latitude: None,
            longitude: None,
        }
    }

    pub fn holiday(employee_id: impl Into<String>, date: NaiveDate, remarks: impl Into<String>) -> Self {
        Self {
            holiday: true,
            present: false,
            remarks: Some(remarks.into()),
            ..Self::new(employee_id, date)
        }
    }
}

/// Resolves several records stored for the same employee-date to the one that
/// counts: the latest non-null clock-in, or the first record when none has one.
pub fn pick_latest(records: &[AttendanceRecord]) -> Option<&AttendanceRecord> {
    records
        .iter()
        .filter(|r| r.clock_in.is_some())
        .max_by_key(|r| r.clock_in)
        .or_else(|| records.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn latest_clock_in_wins() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let mut early = AttendanceRecord::new("E1", date);
        early.clock_in = Some(at(9, 0));
        let mut late = AttendanceRecord::new("E1", date);
        late.clock_in = Some(at(13, 0));
        late.remarks = Some("second punch".into());
        let admin = AttendanceRecord::new("E1", date);

        let records = vec![admin, late.clone(), early];
        assert_eq!(pick_latest(&records), Some(&late));
    }

    #[test]
    fn falls_back_to_first_without_clock_ins() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let first = AttendanceRecord::holiday("E1", date, "Holiday: New Year");
        let second = AttendanceRecord::new("E1", date);
        let records = vec![first.clone(), second];

        assert_eq!(pick_latest(&records), Some(&first));
        assert_eq!(pick_latest(&[]), None);
    }
}
