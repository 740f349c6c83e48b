use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

use crate::engine::MonthPeriod;
use crate::error::AppError;
use crate::model::{AttendanceRecord, pick_latest};
use crate::service::BatchOutcome;
use crate::store::RecordStore;

pub const SUNDAY_REMARK: &str = "Sunday Holiday";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HolidayEntry {
    #[schema(example = "2026-01-26", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "Holiday: Republic Day")]
    pub remarks: Option<String>,
}

fn holiday_remark(reason: &str) -> Result<String, AppError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(AppError::validation("Holiday reason must not be empty"));
    }
    Ok(format!("Holiday: {}", reason))
}

/// Dates in `period` on which any employee carries a holiday record.
pub async fn holiday_dates(store: &dyn RecordStore, period: MonthPeriod) -> Result<HashSet<NaiveDate>, AppError> {
    let records = store
        .find_holiday_records_in_range(period.first_day(), period.last_day())
        .await?;
    Ok(records.into_iter().map(|r| r.date).collect())
}

/// Distinct holiday dates of the month with the first remark seen for each.
pub async fn holidays_for_month(store: &dyn RecordStore, period: MonthPeriod) -> Result<Vec<HolidayEntry>, AppError> {
    let records = store
        .find_holiday_records_in_range(period.first_day(), period.last_day())
        .await?;

    let mut by_date: BTreeMap<NaiveDate, Option<String>> = BTreeMap::new();
    for record in records {
        by_date.entry(record.date).or_insert(record.remarks);
    }

    Ok(by_date
        .into_iter()
        .map(|(date, remarks)| HolidayEntry { date, remarks })
        .collect())
}

/// Declares `date` a paid holiday for every employee.
#[instrument(skip(store))]
pub async fn mark_holiday_for_all(store: &dyn RecordStore, date: NaiveDate, reason: &str) -> Result<BatchOutcome, AppError> {
    let remark = holiday_remark(reason)?;
    let employees = store.all_employees().await?;
    let mut outcome = BatchOutcome::default();

    for employee in &employees {
        let result = async {
            let existing = store.find_by_employee_and_date(&employee.employee_id, date).await?;
            let mut record = pick_latest(&existing)
                .cloned()
                .unwrap_or_else(|| AttendanceRecord::new(employee.employee_id.clone(), date));

            record.holiday = true;
            record.present = false;
            record.remarks = Some(remark.clone());
            store.save(record).await.map(|_| ())
        }
        .await;

        match result {
            Ok(()) => outcome.record_success(),
            Err(e) => outcome.record_failure(&employee.employee_id, &e),
        }
    }

    info!(date = %date, processed = outcome.processed, failed = outcome.failed.len(), "Holiday marked");
    Ok(outcome)
}

/// Corrects the holiday disposition of `date`.
///
/// A future date loses its holiday records so the day falls back to the
/// normal rules. Today or a past date keeps (or gains) one record per employee
/// with the holiday flag cleared and presence derived from the clock-in.
#[instrument(skip(store))]
pub async fn manage_holiday(
    store: &dyn RecordStore,
    date: NaiveDate,
    reason: &str,
    today: NaiveDate,
) -> Result<BatchOutcome, AppError> {
    let remark = holiday_remark(reason)?;
    let employees = store.all_employees().await?;
    let mut outcome = BatchOutcome::default();

    for employee in &employees {
        let result = if date > today {
            revert_future_holiday(store, &employee.employee_id, date).await
        } else {
            clear_past_holiday(store, &employee.employee_id, date, &remark).await
        };

        match result {
            Ok(()) => outcome.record_success(),
            Err(e) => outcome.record_failure(&employee.employee_id, &e),
        }
    }

    info!(
        date = %date,
        future = date > today,
        processed = outcome.processed,
        failed = outcome.failed.len(),
        "Holiday managed"
    );
    Ok(outcome)
}

async fn revert_future_holiday(store: &dyn RecordStore, employee_id: &str, date: NaiveDate) -> Result<(), AppError> {
    let existing = store.find_by_employee_and_date(employee_id, date).await?;
    for record in existing.iter().filter(|r| r.holiday) {
        store.delete(record).await?;
    }
    Ok(())
}

async fn clear_past_holiday(
    store: &dyn RecordStore,
    employee_id: &str,
    date: NaiveDate,
    remark: &str,
) -> Result<(), AppError> {
    let existing = store.find_by_employee_and_date(employee_id, date).await?;
    let mut record = pick_latest(&existing)
        .cloned()
        .unwrap_or_else(|| AttendanceRecord::new(employee_id, date));

    record.holiday = false;
    record.present = record.clock_in.is_some();
    record.remarks = Some(remark.to_string());
    store.save(record).await?;
    Ok(())
}

/// Marks each Sunday of `period` as a holiday for every employee, leaving
/// employee-dates that already have a record untouched.
#[instrument(skip(store), fields(year = period.year(), month = period.month()))]
pub async fn generate_sunday_holidays(store: &dyn RecordStore, period: MonthPeriod) -> Result<BatchOutcome, AppError> {
    let sundays: Vec<NaiveDate> = period.days().filter(|d| d.weekday() == Weekday::Sun).collect();
    let employees = store.all_employees().await?;
    let mut outcome = BatchOutcome::default();

    for employee in &employees {
        let result = async {
            for &date in &sundays {
                if store.exists_for_employee_and_date(&employee.employee_id, date).await? {
                    debug!(employee_id = %employee.employee_id, date = %date, "Record exists, Sunday skipped");
                    continue;
                }
                store
                    .save(AttendanceRecord::holiday(employee.employee_id.clone(), date, SUNDAY_REMARK))
                    .await?;
            }
            Ok::<(), AppError>(())
        }
        .await;

        match result {
            Ok(()) => outcome.record_success(),
            Err(e) => outcome.record_failure(&employee.employee_id, &e),
        }
    }

    info!(sundays = sundays.len(), processed = outcome.processed, failed = outcome.failed.len(), "Sunday holidays generated");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Employee;
    use crate::store::{AttendanceStore, MemoryStore};
    use rust_decimal_macros::dec;

    fn store() -> MemoryStore {
        MemoryStore::with_employees([
            Employee::new("EMP-001", "John Doe", dec!(30000)),
            Employee::new("EMP-002", "Jane Roe", dec!(24000)),
        ])
    }

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    #[actix_web::test]
    async fn mark_holiday_for_all_flags_every_employee() {
        let store = store();
        let mut worked = AttendanceRecord::new("EMP-001", date(1, 26));
        worked.present = true;
        store.insert(worked);

        let outcome = mark_holiday_for_all(&store, date(1, 26), "Republic Day").await.unwrap();

        assert_eq!(outcome.processed, 2);
        for id in ["EMP-001", "EMP-002"] {
            let records = store.records_for(id, date(1, 26));
            assert_eq!(records.len(), 1);
            assert!(records[0].holiday);
            assert!(!records[0].present);
            assert_eq!(records[0].remarks.as_deref(), Some("Holiday: Republic Day"));
        }
    }

    #[actix_web::test]
    async fn empty_reason_is_rejected() {
        let store = store();
        assert!(matches!(
            mark_holiday_for_all(&store, date(1, 26), "  ").await,
            Err(AppError::Validation(_))
        ));
    }

    #[actix_web::test]
    async fn manage_future_holiday_removes_holiday_records() {
        let store = store();
        mark_holiday_for_all(&store, date(3, 10), "Festival").await.unwrap();
        store.insert(AttendanceRecord::new("EMP-002", date(3, 10)));

        manage_holiday(&store, date(3, 10), "Festival", date(3, 1)).await.unwrap();

        assert!(store.records_for("EMP-001", date(3, 10)).is_empty());
        let remaining = store.records_for("EMP-002", date(3, 10));
        assert_eq!(remaining.len(), 1);
        assert!(!remaining[0].holiday);
    }

    #[actix_web::test]
    async fn manage_past_holiday_clears_flag_and_derives_presence() {
        let store = store();
        mark_holiday_for_all(&store, date(2, 2), "Storm").await.unwrap();
        let mut punched = store.records_for("EMP-001", date(2, 2)).remove(0);
        punched.clock_in = date(2, 2).and_hms_opt(9, 0, 0);
        store.save(punched).await.unwrap();

        manage_holiday(&store, date(2, 2), "Storm", date(2, 2)).await.unwrap();

        let worked = &store.records_for("EMP-001", date(2, 2))[0];
        assert!(!worked.holiday);
        assert!(worked.present);
        let idle = &store.records_for("EMP-002", date(2, 2))[0];
        assert!(!idle.holiday);
        assert!(!idle.present);
        assert_eq!(idle.remarks.as_deref(), Some("Holiday: Storm"));
    }

    #[actix_web::test]
    async fn sundays_skip_existing_records() {
        let store = store();
        // February 2026 Sundays: 1, 8, 15, 22.
        let mut worked = AttendanceRecord::new("EMP-001", date(2, 8));
        worked.present = true;
        store.insert(worked);

        let period = MonthPeriod::new(2026, 2).unwrap();
        let outcome = generate_sunday_holidays(&store, period).await.unwrap();

        assert!(outcome.is_clean());
        assert_eq!(store.records().len(), 8);
        assert!(store.records_for("EMP-001", date(2, 8))[0].present);
        assert_eq!(
            store.records_for("EMP-002", date(2, 8))[0].remarks.as_deref(),
            Some(SUNDAY_REMARK)
        );

        generate_sunday_holidays(&store, period).await.unwrap();
        assert_eq!(store.records().len(), 8);
    }

    #[actix_web::test]
    async fn sunday_generation_isolates_failing_employee() {
        let store = store();
        store.fail_for("EMP-001");

        let outcome = generate_sunday_holidays(&store, MonthPeriod::new(2026, 2).unwrap())
            .await
            .unwrap();

        assert_eq!(outcome.processed, 1);
        assert_eq!(outcome.failed[0].employee_id, "EMP-001");
        assert_eq!(store.records().len(), 4);
    }

    #[actix_web::test]
    async fn holidays_for_month_are_distinct_and_sorted() {
        let store = store();
        mark_holiday_for_all(&store, date(1, 26), "Republic Day").await.unwrap();
        generate_sunday_holidays(&store, MonthPeriod::new(2026, 1).unwrap())
            .await
            .unwrap();

        let period = MonthPeriod::new(2026, 1).unwrap();
        let entries = holidays_for_month(&store, period).await.unwrap();

        let dates: Vec<_> = entries.iter().map(|e| e.date.day()).collect();
        assert_eq!(dates, vec![4, 11, 18, 25, 26]);
        assert_eq!(holiday_dates(&store, period).await.unwrap().len(), 5);
    }
}
