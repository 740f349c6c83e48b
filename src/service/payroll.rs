use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::engine::{MonthPeriod, PayrollRules, compute_payroll};
use crate::error::AppError;
use crate::model::{AttendanceRecord, Employee, EmployeeSalary, MonthlyReport};
use crate::service::employee::require_employee;
use crate::service::holiday::holiday_dates;
use crate::service::{BatchOutcome, FailedEmployee};
use crate::store::RecordStore;

/// Salaries of every employee for one month; employees whose report could not
/// be produced are listed separately.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PayrollRun {
    pub salaries: Vec<EmployeeSalary>,
    pub failed: Vec<FailedEmployee>,
}

/// The employee's records plus the month's holiday dates.
pub async fn load_month(
    store: &dyn RecordStore,
    employee_id: &str,
    period: MonthPeriod,
) -> Result<(Vec<AttendanceRecord>, HashSet<NaiveDate>), AppError> {
    let records = store
        .find_by_employee_and_date_range(employee_id, period.first_day(), period.last_day())
        .await?;
    let holidays = holiday_dates(store, period).await?;
    Ok((records, holidays))
}

async fn report_for(
    store: &dyn RecordStore,
    rules: &PayrollRules,
    employee: &Employee,
    period: MonthPeriod,
    holidays: &HashSet<NaiveDate>,
) -> Result<MonthlyReport, AppError> {
    let records = store
        .find_by_employee_and_date_range(&employee.employee_id, period.first_day(), period.last_day())
        .await?;
    Ok(compute_payroll(employee, period, &records, holidays, rules))
}

/// Full attendance and salary breakdown of one employee-month.
#[instrument(skip(store, rules), fields(year = period.year(), month = period.month()))]
pub async fn monthly_report(
    store: &dyn RecordStore,
    rules: &PayrollRules,
    employee_id: &str,
    period: MonthPeriod,
) -> Result<MonthlyReport, AppError> {
    let employee = require_employee(store, employee_id).await?;
    let (records, holidays) = load_month(store, employee_id, period).await?;

    Ok(compute_payroll(&employee, period, &records, &holidays, rules))
}

pub async fn salary_for_employee(
    store: &dyn RecordStore,
    rules: &PayrollRules,
    employee_id: &str,
    period: MonthPeriod,
) -> Result<EmployeeSalary, AppError> {
    let report = monthly_report(store, rules, employee_id, period).await?;
    Ok(EmployeeSalary::from(&report))
}

/// Computes every employee's report, handing each to `each`; one employee's
/// failure is recorded and the rest are still processed.
pub async fn for_each_report<F>(
    store: &dyn RecordStore,
    rules: &PayrollRules,
    period: MonthPeriod,
    mut each: F,
) -> Result<BatchOutcome, AppError>
where
    F: FnMut(MonthlyReport),
{
    let employees = store.all_employees().await?;
    let holidays = holiday_dates(store, period).await?;
    let mut outcome = BatchOutcome::default();

    for employee in &employees {
        match report_for(store, rules, employee, period, &holidays).await {
            Ok(report) => {
                each(report);
                outcome.record_success();
            }
            Err(e) => outcome.record_failure(&employee.employee_id, &e),
        }
    }

    Ok(outcome)
}

#[instrument(skip(store, rules), fields(year = period.year(), month = period.month()))]
pub async fn salaries_for_all(
    store: &dyn RecordStore,
    rules: &PayrollRules,
    period: MonthPeriod,
) -> Result<PayrollRun, AppError> {
    let mut salaries = Vec::new();
    let outcome = for_each_report(store, rules, period, |report| {
        salaries.push(EmployeeSalary::from(&report));
    })
    .await?;

    info!(employees = salaries.len(), failed = outcome.failed.len(), "Payroll computed");
    Ok(PayrollRun {
        salaries,
        failed: outcome.failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::holiday::{generate_sunday_holidays, mark_holiday_for_all};
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn store() -> MemoryStore {
        let mut bonus = Employee::new("EMP-002", "Jane Roe", dec!(24000));
        bonus.bonus = dec!(1000);
        MemoryStore::with_employees([Employee::new("EMP-001", "John Doe", dec!(30000)), bonus])
    }

    fn worked(store: &MemoryStore, employee_id: &str, date: NaiveDate) {
        let mut record = AttendanceRecord::new(employee_id, date);
        record.present = true;
        record.clock_in = date.and_hms_opt(9, 0, 0);
        record.clock_out = date.and_hms_opt(17, 0, 0);
        store.insert(record);
    }

    fn april() -> MonthPeriod {
        MonthPeriod::new(2026, 4).unwrap()
    }

    #[actix_web::test]
    async fn holidays_declared_for_all_are_paid() {
        let store = store();
        let period = april();
        generate_sunday_holidays(&store, period).await.unwrap();
        for date in period.days() {
            if !store.records_for("EMP-001", date).is_empty() {
                continue;
            }
            worked(&store, "EMP-001", date);
        }

        let report = monthly_report(&store, &PayrollRules::default(), "EMP-001", period)
            .await
            .unwrap();

        assert_eq!(report.attendance.counts.holiday, 4);
        assert_eq!(report.attendance.counts.present, 26);
        assert_eq!(report.attendance.working_days, 26);
        assert_eq!(report.salary.total_salary, dec!(30000));
    }

    #[actix_web::test]
    async fn holiday_of_another_employee_counts_for_record_less_days() {
        let store = store();
        let period = april();
        mark_holiday_for_all(&store, NaiveDate::from_ymd_opt(2026, 4, 14).unwrap(), "New Year")
            .await
            .unwrap();
        // Only EMP-002's holiday record is kept.
        let own = store.records_for("EMP-001", NaiveDate::from_ymd_opt(2026, 4, 14).unwrap());
        crate::store::AttendanceStore::delete(&store, &own[0]).await.unwrap();

        let report = monthly_report(&store, &PayrollRules::default(), "EMP-001", period)
            .await
            .unwrap();

        assert_eq!(report.attendance.days[13].status, crate::model::DayStatus::Holiday);
    }

    #[actix_web::test]
    async fn single_employee_salary_includes_bonus() {
        let store = store();
        let period = april();
        for date in period.days() {
            worked(&store, "EMP-002", date);
        }

        let salary = salary_for_employee(&store, &PayrollRules::default(), "EMP-002", period)
            .await
            .unwrap();

        assert_eq!(salary.employee_name, "Jane Roe");
        assert_eq!(salary.salary, dec!(25000));
    }

    #[actix_web::test]
    async fn unknown_employee_report_is_not_found() {
        let store = store();
        let err = monthly_report(&store, &PayrollRules::default(), "EMP-404", april())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[actix_web::test]
    async fn all_salaries_isolate_failures() {
        let store = store();
        store.fail_for("EMP-001");

        let run = salaries_for_all(&store, &PayrollRules::default(), april()).await.unwrap();

        assert_eq!(run.salaries.len(), 1);
        assert_eq!(run.salaries[0].employee_id, "EMP-002");
        // Grace day only, plus bonus.
        assert_eq!(run.salaries[0].salary, dec!(800) + dec!(1000));
        assert_eq!(run.failed.len(), 1);
        assert_eq!(run.failed[0].employee_id, "EMP-001");
    }

    #[actix_web::test]
    async fn reports_are_recomputed_after_corrections() {
        let store = store();
        let period = april();
        let date = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
        worked(&store, "EMP-001", date);

        let before = monthly_report(&store, &PayrollRules::default(), "EMP-001", period)
            .await
            .unwrap();
        mark_holiday_for_all(&store, date, "Correction").await.unwrap();
        let after = monthly_report(&store, &PayrollRules::default(), "EMP-001", period)
            .await
            .unwrap();

        assert_eq!(before.attendance.days[0].status, crate::model::DayStatus::Present);
        assert_eq!(after.attendance.days[0].status, crate::model::DayStatus::Holiday);
        assert!(after.salary.total_salary >= Decimal::ZERO);
    }
}
