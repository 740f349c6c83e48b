use chrono::NaiveTime;
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::engine::PayrollRules;
use crate::error::AppError;
use crate::model::{Employee, Shift};
use crate::store::RecordStore;

pub async fn require_employee(store: &dyn RecordStore, employee_id: &str) -> Result<Employee, AppError> {
    store
        .find_employee(employee_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee {} not found", employee_id)))
}

pub async fn list_employees(store: &dyn RecordStore) -> Result<Vec<Employee>, AppError> {
    store.all_employees().await
}

#[instrument(skip(store))]
pub async fn set_salary(store: &dyn RecordStore, employee_id: &str, salary: Decimal) -> Result<Employee, AppError> {
    if salary < Decimal::ZERO {
        return Err(AppError::validation("Salary must not be negative"));
    }

    let mut employee = require_employee(store, employee_id).await?;
    employee.salary = salary;
    store.save_employee(&employee).await?;

    info!(employee_id = %employee_id, salary = %salary, "Salary updated");
    Ok(employee)
}

#[instrument(skip(store))]
pub async fn set_bonus(store: &dyn RecordStore, employee_id: &str, bonus: Decimal) -> Result<Employee, AppError> {
    if bonus < Decimal::ZERO {
        return Err(AppError::validation("Bonus must not be negative"));
    }

    let mut employee = require_employee(store, employee_id).await?;
    employee.bonus = bonus;
    store.save_employee(&employee).await?;

    info!(employee_id = %employee_id, bonus = %bonus, "Bonus updated");
    Ok(employee)
}

#[instrument(skip(store))]
pub async fn set_shift(
    store: &dyn RecordStore,
    employee_id: &str,
    start: NaiveTime,
    end: NaiveTime,
) -> Result<Employee, AppError> {
    let shift = Shift::new(start, end)?;

    let mut employee = require_employee(store, employee_id).await?;
    employee.shift_start = Some(shift.start);
    employee.shift_end = Some(shift.end);
    store.save_employee(&employee).await?;

    info!(employee_id = %employee_id, start = %shift.start, end = %shift.end, "Shift updated");
    Ok(employee)
}

/// The shift the employee works when no per-day override exists.
pub async fn shift_for(store: &dyn RecordStore, rules: &PayrollRules, employee_id: &str) -> Result<Shift, AppError> {
    let employee = require_employee(store, employee_id).await?;
    Ok(rules.employee_shift(&employee))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ShiftGroup;
    use crate::store::MemoryStore;
    use rust_decimal_macros::dec;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn store() -> MemoryStore {
        MemoryStore::with_employees([Employee::new("EMP-001", "John Doe", dec!(30000))])
    }

    #[actix_web::test]
    async fn unknown_employee_is_not_found() {
        let store = store();
        let err = require_employee(&store, "EMP-404").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[actix_web::test]
    async fn salary_and_bonus_updates() {
        let store = store();

        set_salary(&store, "EMP-001", dec!(45000)).await.unwrap();
        set_bonus(&store, "EMP-001", dec!(1500)).await.unwrap();

        let employee = require_employee(&store, "EMP-001").await.unwrap();
        assert_eq!(employee.salary, dec!(45000));
        assert_eq!(employee.bonus, dec!(1500));
    }

    #[actix_web::test]
    async fn negative_amounts_are_rejected() {
        let store = store();

        assert!(matches!(
            set_salary(&store, "EMP-001", dec!(-1)).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            set_bonus(&store, "EMP-001", dec!(-0.01)).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(require_employee(&store, "EMP-001").await.unwrap().salary, dec!(30000));
    }

    #[actix_web::test]
    async fn shift_falls_back_to_group_then_uses_explicit_value() {
        let mut secondary = Employee::new("EMP-002", "Jane Roe", dec!(30000));
        secondary.group = ShiftGroup::Secondary;
        let store = MemoryStore::with_employees([secondary]);
        let rules = PayrollRules::default();

        assert_eq!(shift_for(&store, &rules, "EMP-002").await.unwrap(), rules.secondary_shift);

        set_shift(&store, "EMP-002", t(8, 0), t(16, 0)).await.unwrap();
        let shift = shift_for(&store, &rules, "EMP-002").await.unwrap();
        assert_eq!((shift.start, shift.end), (t(8, 0), t(16, 0)));
    }

    #[actix_web::test]
    async fn inverted_shift_is_rejected() {
        let store = store();
        let err = set_shift(&store, "EMP-001", t(17, 0), t(9, 0)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
