use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AppError;
use crate::model::{AttendanceRecord, Employee};
use crate::store::{AttendanceStore, EmployeeStore};

#[derive(Default)]
struct Inner {
    employees: BTreeMap<String, Employee>,
    records: Vec<AttendanceRecord>,
    next_id: u64,
    failing: HashSet<String>,
}

/// In-process record store for tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employees(employees: impl IntoIterator<Item = Employee>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for employee in employees {
                inner.employees.insert(employee.employee_id.clone(), employee);
            }
        }
        store
    }

    /// Every read or write touching `employee_id` fails with a storage error.
    pub fn fail_for(&self, employee_id: &str) {
        self.lock().failing.insert(employee_id.to_string());
    }

    pub fn records(&self) -> Vec<AttendanceRecord> {
        self.lock().records.clone()
    }

    pub fn records_for(&self, employee_id: &str, date: NaiveDate) -> Vec<AttendanceRecord> {
        self.lock()
            .records
            .iter()
            .filter(|r| r.employee_id == employee_id && r.date == date)
            .cloned()
            .collect()
    }

    /// Stores `record` as-is, bypassing the punch rules.
    pub fn insert(&self, record: AttendanceRecord) -> AttendanceRecord {
        let mut inner = self.lock();
        inner.next_id += 1;
        let stored = AttendanceRecord {
            id: Some(inner.next_id),
            ..record
        };
        inner.records.push(stored.clone());
        stored
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Inner {
    fn check(&self, employee_id: &str) -> Result<(), AppError> {
        if self.failing.contains(employee_id) {
            return Err(AppError::Storage(format!("simulated failure for {}", employee_id)));
        }
        Ok(())
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn find_employee(&self, employee_id: &str) -> Result<Option<Employee>, AppError> {
        Ok(self.lock().employees.get(employee_id).cloned())
    }

    async fn all_employees(&self) -> Result<Vec<Employee>, AppError> {
        Ok(self.lock().employees.values().cloned().collect())
    }

    async fn save_employee(&self, employee: &Employee) -> Result<(), AppError> {
        let mut inner = self.lock();
        inner.check(&employee.employee_id)?;
        inner.employees.insert(employee.employee_id.clone(), employee.clone());
        Ok(())
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn find_by_employee_and_date(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        self.lock().check(employee_id)?;
        Ok(self.records_for(employee_id, date))
    }

    async fn find_by_employee_and_date_range(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let inner = self.lock();
        inner.check(employee_id)?;
        let mut records: Vec<_> = inner
            .records
            .iter()
            .filter(|r| r.employee_id == employee_id && r.date >= start && r.date <= end)
            .cloned()
            .collect();
        records.sort_by_key(|r| (r.date, r.id));
        Ok(records)
    }

    async fn find_holiday_records_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let mut records: Vec<_> = self
            .lock()
            .records
            .iter()
            .filter(|r| r.holiday && r.date >= start && r.date <= end)
            .cloned()
            .collect();
        records.sort_by_key(|r| (r.date, r.id));
        Ok(records)
    }

    async fn save(&self, record: AttendanceRecord) -> Result<AttendanceRecord, AppError> {
        let mut inner = self.lock();
        inner.check(&record.employee_id)?;

        match record.id {
            Some(id) => {
                let slot = inner
                    .records
                    .iter_mut()
                    .find(|r| r.id == Some(id))
                    .ok_or_else(|| AppError::not_found(format!("Attendance record {} not found", id)))?;
                *slot = record.clone();
                Ok(record)
            }
            None => {
                inner.next_id += 1;
                let stored = AttendanceRecord {
                    id: Some(inner.next_id),
                    ..record
                };
                inner.records.push(stored.clone());
                Ok(stored)
            }
        }
    }

    async fn delete(&self, record: &AttendanceRecord) -> Result<(), AppError> {
        let mut inner = self.lock();
        inner.check(&record.employee_id)?;
        inner.records.retain(|r| r.id != record.id);
        Ok(())
    }

    async fn exists_for_employee_and_date(&self, employee_id: &str, date: NaiveDate) -> Result<bool, AppError> {
        let inner = self.lock();
        inner.check(employee_id)?;
        Ok(inner
            .records
            .iter()
            .any(|r| r.employee_id == employee_id && r.date == date))
    }
}
