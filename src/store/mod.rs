use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AppError;
use crate::model::{AttendanceRecord, Employee};

#[cfg(test)]
pub mod memory;
pub mod mysql;

#[cfg(test)]
pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn find_employee(&self, employee_id: &str) -> Result<Option<Employee>, AppError>;

    /// Every employee, ordered by id.
    async fn all_employees(&self) -> Result<Vec<Employee>, AppError>;

    /// Inserts or replaces by `employee_id`.
    async fn save_employee(&self, employee: &Employee) -> Result<(), AppError>;
}

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn find_by_employee_and_date(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError>;

    /// Inclusive on both ends, ordered by date.
    async fn find_by_employee_and_date_range(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError>;

    /// Holiday-flagged records of every employee, inclusive range.
    async fn find_holiday_records_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError>;

    /// Inserts when `id` is `None`, updates otherwise. Returns the stored record.
    async fn save(&self, record: AttendanceRecord) -> Result<AttendanceRecord, AppError>;

    async fn delete(&self, record: &AttendanceRecord) -> Result<(), AppError>;

    async fn exists_for_employee_and_date(&self, employee_id: &str, date: NaiveDate) -> Result<bool, AppError>;
}

/// Everything the services need from persistence.
pub trait RecordStore: EmployeeStore + AttendanceStore {}

impl<T: EmployeeStore + AttendanceStore> RecordStore for T {}
