use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::error::AppError;
use crate::model::{AttendanceRecord, Employee};
use crate::store::{AttendanceStore, EmployeeStore};

const RECORD_COLUMNS: &str = r#"
    id, employee_id, `date`, clock_in, clock_out, worked_hours,
    present, half_day, late, holiday, overtime_allowed, remarks,
    shift_start, shift_end, latitude, longitude
"#;

const EMPLOYEE_COLUMNS: &str = r#"
    employee_id, full_name, secondary_group, salary, bonus, shift_start, shift_end
"#;

/// Record store backed by the `employees` and `attendance` tables.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for MySqlStore {
    async fn find_employee(&self, employee_id: &str) -> Result<Option<Employee>, AppError> {
        let sql = format!("SELECT {} FROM employees WHERE employee_id = ?", EMPLOYEE_COLUMNS);

        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(employee_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(employee)
    }

    async fn all_employees(&self) -> Result<Vec<Employee>, AppError> {
        let sql = format!("SELECT {} FROM employees ORDER BY employee_id", EMPLOYEE_COLUMNS);

        let employees = sqlx::query_as::<_, Employee>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(employees)
    }

    async fn save_employee(&self, employee: &Employee) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO employees
                (employee_id, full_name, secondary_group, salary, bonus, shift_start, shift_end)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                full_name = VALUES(full_name),
                secondary_group = VALUES(secondary_group),
                salary = VALUES(salary),
                bonus = VALUES(bonus),
                shift_start = VALUES(shift_start),
                shift_end = VALUES(shift_end)
            "#,
        )
        .bind(&employee.employee_id)
        .bind(&employee.full_name)
        .bind(employee.group.is_secondary())
        .bind(employee.salary)
        .bind(employee.bonus)
        .bind(employee.shift_start)
        .bind(employee.shift_end)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn find_by_employee_and_date(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let sql = format!(
            "SELECT {} FROM attendance WHERE employee_id = ? AND `date` = ? ORDER BY id",
            RECORD_COLUMNS
        );

        let records = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(employee_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn find_by_employee_and_date_range(
        &self,
        employee_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let sql = format!(
            "SELECT {} FROM attendance WHERE employee_id = ? AND `date` BETWEEN ? AND ? ORDER BY `date`, id",
            RECORD_COLUMNS
        );

        let records = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(employee_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn find_holiday_records_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let sql = format!(
            "SELECT {} FROM attendance WHERE holiday = TRUE AND `date` BETWEEN ? AND ? ORDER BY `date`, id",
            RECORD_COLUMNS
        );

        let records = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn save(&self, mut record: AttendanceRecord) -> Result<AttendanceRecord, AppError> {
        match record.id {
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE attendance SET
                        employee_id = ?, `date` = ?, clock_in = ?, clock_out = ?, worked_hours = ?,
                        present = ?, half_day = ?, late = ?, holiday = ?, overtime_allowed = ?,
                        remarks = ?, shift_start = ?, shift_end = ?, latitude = ?, longitude = ?
                    WHERE id = ?
                    "#,
                )
                .bind(&record.employee_id)
                .bind(record.date)
                .bind(record.clock_in)
                .bind(record.clock_out)
                .bind(record.worked_hours)
                .bind(record.present)
                .bind(record.half_day)
                .bind(record.late)
                .bind(record.holiday)
                .bind(record.overtime_allowed)
                .bind(&record.remarks)
                .bind(record.shift_start)
                .bind(record.shift_end)
                .bind(record.latitude)
                .bind(record.longitude)
                .bind(id)
                .execute(&self.pool)
                .await?;

                // MySQL reports zero affected rows when nothing changed, so
                // only a missing id is an error.
                if result.rows_affected() == 0 && !self.record_exists(id).await? {
                    return Err(AppError::not_found(format!("Attendance record {} not found", id)));
                }
            }
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO attendance
                        (employee_id, `date`, clock_in, clock_out, worked_hours,
                         present, half_day, late, holiday, overtime_allowed,
                         remarks, shift_start, shift_end, latitude, longitude)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&record.employee_id)
                .bind(record.date)
                .bind(record.clock_in)
                .bind(record.clock_out)
                .bind(record.worked_hours)
                .bind(record.present)
                .bind(record.half_day)
                .bind(record.late)
                .bind(record.holiday)
                .bind(record.overtime_allowed)
                .bind(&record.remarks)
                .bind(record.shift_start)
                .bind(record.shift_end)
                .bind(record.latitude)
                .bind(record.longitude)
                .execute(&self.pool)
                .await?;

                record.id = Some(result.last_insert_id());
            }
        }

        Ok(record)
    }

    async fn delete(&self, record: &AttendanceRecord) -> Result<(), AppError> {
        let Some(id) = record.id else {
            return Err(AppError::not_found("Attendance record was never stored"));
        };

        sqlx::query("DELETE FROM attendance WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn exists_for_employee_and_date(&self, employee_id: &str, date: NaiveDate) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance WHERE employee_id = ? AND `date` = ?",
        )
        .bind(employee_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }
}

impl MySqlStore {
    async fn record_exists(&self, id: u64) -> Result<bool, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }
}
