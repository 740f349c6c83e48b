use crate::api::employee::{BonusUpdate, SalaryUpdate, ShiftUpdate};
use crate::api::holiday::HolidayRequest;
use crate::model::{
    AttendanceCounts, AttendanceRecord, DayClassification, DayStatus, Employee, EmployeeSalary,
    MonthlyAttendance, MonthlyReport, SalarySummary, Shift, ShiftGroup,
};
use crate::service::attendance::{AttendanceOverride, PunchRequest};
use crate::service::holiday::HolidayEntry;
use crate::service::payroll::PayrollRun;
use crate::service::{BatchOutcome, FailedEmployee};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance & Payroll API",
        version = "1.0.0",
        description = r#"
## Attendance and Payroll

Turns daily clock-in/clock-out punches into monthly attendance and salary figures.

### Key Features
- **Attendance**
  - Clock in and out from a punch terminal (code and geofence checked)
  - Administrative overrides, per-day and per-month classification
- **Holidays**
  - Company-wide holidays, corrections, automatic Sunday holidays
- **Payroll**
  - Per-employee monthly report, salaries for everyone
- **Employees**
  - Salary, bonus and default shift

### Rules
- 5 minute grace on late arrival, early arrival counts from shift start
- Daily rate is monthly salary / 30
- First unexplained absence of a month is paid

### Response Format
- JSON bodies; errors are `{"message": "..."}`
- Requests are rate limited per client IP
"#,
    ),
    paths(
        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,
        crate::api::attendance::override_attendance,
        crate::api::attendance::delete_attendance,
        crate::api::attendance::daily_attendance,
        crate::api::attendance::monthly_attendance,

        crate::api::payroll::salaries_for_all,
        crate::api::payroll::monthly_report,

        crate::api::holiday::mark_holiday,
        crate::api::holiday::manage_holiday,
        crate::api::holiday::holidays_for_month,
        crate::api::holiday::generate_sundays,

        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_salary,
        crate::api::employee::update_bonus,
        crate::api::employee::update_shift,
        crate::api::employee::get_shift
    ),
    components(
        schemas(
            PunchRequest,
            AttendanceOverride,
            AttendanceRecord,
            DayStatus,
            DayClassification,
            AttendanceCounts,
            MonthlyAttendance,
            SalarySummary,
            MonthlyReport,
            EmployeeSalary,
            PayrollRun,
            BatchOutcome,
            FailedEmployee,
            HolidayRequest,
            HolidayEntry,
            Employee,
            Shift,
            ShiftGroup,
            SalaryUpdate,
            BonusUpdate,
            ShiftUpdate
        )
    ),
    tags(
        (name = "Attendance", description = "Punches, overrides and attendance views"),
        (name = "Payroll", description = "Monthly reports and salaries"),
        (name = "Holiday", description = "Holiday management"),
        (name = "Employee", description = "Employee salary and shift settings"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(doc.components.is_some());
        assert!(paths.contains_key("/api/attendance/in/{employee_id}"));
        assert!(paths.contains_key("/api/payroll/{employee_id}/{year}/{month}"));
        assert!(paths.contains_key("/api/holiday/sundays/{year}/{month}"));
        assert!(paths.contains_key("/api/employee/{employee_id}/shift"));
    }
}
