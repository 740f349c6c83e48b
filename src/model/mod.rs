pub mod attendance;
pub mod employee;
pub mod report;

pub use attendance::{AttendanceRecord, pick_latest};
pub use employee::{Employee, Shift, ShiftGroup};
pub use report::{
    AttendanceCounts, DayClassification, DayStatus, EmployeeSalary, MonthlyAttendance, MonthlyReport,
    SalarySummary,
};
