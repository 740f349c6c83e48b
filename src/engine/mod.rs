pub mod aggregator;
pub mod classifier;
pub mod payroll;
pub mod period;
pub mod rules;

pub use aggregator::aggregate_month;
pub use classifier::{DayContext, classify};
pub use payroll::{PayRates, compute_payroll, settle};
pub use period::MonthPeriod;
pub use rules::{PayrollRules, hours_between};
