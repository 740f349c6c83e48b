use std::sync::Arc;

use chrono::NaiveDate;

use crate::engine::PayrollRules;
use crate::error::AppError;
use crate::service::punch::PunchValidator;
use crate::store::RecordStore;

pub mod attendance;
pub mod employee;
pub mod holiday;
pub mod payroll;

/// Shared by every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub validator: Arc<dyn PunchValidator>,
    pub rules: PayrollRules,
}

/// `YYYY-MM-DD` from a path segment.
pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date '{}', use YYYY-MM-DD", raw)))
}
