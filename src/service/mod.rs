use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppError;

pub mod attendance;
pub mod employee;
pub mod holiday;
pub mod payroll;
pub mod punch;

/// Result of an operation applied to every employee in turn.
///
/// One employee's failure is recorded here and does not stop the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct BatchOutcome {
    pub processed: usize,
    pub failed: Vec<FailedEmployee>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FailedEmployee {
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    pub reason: String,
}

impl BatchOutcome {
    pub fn record_success(&mut self) {
        self.processed += 1;
    }

    pub fn record_failure(&mut self, employee_id: &str, error: &AppError) {
        tracing::warn!(employee_id = %employee_id, error = %error, "Skipping employee after failure");
        self.failed.push(FailedEmployee {
            employee_id: employee_id.to_string(),
            reason: error.to_string(),
        });
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
