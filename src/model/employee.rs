use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Row, mysql::MySqlRow};
use utoipa::ToSchema;

use crate::error::AppError;

/// Which canonical shift pattern an employee falls back to when no explicit
/// shift is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ShiftGroup {
    Primary,
    Secondary,
}

impl ShiftGroup {
    pub fn from_flag(secondary: bool) -> Self {
        if secondary {
            ShiftGroup::Secondary
        } else {
            ShiftGroup::Primary
        }
    }

    pub fn is_secondary(self) -> bool {
        self == ShiftGroup::Secondary
    }
}

/// Expected start and end of a working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Shift {
    #[schema(example = "09:00:00", value_type = String)]
    pub start: NaiveTime,
    #[schema(example = "17:00:00", value_type = String)]
    pub end: NaiveTime,
}

impl Shift {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, AppError> {
        if end <= start {
            return Err(AppError::validation(format!(
                "Shift end {} must be after shift start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// Parses `HH:MM-HH:MM`.
    pub fn parse(value: &str) -> Result<Self, AppError> {
        let (start, end) = value
            .split_once('-')
            .ok_or_else(|| AppError::validation(format!("Invalid shift '{}', use HH:MM-HH:MM", value)))?;

        let parse_time = |raw: &str| {
            NaiveTime::parse_from_str(raw.trim(), "%H:%M")
                .map_err(|_| AppError::validation(format!("Invalid time '{}' in shift", raw.trim())))
        };

        Self::new(parse_time(start)?, parse_time(end)?)
    }

    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn hours(&self) -> Decimal {
        Decimal::from(self.minutes()) / Decimal::from(60)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "employee_id": "EMP-001",
        "full_name": "John Doe",
        "group": "primary",
        "salary": "30000",
        "bonus": "0",
        "shift_start": null,
        "shift_end": null
    })
)]
pub struct Employee {
    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "John Doe")]
    pub full_name: String,

    pub group: ShiftGroup,

    /// Monthly salary.
    #[schema(example = "30000", value_type = String)]
    pub salary: Decimal,

    #[schema(example = "0", value_type = String)]
    pub bonus: Decimal,

    #[schema(example = "09:00:00", value_type = Option<String>, nullable = true)]
    pub shift_start: Option<NaiveTime>,

    #[schema(example = "17:00:00", value_type = Option<String>, nullable = true)]
    pub shift_end: Option<NaiveTime>,
}

impl Employee {
    pub fn new(employee_id: impl Into<String>, full_name: impl Into<String>, salary: Decimal) -> Self {
        Self {
            employee_id: employee_id.into(),
            full_name: full_name.into(),
            group: ShiftGroup::Primary,
            salary,
            bonus: Decimal::ZERO,
            shift_start: None,
            shift_end: None,
        }
    }
}

impl<'r> FromRow<'r, MySqlRow> for Employee {
    fn from_row(row: &'r MySqlRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            employee_id: row.try_get("employee_id")?,
            full_name: row.try_get("full_name")?,
            group: ShiftGroup::from_flag(row.try_get("secondary_group")?),
            salary: row.try_get("salary")?,
            bonus: row.try_get("bonus")?,
            shift_start: row.try_get("shift_start")?,
            shift_end: row.try_get("shift_end")?,
        })
    }
}
