use chrono::{Datelike, Months, NaiveDate};

use crate::error::AppError;

/// One calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthPeriod {
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl MonthPeriod {
    pub fn new(year: i32, month: u32) -> Result<Self, AppError> {
        let invalid = || AppError::validation(format!("Invalid year/month {}-{}", year, month));

        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let last_day = first_day
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(invalid)?;

        Ok(Self { first_day, last_day })
    }

    pub fn containing(date: NaiveDate) -> Result<Self, AppError> {
        Self::new(date.year(), date.month())
    }

    pub fn previous(&self) -> Result<Self, AppError> {
        let previous = self
            .first_day
            .pred_opt()
            .ok_or_else(|| AppError::validation("No month before the earliest supported date"))?;
        Self::containing(previous)
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day.day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day && date <= self.last_day
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last_day;
        self.first_day.iter_days().take_while(move |d| *d <= last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_lengths() {
        assert_eq!(MonthPeriod::new(2026, 1).unwrap().days_in_month(), 31);
        assert_eq!(MonthPeriod::new(2026, 4).unwrap().days_in_month(), 30);
        assert_eq!(MonthPeriod::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(MonthPeriod::new(2026, 2).unwrap().days_in_month(), 28);
        assert_eq!(MonthPeriod::new(2026, 12).unwrap().days().count(), 31);
    }

    #[test]
    fn rejects_bad_month() {
        assert!(matches!(MonthPeriod::new(2026, 13), Err(AppError::Validation(_))));
        assert!(matches!(MonthPeriod::new(2026, 0), Err(AppError::Validation(_))));
    }

    #[test]
    fn previous_crosses_year() {
        let january = MonthPeriod::new(2026, 1).unwrap();
        let december = january.previous().unwrap();
        assert_eq!((december.year(), december.month()), (2025, 12));
        assert!(december.contains(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
        assert!(!december.contains(january.first_day()));
    }
}
