use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

use crate::model::Shift;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,

    // Rate limiting
    pub rate_punch_per_min: u32,
    pub rate_protected_per_min: u32,

    // Logging
    pub log_dir: String,
    pub log_level: tracing::Level,

    // Attendance and payroll rules
    pub late_tolerance_minutes: i64,
    pub pay_cycle_days: u32,
    pub overtime_multiplier: Decimal,
    pub max_late_clock_in_minutes: i64,
    pub min_work_before_clock_out_minutes: i64,
    pub primary_shift: Shift,
    pub secondary_shift: Shift,

    // Punch gate
    pub punch_code: String,
    pub geofence_latitude: f64,
    pub geofence_longitude: f64,
    pub geofence_radius_meters: f64,

    // Batch jobs
    pub monthly_job_cron: String,
    pub absence_cutoff_cron: String,
    pub job_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let primary_shift = Shift::parse(&var_or("PRIMARY_SHIFT", "09:00-17:00"))
            .map_err(|e| anyhow!("PRIMARY_SHIFT: {}", e))?;
        let secondary_shift = Shift::parse(&var_or("SECONDARY_SHIFT", "09:30-17:30"))
            .map_err(|e| anyhow!("SECONDARY_SHIFT: {}", e))?;

        let pay_cycle_days: u32 = parse_or("PAY_CYCLE_DAYS", 30)?;
        if pay_cycle_days == 0 {
            return Err(anyhow!("PAY_CYCLE_DAYS must be greater than zero"));
        }

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            api_prefix: var_or("API_PREFIX", "/api"),

            rate_punch_per_min: parse_or("RATE_PUNCH_PER_MIN", 60)?,
            rate_protected_per_min: parse_or("RATE_PROTECTED_PER_MIN", 1000)?,

            log_dir: var_or("LOG_DIR", "logs"),
            log_level: parse_or("LOG_LEVEL", tracing::Level::DEBUG)?,

            late_tolerance_minutes: parse_or("LATE_TOLERANCE_MINUTES", 5)?,
            pay_cycle_days,
            overtime_multiplier: parse_or("OVERTIME_MULTIPLIER", Decimal::ONE)?,
            max_late_clock_in_minutes: parse_or("MAX_LATE_CLOCK_IN_MINUTES", 4 * 60)?,
            min_work_before_clock_out_minutes: parse_or("MIN_WORK_BEFORE_CLOCK_OUT_MINUTES", 4 * 60)?,
            primary_shift,
            secondary_shift,

            punch_code: required("PUNCH_CODE")?,
            geofence_latitude: parse_required("GEOFENCE_LATITUDE")?,
            geofence_longitude: parse_required("GEOFENCE_LONGITUDE")?,
            geofence_radius_meters: parse_or("GEOFENCE_RADIUS_METERS", 10.0)?,

            monthly_job_cron: var_or("MONTHLY_JOB_CRON", "0 0 7 1 * *"),
            absence_cutoff_cron: var_or("ABSENCE_CUTOFF_CRON", "0 0 12 * * *"),
            job_timeout_secs: parse_or("JOB_TIMEOUT_SECS", 300)?,
        })
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{} must be set", key))
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} has an invalid value '{}': {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

fn parse_required<T>(key: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = required(key)?;
    raw.trim()
        .parse()
        .map_err(|e| anyhow!("{} has an invalid value '{}': {}", key, raw, e))
}
