use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, error, info, instrument, warn};

use crate::config::Config;
use crate::engine::{MonthPeriod, PayrollRules};
use crate::error::AppError;
use crate::model::MonthlyReport;
use crate::service::attendance::mark_absent_for_missed_in;
use crate::service::holiday::generate_sunday_holidays;
use crate::service::payroll::for_each_report;
use crate::service::BatchOutcome;
use crate::store::RecordStore;

/// Receives finished monthly reports. Delivery itself is external.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn deliver(&self, report: &MonthlyReport) -> Result<(), AppError>;
}

/// Writes a structured summary of each report to the log.
pub struct LogReportSink;

#[async_trait]
impl ReportSink for LogReportSink {
    async fn deliver(&self, report: &MonthlyReport) -> Result<(), AppError> {
        let counts = &report.attendance.counts;
        info!(
            employee_id = %report.employee_id,
            year = report.year,
            month = report.month,
            present = counts.present,
            half_day = counts.half_day,
            absent = counts.absent,
            holiday = counts.holiday,
            paid_leave = counts.paid_leave,
            no_clock_out = counts.no_clock_out,
            hours = %report.attendance.total_hours_worked,
            overtime_hours = %report.attendance.total_overtime_hours,
            total_salary = %report.salary.total_salary,
            "Monthly report"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyCycleOutcome {
    pub sundays: BatchOutcome,
    pub reports: BatchOutcome,
}

/// Month-boundary work: Sundays of the month containing `today` become
/// holidays, then the previous month is reported employee by employee.
#[instrument(skip(store, rules, sink))]
pub async fn run_monthly_cycle(
    store: &dyn RecordStore,
    rules: &PayrollRules,
    sink: &dyn ReportSink,
    today: NaiveDate,
) -> Result<MonthlyCycleOutcome, AppError> {
    let current = MonthPeriod::containing(today)?;
    let sundays = generate_sunday_holidays(store, current).await?;

    let previous = current.previous()?;
    let mut reports = Vec::new();
    let computed = for_each_report(store, rules, previous, |report| reports.push(report)).await?;

    let mut delivered = BatchOutcome {
        processed: 0,
        failed: computed.failed,
    };
    for report in &reports {
        match sink.deliver(report).await {
            Ok(()) => delivered.record_success(),
            Err(e) => delivered.record_failure(&report.employee_id, &e),
        }
    }

    info!(
        year = previous.year(),
        month = previous.month(),
        delivered = delivered.processed,
        failed = delivered.failed.len(),
        "Monthly reports dispatched"
    );

    Ok(MonthlyCycleOutcome {
        sundays,
        reports: delivered,
    })
}

pub async fn run_absence_cutoff(store: &dyn RecordStore, today: NaiveDate) -> Result<BatchOutcome, AppError> {
    mark_absent_for_missed_in(store, today).await
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub monthly_cron: String,
    pub absence_cron: String,
    pub job_timeout: Duration,
}

impl SchedulerConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            monthly_cron: config.monthly_job_cron.clone(),
            absence_cron: config.absence_cutoff_cron.clone(),
            job_timeout: Duration::from_secs(config.job_timeout_secs),
        }
    }
}

/// Calendar date a job fired on, as seen in the zone its schedule runs in.
pub fn job_date<Tz: TimeZone>(timezone: &Tz, fired_at: DateTime<Utc>) -> NaiveDate {
    fired_at.with_timezone(timezone).date_naive()
}

/// Owns the cron scheduler running the batch jobs.
///
/// Cron expressions and the date handed to each job share one time zone.
pub struct BatchScheduler {
    scheduler: JobScheduler,
}

impl BatchScheduler {
    pub async fn start<Tz>(
        config: SchedulerConfig,
        timezone: Tz,
        store: Arc<dyn RecordStore>,
        rules: PayrollRules,
        sink: Arc<dyn ReportSink>,
    ) -> Result<Self, JobSchedulerError>
    where
        Tz: TimeZone + Send + Sync + 'static,
    {
        let scheduler = JobScheduler::new().await?;
        let job_timeout = config.job_timeout;

        let monthly = {
            let store = store.clone();
            let timezone = timezone.clone();
            Job::new_async_tz(config.monthly_cron.as_str(), timezone.clone(), move |_id, _lock| {
                let store = store.clone();
                let rules = rules.clone();
                let sink = sink.clone();
                let today = job_date(&timezone, Utc::now());

                Box::pin(async move {
                    let run = run_monthly_cycle(store.as_ref(), &rules, sink.as_ref(), today);
                    report_run("monthly", job_timeout, run).await;
                })
            })?
        };

        let absence = Job::new_async_tz(config.absence_cron.as_str(), timezone.clone(), move |_id, _lock| {
            let store = store.clone();
            let today = job_date(&timezone, Utc::now());

            Box::pin(async move {
                let run = run_absence_cutoff(store.as_ref(), today);
                report_run("absence_cutoff", job_timeout, run).await;
            })
        })?;

        scheduler.add(monthly).await?;
        scheduler.add(absence).await?;
        scheduler.start().await?;

        info!(
            monthly = %config.monthly_cron,
            absence = %config.absence_cron,
            timeout_secs = job_timeout.as_secs(),
            "Batch scheduler started"
        );
        Ok(Self { scheduler })
    }

    pub async fn shutdown(mut self) -> Result<(), JobSchedulerError> {
        self.scheduler.shutdown().await?;
        info!("Batch scheduler stopped");
        Ok(())
    }
}

async fn report_run<T, F>(job: &'static str, timeout: Duration, run: F)
where
    T: std::fmt::Debug,
    F: std::future::Future<Output = Result<T, AppError>>,
{
    let started = Instant::now();

    match tokio::time::timeout(timeout, run).await {
        Ok(Ok(outcome)) => {
            debug!(job, elapsed_ms = started.elapsed().as_millis() as u64, outcome = ?outcome, "Job finished");
        }
        Ok(Err(e)) => {
            error!(job, error = %e, "Job failed");
        }
        Err(_) => {
            warn!(job, timeout_secs = timeout.as_secs(), "Job timed out");
        }
    }
}
