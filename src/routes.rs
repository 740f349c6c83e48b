use crate::{
    api::{attendance, employee, holiday, payroll},
    config::Config,
    error::AppError,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::{Result, anyhow};

type IpLimiter = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter settings. The underlying state is shared, so one
/// instance serves every worker.
#[derive(Clone)]
pub struct RateLimits {
    pub punch: IpLimiter,
    pub protected: IpLimiter,
}

impl RateLimits {
    pub fn new(punch_per_min: u32, protected_per_min: u32) -> Result<Self> {
        Ok(Self {
            punch: build_limiter(punch_per_min)?,
            protected: build_limiter(protected_per_min)?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.rate_punch_per_min, config.rate_protected_per_min)
    }
}

fn build_limiter(requests_per_min: u32) -> Result<IpLimiter> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit of {} requests per minute", requests_per_min))
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str, limits: &RateLimits) {
    // Malformed paths and bodies answer with the same JSON shape as AppError
    let path_config = web::PathConfig::default()
        .error_handler(|err, _req| AppError::validation(err.to_string()).into());
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::validation(err.to_string()).into());

    cfg.service(
        web::scope(api_prefix)
            .app_data(path_config)
            .app_data(json_config)
            .wrap(Governor::new(&limits.protected))
            .service(
                web::scope("/attendance")
                    // punch terminals get their own, tighter budget
                    .service(
                        web::resource("/in/{employee_id}")
                            .wrap(Governor::new(&limits.punch))
                            .route(web::post().to(attendance::clock_in)),
                    )
                    .service(
                        web::resource("/out/{employee_id}")
                            .wrap(Governor::new(&limits.punch))
                            .route(web::post().to(attendance::clock_out)),
                    )
                    .service(
                        web::resource("/override")
                            .route(web::post().to(attendance::override_attendance)),
                    )
                    .service(
                        web::resource("/{employee_id}/daily/{date}")
                            .route(web::get().to(attendance::daily_attendance)),
                    )
                    .service(
                        web::resource("/{employee_id}/monthly/{year}/{month}")
                            .route(web::get().to(attendance::monthly_attendance)),
                    )
                    .service(
                        web::resource("/{employee_id}/{date}")
                            .route(web::delete().to(attendance::delete_attendance)),
                    ),
            )
            .service(
                web::scope("/payroll")
                    .service(
                        web::resource("/{year}/{month}")
                            .route(web::get().to(payroll::salaries_for_all)),
                    )
                    .service(
                        web::resource("/{employee_id}/{year}/{month}")
                            .route(web::get().to(payroll::monthly_report)),
                    ),
            )
            .service(
                web::scope("/holiday")
                    .service(web::resource("").route(web::post().to(holiday::mark_holiday)))
                    .service(web::resource("/manage").route(web::put().to(holiday::manage_holiday)))
                    .service(
                        web::resource("/sundays/{year}/{month}")
                            .route(web::post().to(holiday::generate_sundays)),
                    )
                    .service(
                        web::resource("/{year}/{month}")
                            .route(web::get().to(holiday::holidays_for_month)),
                    ),
            )
            .service(
                web::scope("/employee")
                    .service(web::resource("").route(web::get().to(employee::list_employees)))
                    .service(web::resource("/{employee_id}").route(web::get().to(employee::get_employee)))
                    .service(
                        web::resource("/{employee_id}/salary")
                            .route(web::put().to(employee::update_salary)),
                    )
                    .service(
                        web::resource("/{employee_id}/bonus")
                            .route(web::put().to(employee::update_bonus)),
                    )
                    .service(
                        web::resource("/{employee_id}/shift")
                            .route(web::put().to(employee::update_shift))
                            .route(web::get().to(employee::get_shift)),
                    ),
            ),
    );
}
