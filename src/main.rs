use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use chrono::Local;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use attendance_payroll::api::AppState;
use attendance_payroll::config::Config;
use attendance_payroll::db::{init_db, migrate};
use attendance_payroll::docs::ApiDoc;
use attendance_payroll::engine::PayrollRules;
use attendance_payroll::routes::{self, RateLimits};
use attendance_payroll::scheduler::{BatchScheduler, LogReportSink, SchedulerConfig};
use attendance_payroll::service::punch::StaticPunchValidator;
use attendance_payroll::store::{MySqlStore, RecordStore};

#[get("/")]
async fn index() -> impl Responder {
    "Attendance & Payroll"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    migrate(&pool).await.context("Failed to run migrations")?;

    let store: Arc<dyn RecordStore> = Arc::new(MySqlStore::new(pool));
    let rules = PayrollRules::from_config(&config);
    let state = AppState {
        store: store.clone(),
        validator: Arc::new(StaticPunchValidator::from_config(&config)),
        rules: rules.clone(),
    };
    let limits = RateLimits::from_config(&config)?;

    let scheduler = BatchScheduler::start(
        SchedulerConfig::from_config(&config),
        Local,
        store,
        rules,
        Arc::new(LogReportSink),
    )
    .await
    .context("Failed to start batch scheduler")?;

    let api_prefix = config.api_prefix.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // wildcard matches the JS/CSS assets
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(state.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, &api_prefix, &limits))
    })
    .bind(&config.server_addr)?
    .run()
    .await?;

    scheduler.shutdown().await.context("Failed to stop batch scheduler")?;
    info!("Server stopped");
    Ok(())
}
