use sqlx::MySqlPool;
use sqlx::migrate::MigrateError;
use tracing::info;

pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPool::connect(database_url).await?;
    info!("Connected to database");
    Ok(pool)
}

/// Applies pending migrations from `./migrations`.
pub async fn migrate(pool: &MySqlPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Migrations applied");
    Ok(())
}
