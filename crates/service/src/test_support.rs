#![cfg(test)]
use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use models::db::connect_with_config;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// PostgreSQL tests run only with `DATABASE_URL` set and `SKIP_DB_TESTS` unset.
pub fn db_tests_disabled() -> bool {
    let _ = dotenvy::dotenv();
    std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err()
}

fn test_config() -> DatabaseConfig {
    let mut cfg = DatabaseConfig {
        max_connections: 20,
        min_connections: 1,
        acquire_timeout_secs: 10,
        ..DatabaseConfig::default()
    };
    // url comes from DATABASE_URL
    cfg.normalize_from_env();
    cfg
}

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    // Run migrations exactly once, with a throwaway connection
    MIGRATED
        .get_or_try_init(|| async {
            let db = connect_with_config(&test_config()).await?;
            migration::Migrator::up(&db, None).await?;
            Ok::<_, anyhow::Error>(())
        })
        .await?;

    // Return a fresh connection for the current test's runtime
    connect_with_config(&test_config()).await
}
