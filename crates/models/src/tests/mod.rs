mod db_tests;

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

/// Tests needing PostgreSQL run only when `DATABASE_URL` is set and
/// `SKIP_DB_TESTS` is not.
pub(crate) fn db_tests_disabled() -> bool {
    let _ = dotenvy::dotenv();
    std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err()
}

pub(crate) async fn setup_test_db() -> anyhow::Result<DatabaseConnection> {
    let db = crate::db::connect().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
