use std::time::{Duration, Instant};

use anyhow::Result;
use configs::DatabaseConfig;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use super::db_tests_disabled;
use crate::db::{connect, connect_options, connect_with_config, DATABASE_URL};

#[test]
fn connect_options_follow_config() {
    let cfg = DatabaseConfig {
        url: "postgres://u:p@localhost:5432/x".into(),
        max_connections: 7,
        min_connections: 2,
        connect_timeout_secs: 3,
        idle_timeout_secs: 60,
        max_lifetime_secs: 120,
        acquire_timeout_secs: 4,
        sqlx_logging: false,
        run_migrations: false,
    };
    let opt = connect_options(&cfg);
    assert_eq!(opt.get_url(), "postgres://u:p@localhost:5432/x");
    assert_eq!(opt.get_max_connections(), Some(7));
    assert_eq!(opt.get_min_connections(), Some(2));
    assert_eq!(opt.get_connect_timeout(), Some(Duration::from_secs(3)));
    assert_eq!(opt.get_acquire_timeout(), Some(Duration::from_secs(4)));
}

#[tokio::test]
async fn test_basic_connection() -> Result<()> {
    if db_tests_disabled() {
        println!("Skipping database tests");
        return Ok(());
    }

    let start = Instant::now();
    let db = connect().await?;
    let connection_time = start.elapsed();

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT 1 as test".to_string());
    let row = db.query_one(stmt).await?.expect("one row");
    let test_value: i32 = row.try_get("", "test")?;
    assert_eq!(test_value, 1);
    assert!(connection_time < Duration::from_secs(5), "Connection took too long: {:?}", connection_time);
    Ok(())
}

#[tokio::test]
async fn test_custom_config_connection() -> Result<()> {
    if db_tests_disabled() {
        return Ok(());
    }

    let cfg = DatabaseConfig {
        url: DATABASE_URL.clone(),
        max_connections: 5,
        min_connections: 1,
        connect_timeout_secs: 10,
        idle_timeout_secs: 60,
        max_lifetime_secs: 600,
        acquire_timeout_secs: 10,
        sqlx_logging: false,
        run_migrations: false,
    };
    let db = connect_with_config(&cfg).await?;

    let stmt = Statement::from_string(DatabaseBackend::Postgres, "SELECT current_database()".to_string());
    assert!(db.query_one(stmt).await?.is_some());
    Ok(())
}
