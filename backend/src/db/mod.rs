use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::error::StoreError;

/// Opens the pool and brings the schema up to date.
pub async fn connect(database_url: &str) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = pool_options(database_url).connect_with(options).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("sqlite store ready at {}", database_url);

    Ok(pool)
}

/// An in-memory database lives only as long as its connection, so it gets a
/// single connection that is never reaped.
pub fn pool_options(database_url: &str) -> SqlitePoolOptions {
    if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_pool_keeps_its_connection() {
        let options = pool_options("sqlite::memory:");
        assert_eq!(options.get_max_connections(), 1);
        assert_eq!(options.get_min_connections(), 1);
        assert_eq!(options.get_idle_timeout(), None);
        assert_eq!(options.get_max_lifetime(), None);
    }

    #[test]
    fn file_pool_uses_default_reaping() {
        let options = pool_options("sqlite://study_records.db");
        assert_eq!(options.get_max_connections(), 5);
        assert!(options.get_idle_timeout().is_some());
    }

    #[tokio::test]
    async fn memory_database_is_shared_across_queries() {
        let pool = connect("sqlite::memory:").await.unwrap();
        let insert = "INSERT INTO study_records (id, title, time, created_at) \
                      VALUES ('a', 'Rust', '1', 'now')";
        sqlx::query(insert).execute(&pool).await.unwrap();

        assert_eq!(pool.size(), 1);
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM study_records")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }
}
