//! 数据库基础设施

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Error,
};
use std::{str::FromStr, time::Duration};
use tracing::info;

use super::config::DatabaseConfig;

pub struct DatabaseManager {
    pool: SqlitePool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, Error> {
        info!("Connecting to database: {}", config.url);

        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        // 内存数据库随连接关闭而消失，因此固定使用同一个连接
        let pool_options = if is_in_memory(&config.url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(Duration::from_secs(8))
        };

        let pool = pool_options.connect_with(options).await?;
        create_tables(&pool).await?;

        Ok(Self { pool })
    }

    /// 独立的内存数据库，每次调用互不共享
    pub async fn in_memory() -> Result<Self, Error> {
        Self::new(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            ..DatabaseConfig::default()
        })
        .await
    }

    pub fn into_pool(self) -> SqlitePool {
        self.pool
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

async fn create_tables(pool: &SqlitePool) -> Result<(), Error> {
    info!("Creating database tables...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR(100) NOT NULL,
            description VARCHAR(250) NOT NULL,
            price TEXT NOT NULL,
            available BOOLEAN NOT NULL DEFAULT 1,
            category TEXT NOT NULL DEFAULT 'UNKNOWN'
                CHECK (category IN ('UNKNOWN', 'CLOTHS', 'FOOD', 'HOUSEWARES', 'AUTOMOTIVE', 'TOOLS'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
