use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::ops::Deref;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

const TAG_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tag (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name VARCHAR(100) NOT NULL
)
"#;

const BLOG_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS blog (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title VARCHAR(255) NOT NULL,
    description TEXT NOT NULL,
    tag_id INTEGER NOT NULL,
    blog_image VARCHAR(255),
    date_created DATETIME DEFAULT CURRENT_TIMESTAMP,
    content TEXT NOT NULL,
    FOREIGN KEY (tag_id) REFERENCES tag(id) ON DELETE CASCADE
)
"#;

pub struct DB {
    pub pool: SqlitePool,
}

impl DB {
    /// Opens the connection pool shared by every request.
    ///
    /// Foreign keys are switched on for each connection, SQLite leaves them off otherwise
    /// and `ON DELETE CASCADE` would silently do nothing. Connecting eagerly doubles as the
    /// startup connectivity check.
    pub async fn new(url: &str, pool_size: u32, acquire_timeout: Duration) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database url '{}'", url))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(acquire_timeout)
            .connect_with(options)
            .await
            .context("Cannot connect to database")?;

        Ok(DB { pool })
    }

    /// Creates the `tag` and `blog` tables when they are missing. Safe to run on every start.
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(TAG_SCHEMA)
            .execute(&self.pool)
            .await
            .context("Error creating tag schema")?;

        sqlx::query(BLOG_SCHEMA)
            .execute(&self.pool)
            .await
            .context("Error creating blog schema")?;

        info!("Schema preloaded successfully");
        Ok(())
    }
}

impl Deref for DB {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.pool
    }
}
