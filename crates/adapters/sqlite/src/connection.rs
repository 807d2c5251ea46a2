//! SQLite 连接管理

use std::str::FromStr;
use std::time::Duration;

use estoque_errors::{AppError, AppResult};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

/// SQLite 连接池配置
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    pub url: String,
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://controle_estoque.db".to_string(),
            max_connections: 4,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl SqliteConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// 内存数据库（测试用）
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:")
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// 是否为内存数据库
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// 创建 SQLite 连接池
///
/// 内存数据库每个连接互相独立，因此固定为单连接且永不回收
pub async fn create_pool(config: &SqliteConfig) -> AppResult<SqlitePool> {
    let mut options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| AppError::configuration(format!("Invalid ledger url {}: {}", config.url, e)))?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(config.busy_timeout);

    let pool_options = if config.is_in_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        options = options.journal_mode(SqliteJournalMode::Wal);
        SqlitePoolOptions::new().max_connections(config.max_connections)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(|e| AppError::storage(format!("Failed to open ledger database: {}", e)))?;

    info!(url = %config.url, "SQLite pool created");
    Ok(pool)
}

/// 检查数据库连接
pub async fn check_connection(pool: &SqlitePool) -> AppResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| AppError::storage(format!("Database health check failed: {}", e)))?;
    Ok(())
}

/// 是否为唯一约束冲突
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_detection() {
        assert!(SqliteConfig::in_memory().is_in_memory());
        assert!(SqliteConfig::new("sqlite:file:ledger?mode=memory&cache=shared").is_in_memory());
        assert!(!SqliteConfig::default().is_in_memory());
    }

    #[test]
    fn test_builder() {
        let config = SqliteConfig::new("sqlite://ledger.db")
            .with_max_connections(2)
            .with_busy_timeout(Duration::from_secs(1));
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.busy_timeout, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_in_memory_pool_is_usable() {
        let pool = create_pool(&SqliteConfig::in_memory()).await.unwrap();
        check_connection(&pool).await.unwrap();
    }
}
