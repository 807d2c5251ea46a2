//! 服务器配置存储（SQLite 实现）

use async_trait::async_trait;
use chrono::Utc;
use estoque_common::ServerAddress;
use estoque_errors::{AppError, AppResult};
use estoque_ports::ServerConfigRepository;
use sqlx::SqlitePool;
use tracing::info;

use crate::migration::Migration;

/// 服务器配置表迁移版本
pub const SERVER_CONFIG_MIGRATION_VERSION: i64 = 1;

/// 服务器配置表迁移
///
/// `id` 固定为 1，保证最多一条记录
pub fn server_config_migration() -> Migration {
    Migration::new(
        SERVER_CONFIG_MIGRATION_VERSION,
        "create_server_config",
        r#"
        CREATE TABLE IF NOT EXISTS server_config (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            host TEXT NOT NULL,
            port INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
}

pub struct SqliteServerConfigRepository {
    pool: SqlitePool,
}

impl SqliteServerConfigRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServerConfigRepository for SqliteServerConfigRepository {
    async fn save(&self, address: &ServerAddress) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::storage(format!("保存服务器配置失败: {}", e)))?;

        sqlx::query("DELETE FROM server_config")
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::storage(format!("清除旧服务器配置失败: {}", e)))?;

        sqlx::query("INSERT INTO server_config (id, host, port, updated_at) VALUES (1, ?, ?, ?)")
            .bind(address.host())
            .bind(i64::from(address.port()))
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::storage(format!("保存服务器配置失败: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::storage(format!("保存服务器配置失败: {}", e)))?;

        info!(server = %address, "Server configuration saved");
        Ok(())
    }

    async fn get(&self) -> AppResult<Option<ServerAddress>> {
        let row: Option<(String, i64)> =
            sqlx::query_as("SELECT host, port FROM server_config LIMIT 1")
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::storage(format!("查询服务器配置失败: {}", e)))?;

        let Some((host, port)) = row else {
            return Ok(None);
        };

        let port = u16::try_from(port)
            .map_err(|_| AppError::storage(format!("服务器配置端口无效: {}", port)))?;
        let address = ServerAddress::new(host, port)
            .map_err(|e| AppError::storage(format!("服务器配置记录无效: {}", e)))?;

        Ok(Some(address))
    }

    async fn delete(&self) -> AppResult<()> {
        sqlx::query("DELETE FROM server_config")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::storage(format!("删除服务器配置失败: {}", e)))?;

        info!("Server configuration deleted");
        Ok(())
    }
}
