//! 基础设施资源管理
//!
//! 本地 SQLite 库、服务器配置存储与库存服务客户端，由 bootstrap 统一初始化

use std::sync::Arc;
use std::time::Duration;

use estoque_adapter_inventory::{HttpInventoryGateway, InventoryClientConfig};
use estoque_adapter_sqlite::{
    Migration, MigrationManager, SqliteConfig, SqliteServerConfigRepository, check_connection,
    create_pool,
};
use estoque_common::ServerAddress;
use estoque_config::AppConfig;
use estoque_errors::{AppError, AppResult};
use estoque_ports::{InventoryGateway, ServerConfigRepository};
use sqlx::SqlitePool;
use tracing::info;

/// 基础设施资源容器
pub struct Infrastructure {
    /// 本地 SQLite 连接池
    pool: SqlitePool,
    /// 服务器配置存储
    servers: Arc<dyn ServerConfigRepository>,
    /// 库存服务客户端
    gateway: Arc<dyn InventoryGateway>,
}

impl Infrastructure {
    /// 从配置创建基础设施资源
    pub async fn from_config(config: AppConfig, migrations: &[Migration]) -> AppResult<Self> {
        // 1. 打开本地库
        let sqlite_config = SqliteConfig::new(&config.ledger.url)
            .with_max_connections(config.ledger.max_connections)
            .with_busy_timeout(Duration::from_secs(config.ledger.busy_timeout_secs));
        let pool = create_pool(&sqlite_config).await?;

        // 2. 应用迁移
        let result = MigrationManager::new(pool.clone())
            .migrate_strict(migrations)
            .await?;
        info!(
            applied = result.applied_count(),
            skipped = result.skipped.len(),
            "Local database migrated"
        );

        // 3. 服务器配置（首次启动时从配置文件写入）
        let servers: Arc<dyn ServerConfigRepository> =
            Arc::new(SqliteServerConfigRepository::new(pool.clone()));
        seed_server_config(servers.as_ref(), &config).await?;

        // 4. 库存服务客户端
        let client_config = InventoryClientConfig::default()
            .with_timeout(Duration::from_secs(config.remote.timeout_secs));
        let gateway: Arc<dyn InventoryGateway> =
            Arc::new(HttpInventoryGateway::new(client_config, servers.clone())?);
        info!(timeout_secs = config.remote.timeout_secs, "Inventory client created");

        Ok(Self {
            pool,
            servers,
            gateway,
        })
    }

    /// 获取本地连接池
    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    /// 获取服务器配置存储
    pub fn server_config(&self) -> Arc<dyn ServerConfigRepository> {
        self.servers.clone()
    }

    /// 获取库存服务客户端
    pub fn gateway(&self) -> Arc<dyn InventoryGateway> {
        self.gateway.clone()
    }

    /// 本地库健康检查
    pub async fn health_check(&self) -> AppResult<()> {
        check_connection(&self.pool).await
    }

    /// 关闭连接池
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Local database closed");
    }
}

/// 本地尚无服务器配置且配置文件给出了地址时写入，返回是否写入
pub async fn seed_server_config(
    servers: &dyn ServerConfigRepository,
    config: &AppConfig,
) -> AppResult<bool> {
    let Some(server) = &config.remote.server else {
        return Ok(false);
    };
    if servers.get().await?.is_some() {
        return Ok(false);
    }

    let address = ServerAddress::new(server.host.as_str(), server.port)
        .map_err(|e| AppError::configuration(format!("remote.server 配置无效: {}", e)))?;
    servers.save(&address).await?;

    info!(server = %address, "Server configuration seeded from config");
    Ok(true)
}
