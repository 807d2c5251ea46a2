//! 终端启动器

use std::future::Future;
use std::sync::Arc;

use estoque_adapter_sqlite::Migration;
use estoque_config::AppConfig;
use estoque_errors::{AppError, AppResult};
use tracing::info;

use crate::infrastructure::Infrastructure;
use crate::runtime::{init_runtime, shutdown_signal};

/// 运行终端应用
///
/// 1. 加载配置
/// 2. 初始化运行时（日志）
/// 3. 创建基础设施资源（本地库、迁移、远端客户端）
/// 4. 运行调用方提供的应用，直到其返回或收到关闭信号
///
/// # 示例
///
/// ```ignore
/// estoque_bootstrap::run("config", delivery_migrations(), |infra| async move {
///     Console::new(infra).run().await
/// })
/// .await
/// ```
pub async fn run<F, Fut>(config_dir: &str, migrations: Vec<Migration>, app: F) -> AppResult<()>
where
    F: FnOnce(Arc<Infrastructure>) -> Fut,
    Fut: Future<Output = AppResult<()>>,
{
    // 1. 加载配置
    let config = AppConfig::load(config_dir)
        .map_err(|e| AppError::configuration(e.to_string()))?;

    // 2. 初始化运行时
    init_runtime(&config);

    info!("Starting {}", config.app_name);

    // 3. 创建基础设施
    let infra = Arc::new(Infrastructure::from_config(config, &migrations).await?);

    // 4. 运行应用
    let result = tokio::select! {
        result = app(infra.clone()) => result,
        _ = shutdown_signal() => Ok(()),
    };

    // 5. 清理
    infra.close().await;

    info!("Terminal stopped");

    result
}
